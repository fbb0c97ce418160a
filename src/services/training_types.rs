// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Training type registry.
//!
//! Ids are generated here rather than by the backend. Deleting a type never
//! touches attendance records that reference it; aggregation treats such
//! dangling ids as untyped.

use std::sync::Arc;
use validator::Validate;

use crate::db::{Backend, TrainingTypeBackend};
use crate::error::{AppError, Result};
use crate::models::{NewTrainingType, TrainingType, TrainingTypePatch, UserId};

/// CRUD over a user's training types.
#[derive(Clone)]
pub struct TrainingTypeRegistry {
    backend: Arc<dyn TrainingTypeBackend>,
}

impl TrainingTypeRegistry {
    pub fn new(backend: &Backend) -> Self {
        Self {
            backend: backend.training_types.clone(),
        }
    }

    /// All types in creation order.
    pub async fn list(&self, user: &UserId) -> Result<Vec<TrainingType>> {
        self.backend.list_types(user).await
    }

    /// Create a type and return it with its new id.
    pub async fn create(&self, user: &UserId, data: NewTrainingType) -> Result<TrainingType> {
        data.validate()?;

        let training_type = TrainingType {
            id: uuid::Uuid::new_v4().simple().to_string(),
            name: data.name,
            color: data.color,
            icon: data.icon.filter(|i| !i.is_empty()),
            created_at: chrono::Utc::now(),
        };

        self.backend
            .insert_type(user, training_type.clone())
            .await?;
        tracing::info!(
            user_id = %user,
            type_id = %training_type.id,
            name = %training_type.name,
            "Training type created"
        );
        Ok(training_type)
    }

    /// Apply a partial update. Unknown ids are `NotFound` on every backend.
    pub async fn update(
        &self,
        user: &UserId,
        id: &str,
        patch: TrainingTypePatch,
    ) -> Result<TrainingType> {
        patch.validate()?;
        if patch.is_empty() {
            return Err(AppError::BadRequest("Nothing to update".to_string()));
        }

        let updated = self
            .backend
            .update_type(user, id, &patch)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Training type {}", id)))?;
        tracing::info!(user_id = %user, type_id = id, "Training type updated");
        Ok(updated)
    }

    /// Delete a type. Deleting an unknown id succeeds, so retries are safe.
    pub async fn delete(&self, user: &UserId, id: &str) -> Result<()> {
        if self.backend.delete_type(user, id).await? {
            tracing::info!(user_id = %user, type_id = id, "Training type deleted");
        } else {
            tracing::debug!(user_id = %user, type_id = id, "Training type already absent");
        }
        Ok(())
    }
}
