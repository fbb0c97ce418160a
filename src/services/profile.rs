// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User profile storage.

use std::sync::Arc;

use crate::db::{Backend, ProfileBackend};
use crate::error::Result;
use crate::models::{ProfileUpdate, UserId, UserProfile};

#[derive(Clone)]
pub struct ProfileStore {
    backend: Arc<dyn ProfileBackend>,
}

impl ProfileStore {
    pub fn new(backend: &Backend) -> Self {
        Self {
            backend: backend.profiles.clone(),
        }
    }

    pub async fn get(&self, user: &UserId) -> Result<Option<UserProfile>> {
        self.backend.get_profile(user).await
    }

    /// Create or update a profile, keeping `created_at` of an existing one.
    pub async fn upsert(&self, user: &UserId, update: &ProfileUpdate) -> Result<UserProfile> {
        let now = chrono::Utc::now();
        let mut profile = self
            .backend
            .get_profile(user)
            .await?
            .unwrap_or_else(|| UserProfile::new(now));

        profile.merge(update);
        self.backend.put_profile(user, &profile).await?;
        tracing::info!(user_id = %user, "User profile created/updated");
        Ok(profile)
    }

    /// Record a sign-in.
    pub async fn touch_login(&self, user: &UserId) -> Result<UserProfile> {
        let now = chrono::Utc::now();
        let mut profile = self
            .backend
            .get_profile(user)
            .await?
            .unwrap_or_else(|| UserProfile::new(now));

        profile.last_login_at = Some(now);
        self.backend.put_profile(user, &profile).await?;
        Ok(profile)
    }
}
