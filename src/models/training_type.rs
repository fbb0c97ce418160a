// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Per-user workout type tags.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::{Validate, ValidationError};

/// A user-defined tag attached to attendance records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct TrainingType {
    /// Opaque id, generated locally (also the document ID)
    pub id: String,
    pub name: String,
    /// Hex color (`#RGB` or `#RRGGBB`)
    pub color: String,
    /// Short label or emoji
    #[serde(default)]
    pub icon: Option<String>,
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub created_at: DateTime<Utc>,
}

/// Fields supplied when creating a training type.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewTrainingType {
    #[validate(length(min = 1, max = 50))]
    pub name: String,
    #[validate(custom(function = "validate_hex_color"))]
    pub color: String,
    #[validate(length(max = 8))]
    #[serde(default)]
    pub icon: Option<String>,
}

/// Partial update of a training type. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TrainingTypePatch {
    #[validate(length(min = 1, max = 50))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[validate(custom(function = "validate_hex_color"))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[validate(length(max = 8))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl TrainingTypePatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.color.is_none() && self.icon.is_none()
    }

    /// Apply the patch in place.
    pub fn apply(&self, target: &mut TrainingType) {
        if let Some(name) = &self.name {
            target.name = name.clone();
        }
        if let Some(color) = &self.color {
            target.color = color.clone();
        }
        if let Some(icon) = &self.icon {
            // An empty icon clears it, as on create.
            target.icon = Some(icon.clone()).filter(|i| !i.is_empty());
        }
    }
}

fn validate_hex_color(color: &str) -> Result<(), ValidationError> {
    let digits = color
        .strip_prefix('#')
        .ok_or_else(|| ValidationError::new("hex_color"))?;

    if matches!(digits.len(), 3 | 6) && digits.chars().all(|c| c.is_ascii_hexdigit()) {
        Ok(())
    } else {
        Err(ValidationError::new("hex_color"))
    }
}
