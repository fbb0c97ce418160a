// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User profile model for storage and API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// User profile stored at `users/{uid}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Email address (may be None if the identity provider withholds it)
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    /// Default training type preselected when marking a day
    #[serde(default)]
    pub default_training_type: Option<String>,
    /// When the profile was first written
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub created_at: DateTime<Utc>,
    #[cfg_attr(feature = "binding-generation", ts(type = "string | null"))]
    #[serde(default)]
    pub last_login_at: Option<DateTime<Utc>>,
}

/// Profile fields a client may change.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub default_training_type: Option<String>,
}

impl UserProfile {
    /// Empty profile first seen at `now`.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            email: None,
            display_name: None,
            default_training_type: None,
            created_at: now,
            last_login_at: Some(now),
        }
    }

    /// Merge an update, keeping fields the update leaves out.
    pub fn merge(&mut self, update: &ProfileUpdate) {
        if let Some(email) = &update.email {
            self.email = Some(email.clone());
        }
        if let Some(name) = &update.display_name {
            self.display_name = Some(name.clone());
        }
        if let Some(ty) = &update.default_training_type {
            self.default_training_type = Some(ty.clone()).filter(|t| !t.is_empty());
        }
    }
}
