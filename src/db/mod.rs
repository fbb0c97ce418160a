// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Database layer.
//!
//! Two storage primitives sit underneath the stores:
//! - [`DocumentStore`]: the remote document database (Firestore in production)
//! - [`KeyValueStore`]: the local durable fallback (JSON files)
//!
//! [`RemoteBackend`] and [`FallbackBackend`] implement the same repository
//! traits on top of them, and [`BackendSelector`] picks one per process.

pub mod backend;
pub mod document;
pub mod fallback;
pub mod firestore;
pub mod kv;
pub mod memory;
pub mod remote;

pub use backend::{
    AttendanceBackend, Backend, BackendMode, BackendSelector, ProfileBackend, TrainingTypeBackend,
};
pub use document::{CollectionPath, DocPath, DocumentStore};
pub use fallback::FallbackBackend;
pub use firestore::FirestoreDocuments;
pub use kv::{FileKeyValue, KeyValueStore, MemoryKeyValue};
pub use memory::MemoryDocuments;
pub use remote::RemoteBackend;

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
    pub const TRAINING_TYPES: &str = "trainingTypes";
    /// Year-month shard documents under a user
    pub const ATTENDANCES: &str = "attendances";
    /// Day documents under a shard
    pub const DAYS: &str = "days";
}

/// Key prefixes used by the local fallback store.
pub mod keys {
    use crate::models::UserId;

    pub fn attendance(user: &UserId) -> String {
        format!("attendance_{}", user)
    }

    pub fn training_types(user: &UserId) -> String {
        format!("trainingTypes_{}", user)
    }

    pub fn profile(user: &UserId) -> String {
        format!("user_{}", user)
    }
}
