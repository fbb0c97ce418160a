// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Repository traits and one-time backend selection.
//!
//! Each trait covers one aggregate. Both [`RemoteBackend`] and
//! [`FallbackBackend`] implement all of them with identical observable
//! behavior; callers can only tell them apart by latency and availability.

use chrono::{DateTime, Utc};
use futures_util::future::BoxFuture;
use std::fmt;
use std::sync::Arc;

use crate::config::Config;
use crate::db::{
    DocumentStore, FallbackBackend, FileKeyValue, FirestoreDocuments, KeyValueStore,
    RemoteBackend,
};
use crate::error::Result;
use crate::models::{
    AttendanceDate, AttendanceRecord, ShardKey, TrainingType, TrainingTypePatch, UserId,
    UserProfile,
};

/// Attendance records, partitioned by year-month shard.
pub trait AttendanceBackend: Send + Sync {
    /// Insert or overwrite the record at `record.date`.
    fn put_record<'a>(
        &'a self,
        user: &'a UserId,
        record: AttendanceRecord,
    ) -> BoxFuture<'a, Result<()>>;

    fn get_record<'a>(
        &'a self,
        user: &'a UserId,
        date: AttendanceDate,
    ) -> BoxFuture<'a, Result<Option<AttendanceRecord>>>;

    /// Remove the record at `date`. A missing record is not an error.
    fn delete_record<'a>(
        &'a self,
        user: &'a UserId,
        date: AttendanceDate,
    ) -> BoxFuture<'a, Result<()>>;

    /// Every record in one shard, in no particular order.
    fn read_shard<'a>(
        &'a self,
        user: &'a UserId,
        shard: ShardKey,
    ) -> BoxFuture<'a, Result<Vec<AttendanceRecord>>>;

    /// Instant used to stamp new records.
    fn now(&self) -> DateTime<Utc>;
}

/// Per-user catalog of training types.
pub trait TrainingTypeBackend: Send + Sync {
    /// All types in creation order.
    fn list_types<'a>(&'a self, user: &'a UserId) -> BoxFuture<'a, Result<Vec<TrainingType>>>;

    fn insert_type<'a>(
        &'a self,
        user: &'a UserId,
        training_type: TrainingType,
    ) -> BoxFuture<'a, Result<()>>;

    /// Apply `patch` to an existing type. Returns `None` if `id` is unknown.
    fn update_type<'a>(
        &'a self,
        user: &'a UserId,
        id: &'a str,
        patch: &'a TrainingTypePatch,
    ) -> BoxFuture<'a, Result<Option<TrainingType>>>;

    /// Remove a type. Returns whether it existed.
    fn delete_type<'a>(&'a self, user: &'a UserId, id: &'a str) -> BoxFuture<'a, Result<bool>>;
}

/// User profile documents.
pub trait ProfileBackend: Send + Sync {
    fn get_profile<'a>(&'a self, user: &'a UserId)
        -> BoxFuture<'a, Result<Option<UserProfile>>>;

    fn put_profile<'a>(
        &'a self,
        user: &'a UserId,
        profile: &'a UserProfile,
    ) -> BoxFuture<'a, Result<()>>;
}

/// Which storage variant is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendMode {
    Remote,
    Fallback,
}

impl fmt::Display for BackendMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendMode::Remote => f.write_str("remote"),
            BackendMode::Fallback => f.write_str("fallback"),
        }
    }
}

/// The storage backend chosen for this process.
///
/// Immutable once built; stores receive a clone at construction.
#[derive(Clone)]
pub struct Backend {
    mode: BackendMode,
    pub attendance: Arc<dyn AttendanceBackend>,
    pub training_types: Arc<dyn TrainingTypeBackend>,
    pub profiles: Arc<dyn ProfileBackend>,
}

impl Backend {
    /// Backend over a remote document store.
    pub fn remote(docs: Arc<dyn DocumentStore>) -> Self {
        let backend = Arc::new(RemoteBackend::new(docs));
        Self {
            mode: BackendMode::Remote,
            attendance: backend.clone(),
            training_types: backend.clone(),
            profiles: backend,
        }
    }

    /// Backend over a local key-value store.
    pub fn fallback(kv: Arc<dyn KeyValueStore>) -> Self {
        let backend = Arc::new(FallbackBackend::new(kv));
        Self {
            mode: BackendMode::Fallback,
            attendance: backend.clone(),
            training_types: backend.clone(),
            profiles: backend,
        }
    }

    pub fn mode(&self) -> BackendMode {
        self.mode
    }

    /// Diagnostic only.
    pub fn is_using_fallback(&self) -> bool {
        self.mode == BackendMode::Fallback
    }
}

impl fmt::Debug for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Backend").field("mode", &self.mode).finish()
    }
}

/// Decides once, at startup, which backend serves the process.
pub struct BackendSelector;

impl BackendSelector {
    /// Probe the remote configuration and build the matching backend.
    ///
    /// Falls back to local storage when the project is unset, a placeholder,
    /// or the client fails to initialize. The decision is never revisited.
    pub async fn resolve(config: &Config) -> Result<Backend> {
        match config.remote_project() {
            Ok(project) => match FirestoreDocuments::new(project).await {
                Ok(docs) => {
                    tracing::info!(project, backend = %BackendMode::Remote, "Storage backend selected");
                    return Ok(Backend::remote(Arc::new(docs)));
                }
                Err(e) => {
                    tracing::error!(project, error = %e, "Failed to initialize Firestore");
                    tracing::warn!("Falling back to local storage for data persistence");
                }
            },
            Err(e) => {
                tracing::warn!(reason = %e, "Firestore not configured, using local storage");
            }
        }

        let kv = FileKeyValue::open(&config.data_dir)?;
        tracing::info!(
            data_dir = %config.data_dir.display(),
            backend = %BackendMode::Fallback,
            "Storage backend selected"
        );
        Ok(Backend::fallback(Arc::new(kv)))
    }
}
