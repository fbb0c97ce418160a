// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Remote document store abstraction.
//!
//! Documents are addressed by alternating collection/document segments,
//! e.g. `users/{uid}/attendances/2024-01/days/2024-01-15`.

use chrono::{DateTime, Utc};
use futures_util::future::BoxFuture;
use serde_json::Value;
use std::fmt;

use crate::db::collections;
use crate::error::Result;
use crate::models::{AttendanceDate, ShardKey, UserId};

/// A collection, optionally nested under parent documents.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CollectionPath {
    /// `(collection, document id)` pairs leading to the parent document
    pub parents: Vec<(String, String)>,
    pub collection: String,
}

/// A single document.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocPath {
    pub collection: CollectionPath,
    pub id: String,
}

impl CollectionPath {
    pub fn root(collection: &str) -> Self {
        Self {
            parents: Vec::new(),
            collection: collection.to_string(),
        }
    }

    pub fn doc(&self, id: impl Into<String>) -> DocPath {
        DocPath {
            collection: self.clone(),
            id: id.into(),
        }
    }

    /// `users/{uid}/trainingTypes`
    pub fn training_types(user: &UserId) -> Self {
        Self {
            parents: vec![(collections::USERS.to_string(), user.to_string())],
            collection: collections::TRAINING_TYPES.to_string(),
        }
    }

    /// `users/{uid}/attendances/{YYYY-MM}/days`
    pub fn shard_days(user: &UserId, shard: ShardKey) -> Self {
        Self {
            parents: vec![
                (collections::USERS.to_string(), user.to_string()),
                (collections::ATTENDANCES.to_string(), shard.to_string()),
            ],
            collection: collections::DAYS.to_string(),
        }
    }
}

impl DocPath {
    /// `users/{uid}`
    pub fn profile(user: &UserId) -> Self {
        CollectionPath::root(collections::USERS).doc(user.as_str())
    }

    /// `users/{uid}/attendances/{YYYY-MM}/days/{date}`
    pub fn attendance_day(user: &UserId, date: &AttendanceDate) -> Self {
        CollectionPath::shard_days(user, date.shard()).doc(date.to_string())
    }
}

impl fmt::Display for CollectionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (collection, id) in &self.parents {
            write!(f, "{}/{}/", collection, id)?;
        }
        f.write_str(&self.collection)
    }
}

impl fmt::Display for DocPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.collection, self.id)
    }
}

/// Remote document database.
///
/// Object safe so the active implementation can be chosen at startup.
/// Every I/O failure is reported as [`crate::error::AppError::StoreUnavailable`].
pub trait DocumentStore: Send + Sync {
    /// Fetch one document.
    fn get<'a>(&'a self, path: &'a DocPath) -> BoxFuture<'a, Result<Option<Value>>>;

    /// Fetch every document in a collection.
    fn list<'a>(&'a self, collection: &'a CollectionPath) -> BoxFuture<'a, Result<Vec<Value>>>;

    /// Write a document. With `merge`, only the fields present in `doc`
    /// are replaced; otherwise the whole document is overwritten.
    fn set<'a>(&'a self, path: &'a DocPath, doc: Value, merge: bool)
        -> BoxFuture<'a, Result<()>>;

    /// Delete a document. Deleting a missing document succeeds.
    fn delete<'a>(&'a self, path: &'a DocPath) -> BoxFuture<'a, Result<()>>;

    /// Timestamp to stamp new documents with.
    fn server_time(&self) -> DateTime<Utc>;
}
