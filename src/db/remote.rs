// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Repositories backed by the remote document store.
//!
//! Layout:
//! - `users/{uid}` profile
//! - `users/{uid}/trainingTypes/{typeId}`
//! - `users/{uid}/attendances/{YYYY-MM}/days/{YYYY-MM-DD}`

use chrono::{DateTime, Utc};
use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

use crate::db::backend::{AttendanceBackend, ProfileBackend, TrainingTypeBackend};
use crate::db::document::{CollectionPath, DocPath, DocumentStore};
use crate::error::Result;
use crate::models::{
    AttendanceDate, AttendanceRecord, ShardKey, TrainingType, TrainingTypePatch, UserId,
    UserProfile,
};

/// Remote implementation of every repository trait.
#[derive(Clone)]
pub struct RemoteBackend {
    docs: Arc<dyn DocumentStore>,
}

impl RemoteBackend {
    pub fn new(docs: Arc<dyn DocumentStore>) -> Self {
        Self { docs }
    }

    async fn put_record_impl(&self, user: &UserId, record: AttendanceRecord) -> Result<()> {
        let path = DocPath::attendance_day(user, &record.date);
        self.docs
            .set(&path, serde_json::to_value(&record)?, false)
            .await?;
        tracing::debug!(user_id = %user, date = %record.date, "Attendance marked (remote)");
        Ok(())
    }

    async fn get_record_impl(
        &self,
        user: &UserId,
        date: AttendanceDate,
    ) -> Result<Option<AttendanceRecord>> {
        let path = DocPath::attendance_day(user, &date);
        self.docs
            .get(&path)
            .await?
            .map(serde_json::from_value)
            .transpose()
            .map_err(Into::into)
    }

    async fn delete_record_impl(&self, user: &UserId, date: AttendanceDate) -> Result<()> {
        let path = DocPath::attendance_day(user, &date);
        self.docs.delete(&path).await?;
        tracing::debug!(user_id = %user, date = %date, "Attendance removed (remote)");
        Ok(())
    }

    async fn read_shard_impl(
        &self,
        user: &UserId,
        shard: ShardKey,
    ) -> Result<Vec<AttendanceRecord>> {
        let collection = CollectionPath::shard_days(user, shard);
        let docs = self.docs.list(&collection).await?;
        let records: Vec<AttendanceRecord> = decode_all(&collection, docs);
        tracing::debug!(user_id = %user, shard = %shard, count = records.len(), "Shard loaded");
        Ok(records)
    }

    async fn list_types_impl(&self, user: &UserId) -> Result<Vec<TrainingType>> {
        let collection = CollectionPath::training_types(user);
        let docs = self.docs.list(&collection).await?;
        let mut types: Vec<TrainingType> = decode_all(&collection, docs);
        // The document store returns documents by id; creation order is the catalog order.
        types.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        tracing::debug!(user_id = %user, count = types.len(), "Training types loaded");
        Ok(types)
    }

    async fn insert_type_impl(&self, user: &UserId, training_type: TrainingType) -> Result<()> {
        let path = CollectionPath::training_types(user).doc(&training_type.id);
        self.docs
            .set(&path, serde_json::to_value(&training_type)?, false)
            .await
    }

    async fn update_type_impl(
        &self,
        user: &UserId,
        id: &str,
        patch: &TrainingTypePatch,
    ) -> Result<Option<TrainingType>> {
        let path = CollectionPath::training_types(user).doc(id);
        let Some(doc) = self.docs.get(&path).await? else {
            return Ok(None);
        };

        let mut training_type: TrainingType = serde_json::from_value(doc)?;
        patch.apply(&mut training_type);
        // Stored whole: the patch itself may carry values `apply` normalizes.
        self.docs
            .set(&path, serde_json::to_value(&training_type)?, false)
            .await?;
        Ok(Some(training_type))
    }

    async fn delete_type_impl(&self, user: &UserId, id: &str) -> Result<bool> {
        let path = CollectionPath::training_types(user).doc(id);
        let existed = self.docs.get(&path).await?.is_some();
        if existed {
            self.docs.delete(&path).await?;
        }
        Ok(existed)
    }

    async fn get_profile_impl(&self, user: &UserId) -> Result<Option<UserProfile>> {
        self.docs
            .get(&DocPath::profile(user))
            .await?
            .map(serde_json::from_value)
            .transpose()
            .map_err(Into::into)
    }

    async fn put_profile_impl(&self, user: &UserId, profile: &UserProfile) -> Result<()> {
        self.docs
            .set(&DocPath::profile(user), serde_json::to_value(profile)?, true)
            .await
    }
}

/// Decode documents, skipping any that do not match the schema.
fn decode_all<T: DeserializeOwned>(collection: &CollectionPath, docs: Vec<Value>) -> Vec<T> {
    docs.into_iter()
        .filter_map(|doc| match serde_json::from_value(doc) {
            Ok(item) => Some(item),
            Err(e) => {
                tracing::warn!(collection = %collection, error = %e, "Skipping malformed document");
                None
            }
        })
        .collect()
}

impl AttendanceBackend for RemoteBackend {
    fn put_record<'a>(
        &'a self,
        user: &'a UserId,
        record: AttendanceRecord,
    ) -> BoxFuture<'a, Result<()>> {
        self.put_record_impl(user, record).boxed()
    }

    fn get_record<'a>(
        &'a self,
        user: &'a UserId,
        date: AttendanceDate,
    ) -> BoxFuture<'a, Result<Option<AttendanceRecord>>> {
        self.get_record_impl(user, date).boxed()
    }

    fn delete_record<'a>(
        &'a self,
        user: &'a UserId,
        date: AttendanceDate,
    ) -> BoxFuture<'a, Result<()>> {
        self.delete_record_impl(user, date).boxed()
    }

    fn read_shard<'a>(
        &'a self,
        user: &'a UserId,
        shard: ShardKey,
    ) -> BoxFuture<'a, Result<Vec<AttendanceRecord>>> {
        self.read_shard_impl(user, shard).boxed()
    }

    fn now(&self) -> DateTime<Utc> {
        self.docs.server_time()
    }
}

impl TrainingTypeBackend for RemoteBackend {
    fn list_types<'a>(&'a self, user: &'a UserId) -> BoxFuture<'a, Result<Vec<TrainingType>>> {
        self.list_types_impl(user).boxed()
    }

    fn insert_type<'a>(
        &'a self,
        user: &'a UserId,
        training_type: TrainingType,
    ) -> BoxFuture<'a, Result<()>> {
        self.insert_type_impl(user, training_type).boxed()
    }

    fn update_type<'a>(
        &'a self,
        user: &'a UserId,
        id: &'a str,
        patch: &'a TrainingTypePatch,
    ) -> BoxFuture<'a, Result<Option<TrainingType>>> {
        self.update_type_impl(user, id, patch).boxed()
    }

    fn delete_type<'a>(&'a self, user: &'a UserId, id: &'a str) -> BoxFuture<'a, Result<bool>> {
        self.delete_type_impl(user, id).boxed()
    }
}

impl ProfileBackend for RemoteBackend {
    fn get_profile<'a>(
        &'a self,
        user: &'a UserId,
    ) -> BoxFuture<'a, Result<Option<UserProfile>>> {
        self.get_profile_impl(user).boxed()
    }

    fn put_profile<'a>(
        &'a self,
        user: &'a UserId,
        profile: &'a UserProfile,
    ) -> BoxFuture<'a, Result<()>> {
        self.put_profile_impl(user, profile).boxed()
    }
}
