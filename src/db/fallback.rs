// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Repositories backed by the local key-value store.
//!
//! Each user has one blob per aggregate:
//! - `attendance_{uid}`: map of date to record (sharding is logical only)
//! - `trainingTypes_{uid}`: list of types in creation order
//! - `user_{uid}`: profile
//!
//! Every mutation rewrites a whole blob, so mutations of the same blob are
//! serialized with a per-key lock.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::db::backend::{AttendanceBackend, ProfileBackend, TrainingTypeBackend};
use crate::db::keys;
use crate::db::kv::KeyValueStore;
use crate::error::Result;
use crate::models::{
    AttendanceDate, AttendanceRecord, ShardKey, TrainingType, TrainingTypePatch, UserId,
    UserProfile,
};

type AttendanceBlob = BTreeMap<AttendanceDate, AttendanceRecord>;

/// Per-key write locks.
pub type BlobLocks = Arc<DashMap<String, Arc<Mutex<()>>>>;

/// Local implementation of every repository trait.
#[derive(Clone)]
pub struct FallbackBackend {
    kv: Arc<dyn KeyValueStore>,
    locks: BlobLocks,
}

impl FallbackBackend {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self {
            kv,
            locks: Arc::new(DashMap::new()),
        }
    }

    fn load<T: DeserializeOwned + Default>(&self, key: &str) -> Result<T> {
        match self.kv.get(key)? {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(T::default()),
        }
    }

    fn save<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        self.kv.set(key, &serde_json::to_string(value)?)
    }

    /// Read-modify-write one blob under its lock.
    async fn modify<T, R>(&self, key: &str, f: impl FnOnce(&mut T) -> (bool, R)) -> Result<R>
    where
        T: Serialize + DeserializeOwned + Default,
    {
        let lock = self
            .locks
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        let _guard = lock.lock().await;

        let mut blob: T = self.load(key)?;
        let (changed, result) = f(&mut blob);
        if changed {
            self.save(key, &blob)?;
        }
        Ok(result)
    }

    async fn put_record_impl(&self, user: &UserId, record: AttendanceRecord) -> Result<()> {
        let date = record.date;
        self.modify(&keys::attendance(user), |blob: &mut AttendanceBlob| {
            blob.insert(record.date, record);
            (true, ())
        })
        .await?;
        tracing::debug!(user_id = %user, date = %date, "Attendance marked (local)");
        Ok(())
    }

    async fn delete_record_impl(&self, user: &UserId, date: AttendanceDate) -> Result<()> {
        self.modify(&keys::attendance(user), |blob: &mut AttendanceBlob| {
            (blob.remove(&date).is_some(), ())
        })
        .await?;
        tracing::debug!(user_id = %user, date = %date, "Attendance removed (local)");
        Ok(())
    }

    fn read_shard_sync(&self, user: &UserId, shard: ShardKey) -> Result<Vec<AttendanceRecord>> {
        let blob: AttendanceBlob = self.load(&keys::attendance(user))?;
        Ok(blob
            .into_values()
            .filter(|record| shard.contains(&record.date))
            .collect())
    }

    async fn update_type_impl(
        &self,
        user: &UserId,
        id: &str,
        patch: &TrainingTypePatch,
    ) -> Result<Option<TrainingType>> {
        self.modify(
            &keys::training_types(user),
            |types: &mut Vec<TrainingType>| match types.iter_mut().find(|t| t.id == id) {
                Some(existing) => {
                    patch.apply(existing);
                    (true, Some(existing.clone()))
                }
                None => (false, None),
            },
        )
        .await
    }

    async fn delete_type_impl(&self, user: &UserId, id: &str) -> Result<bool> {
        self.modify(
            &keys::training_types(user),
            |types: &mut Vec<TrainingType>| {
                let before = types.len();
                types.retain(|t| t.id != id);
                let removed = types.len() != before;
                (removed, removed)
            },
        )
        .await
    }

    async fn insert_type_impl(&self, user: &UserId, training_type: TrainingType) -> Result<()> {
        self.modify(
            &keys::training_types(user),
            |types: &mut Vec<TrainingType>| {
                match types.iter_mut().find(|t| t.id == training_type.id) {
                    Some(existing) => *existing = training_type,
                    None => types.push(training_type),
                }
                (true, ())
            },
        )
        .await
    }

    async fn put_profile_impl(&self, user: &UserId, profile: &UserProfile) -> Result<()> {
        let key = keys::profile(user);
        self.modify(&key, |stored: &mut Option<UserProfile>| {
            *stored = Some(profile.clone());
            (true, ())
        })
        .await
    }
}

impl AttendanceBackend for FallbackBackend {
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
        let result = self
            .load::<AttendanceBlob>(&keys::attendance(user))
            .map(|mut blob| blob.remove(&date));
        futures_util::future::ready(result).boxed()
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
        futures_util::future::ready(self.read_shard_sync(user, shard)).boxed()
    }

    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

impl TrainingTypeBackend for FallbackBackend {
    fn list_types<'a>(&'a self, user: &'a UserId) -> BoxFuture<'a, Result<Vec<TrainingType>>> {
        futures_util::future::ready(self.load(&keys::training_types(user))).boxed()
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

impl ProfileBackend for FallbackBackend {
    fn get_profile<'a>(
        &'a self,
        user: &'a UserId,
    ) -> BoxFuture<'a, Result<Option<UserProfile>>> {
        futures_util::future::ready(self.load(&keys::profile(user))).boxed()
    }

    fn put_profile<'a>(
        &'a self,
        user: &'a UserId,
        profile: &'a UserProfile,
    ) -> BoxFuture<'a, Result<()>> {
        self.put_profile_impl(user, profile).boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryKeyValue;

    fn record(date: &str, type_id: Option<&str>) -> AttendanceRecord {
        AttendanceRecord::new(
            AttendanceDate::parse(date).unwrap(),
            Utc::now(),
            type_id.map(String::from),
            None,
        )
    }

    #[tokio::test]
    async fn test_blob_is_a_flat_date_map() {
        let kv = Arc::new(MemoryKeyValue::new());
        let backend = FallbackBackend::new(kv.clone());
        let user = UserId::new("u1").unwrap();

        backend
            .put_record(&user, record("2024-01-05", Some("a")))
            .await
            .unwrap();
        backend
            .put_record(&user, record("2024-02-10", None))
            .await
            .unwrap();

        let json = kv.get("attendance_u1").unwrap().unwrap();
        let blob: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(blob["2024-01-05"]["trainingTypeId"], "a");
        assert_eq!(blob["2024-02-10"]["date"], "2024-02-10");
    }

    #[tokio::test]
    async fn test_concurrent_marks_for_one_user_are_all_kept() {
        let backend = Arc::new(FallbackBackend::new(Arc::new(MemoryKeyValue::new())));
        let user = UserId::new("u1").unwrap();

        let mut handles = Vec::new();
        for day in 1..=20 {
            let backend = backend.clone();
            let user = user.clone();
            handles.push(tokio::spawn(async move {
                let date = format!("2024-03-{:02}", day);
                backend.put_record(&user, record(&date, None)).await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let shard = ShardKey::new(2024, 3).unwrap();
        assert_eq!(backend.read_shard(&user, shard).await.unwrap().len(), 20);
    }

    #[tokio::test]
    async fn test_missing_profile_reads_as_none() {
        let backend = FallbackBackend::new(Arc::new(MemoryKeyValue::new()));
        let user = UserId::new("u1").unwrap();
        assert!(backend.get_profile(&user).await.unwrap().is_none());
    }
}
