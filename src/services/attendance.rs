// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Sharded attendance store.
//!
//! Records are partitioned by year-month. Multi-month reads fan out to all
//! shards at once and reassemble results in shard order, so output is
//! deterministic regardless of which read finishes first.

use futures_util::future::try_join_all;
use std::sync::Arc;

use crate::db::{AttendanceBackend, Backend};
use crate::error::{AppError, Result};
use crate::models::{AttendanceDate, AttendanceRecord, ShardKey, UserId};

/// Attendance operations over the active backend.
#[derive(Clone)]
pub struct AttendanceStore {
    backend: Arc<dyn AttendanceBackend>,
}

impl AttendanceStore {
    pub fn new(backend: &Backend) -> Self {
        Self {
            backend: backend.attendance.clone(),
        }
    }

    /// Mark a day as attended, replacing any existing record for that day.
    ///
    /// Re-issuing the same call after a failure is always safe.
    pub async fn mark(
        &self,
        user: &UserId,
        date: &str,
        training_type_id: Option<String>,
        notes: Option<String>,
    ) -> Result<AttendanceRecord> {
        let date = AttendanceDate::parse(date)?;
        let record = AttendanceRecord::new(date, self.backend.now(), training_type_id, notes);

        self.backend.put_record(user, record.clone()).await?;
        tracing::info!(user_id = %user, date = %date, shard = %date.shard(), "Attendance marked");
        Ok(record)
    }

    /// Remove a day. Removing a day that was never marked succeeds.
    pub async fn remove(&self, user: &UserId, date: &str) -> Result<()> {
        let date = AttendanceDate::parse(date)?;
        self.backend.delete_record(user, date).await?;
        tracing::info!(user_id = %user, date = %date, "Attendance removed");
        Ok(())
    }

    /// Change the type and notes of an already attended day.
    ///
    /// The record keeps its original timestamp.
    pub async fn set_details(
        &self,
        user: &UserId,
        date: &str,
        training_type_id: Option<String>,
        notes: Option<String>,
    ) -> Result<AttendanceRecord> {
        let date = AttendanceDate::parse(date)?;
        let existing = self
            .backend
            .get_record(user, date)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("No attendance on {}", date)))?;

        let record = AttendanceRecord::new(date, existing.timestamp, training_type_id, notes);
        self.backend.put_record(user, record.clone()).await?;
        tracing::info!(user_id = %user, date = %date, "Attendance details updated");
        Ok(record)
    }

    /// Flip a day between attended and not attended.
    ///
    /// Returns `true` if the day is attended afterwards.
    pub async fn toggle(&self, user: &UserId, date: &str) -> Result<bool> {
        let parsed = AttendanceDate::parse(date)?;
        let exists = self.backend.get_record(user, parsed).await?.is_some();

        if exists {
            self.remove(user, date).await?;
            Ok(false)
        } else {
            self.mark(user, date, None, None).await?;
            Ok(true)
        }
    }

    /// Records of one month (1-12), ordered by date.
    pub async fn get_month(
        &self,
        user: &UserId,
        year: i32,
        month: u32,
    ) -> Result<Vec<AttendanceRecord>> {
        let shard = ShardKey::new(year, month)?;
        self.read_shard(user, shard).await
    }

    /// Records of a whole year, ordered by date.
    pub async fn get_year(&self, user: &UserId, year: i32) -> Result<Vec<AttendanceRecord>> {
        let shards = ShardKey::months_of(year)?;
        let records = self.read_shards(user, &shards).await?;
        tracing::debug!(user_id = %user, year, count = records.len(), "Year loaded");
        Ok(records)
    }

    /// Records of the month before, the given month, and the month after.
    pub async fn get_range(
        &self,
        user: &UserId,
        center_year: i32,
        center_month: u32,
    ) -> Result<Vec<AttendanceRecord>> {
        let center = ShardKey::new(center_year, center_month)?;
        self.read_shards(user, &[center.previous(), center, center.next()])
            .await
    }

    /// Issue every shard read before awaiting any, then concatenate in the
    /// order of `shards`.
    async fn read_shards(
        &self,
        user: &UserId,
        shards: &[ShardKey],
    ) -> Result<Vec<AttendanceRecord>> {
        let reads = shards.iter().map(|&shard| self.read_shard(user, shard));
        let per_shard = try_join_all(reads).await?;
        Ok(per_shard.into_iter().flatten().collect())
    }

    async fn read_shard(&self, user: &UserId, shard: ShardKey) -> Result<Vec<AttendanceRecord>> {
        let mut records = self.backend.read_shard(user, shard).await?;

        let before = records.len();
        records.retain(|record| shard.contains(&record.date));
        if records.len() != before {
            tracing::warn!(
                user_id = %user,
                shard = %shard,
                dropped = before - records.len(),
                "Ignoring records stored under the wrong shard"
            );
        }

        records.sort_by_key(|record| record.date);
        Ok(records)
    }
}
