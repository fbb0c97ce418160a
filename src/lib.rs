// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Gym-Tracker: record gym attendance and review it as calendars and stats
//!
//! This crate provides the backend API. Attendance is stored per user in
//! year-month shards, either in Firestore or, when Firestore is unavailable
//! at startup, in a local JSON key-value store.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use config::Config;
use db::Backend;
use services::{AttendanceStore, ProfileStore, TrainingTypeRegistry};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub backend: Backend,
    pub attendance: AttendanceStore,
    pub training_types: TrainingTypeRegistry,
    pub profiles: ProfileStore,
}

impl AppState {
    /// Wire every store to the same backend.
    pub fn new(config: Config, backend: Backend) -> Self {
        Self {
            attendance: AttendanceStore::new(&backend),
            training_types: TrainingTypeRegistry::new(&backend),
            profiles: ProfileStore::new(&backend),
            config,
            backend,
        }
    }
}
