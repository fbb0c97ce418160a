// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod attendance;
pub mod calendar;
pub mod profile;
pub mod stats;
pub mod training_types;

pub use attendance::AttendanceStore;
pub use calendar::{month_grid, year_grid, AttendanceIndex};
pub use profile::ProfileStore;
pub use training_types::TrainingTypeRegistry;
