// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the application.

pub mod attendance;
pub mod calendar;
pub mod stats;
pub mod training_type;
pub mod user;

pub use attendance::{AttendanceDate, AttendanceRecord, ShardKey, UserId};
pub use calendar::{CalendarDayCell, MonthBlock};
pub use stats::{AttendanceSummary, WorkoutTypeStat};
pub use training_type::{NewTrainingType, TrainingType, TrainingTypePatch};
pub use user::{ProfileUpdate, UserProfile};
