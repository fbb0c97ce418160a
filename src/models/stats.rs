// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Statistics derived from a window of attendance records.
//!
//! Nothing here is persisted: stats are recomputed from records and the
//! training type catalog each time they are requested.

use serde::Serialize;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Id of the synthetic bucket for records without a resolvable type.
pub const UNTYPED_ID: &str = "none";
pub const UNTYPED_NAME: &str = "No type";
pub const UNTYPED_ICON: &str = "❓";
pub const UNTYPED_COLOR: &str = "#94a3b8";

/// Icon shown for a type that has none.
pub const DEFAULT_TYPE_ICON: &str = "🏋️";
/// Color shown for a type with an empty color.
pub const DEFAULT_TYPE_COLOR: &str = "#6366f1";

/// Frequency of one workout type within a window.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutTypeStat {
    pub type_id: String,
    pub name: String,
    pub icon: String,
    pub color: String,
    pub count: u32,
}

impl WorkoutTypeStat {
    pub fn is_untyped(&self) -> bool {
        self.type_id == UNTYPED_ID
    }
}

/// Attendance counts for a selected month within a year.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceSummary {
    pub year: i32,
    /// 1-based month the `monthly_count` refers to
    pub month: u32,
    pub monthly_count: u32,
    pub yearly_count: u32,
    /// Count per month, January at index 0
    pub monthly_breakdown: [u32; 12],
}
