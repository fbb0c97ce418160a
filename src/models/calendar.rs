// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Calendar projections. Derived from attendance records, never stored.

use serde::Serialize;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use super::AttendanceDate;

/// One cell of a calendar grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct CalendarDayCell {
    /// Day of month, or 0 for an alignment blank in the yearly view
    pub day_number: u32,
    /// None only for alignment blanks
    #[cfg_attr(feature = "binding-generation", ts(type = "string | null"))]
    pub full_date: Option<AttendanceDate>,
    pub is_current_period: bool,
    pub is_today: bool,
    pub attended: bool,
    pub training_type_id: Option<String>,
    /// Icon of the resolved training type, if any
    pub icon: Option<String>,
}

impl CalendarDayCell {
    pub(crate) fn blank() -> Self {
        Self {
            day_number: 0,
            full_date: None,
            is_current_period: false,
            is_today: false,
            attended: false,
            training_type_id: None,
            icon: None,
        }
    }

    pub fn is_blank(&self) -> bool {
        self.full_date.is_none()
    }
}

/// One month of the yearly calendar.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct MonthBlock {
    /// 0-based month index
    pub month: u32,
    pub days: Vec<CalendarDayCell>,
}
