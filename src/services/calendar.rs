// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Calendar grid projections.
//!
//! Grids are pure functions of an [`AttendanceIndex`] and a reference date.
//! The index is rebuilt whenever the record window or the training type
//! catalog changes; it is never patched in place.

use chrono::{Datelike, Months, NaiveDate, TimeDelta};
use std::collections::HashMap;

use crate::models::{
    AttendanceDate, AttendanceRecord, CalendarDayCell, MonthBlock, ShardKey, TrainingType,
};

/// Cells in a month grid: six weeks of seven days.
pub const GRID_CELLS: usize = 42;

/// Lookup of attendance by date, with training type display data resolved.
#[derive(Debug, Clone, Default)]
pub struct AttendanceIndex {
    records: HashMap<AttendanceDate, AttendanceRecord>,
    icons: HashMap<AttendanceDate, String>,
    type_names: HashMap<AttendanceDate, String>,
}

impl AttendanceIndex {
    pub fn build(records: &[AttendanceRecord], catalog: &[TrainingType]) -> Self {
        let types: HashMap<&str, &TrainingType> =
            catalog.iter().map(|t| (t.id.as_str(), t)).collect();

        let mut index = Self::default();
        for record in records {
            let resolved = record
                .training_type_id
                .as_deref()
                .and_then(|id| types.get(id));

            if let Some(training_type) = resolved {
                index
                    .type_names
                    .insert(record.date, training_type.name.clone());
                if let Some(icon) = &training_type.icon {
                    index.icons.insert(record.date, icon.clone());
                }
            }
            index.records.insert(record.date, record.clone());
        }
        index
    }

    pub fn is_attended(&self, date: &AttendanceDate) -> bool {
        self.records.contains_key(date)
    }

    pub fn record(&self, date: &AttendanceDate) -> Option<&AttendanceRecord> {
        self.records.get(date)
    }

    pub fn icon(&self, date: &AttendanceDate) -> Option<&str> {
        self.icons.get(date).map(String::as_str)
    }

    /// Name of the training type on `date`, if it resolves.
    pub fn type_name(&self, date: &AttendanceDate) -> Option<&str> {
        self.type_names.get(date).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn cell(&self, date: NaiveDate, is_current_period: bool, today: NaiveDate) -> CalendarDayCell {
        let full_date = AttendanceDate::from_naive(date);
        let record = self.record(&full_date);

        CalendarDayCell {
            day_number: date.day(),
            full_date: Some(full_date),
            is_current_period,
            is_today: is_current_period && date == today,
            attended: record.is_some(),
            training_type_id: record.and_then(|r| r.training_type_id.clone()),
            icon: self.icon(&full_date).map(String::from),
        }
    }
}

/// First day of a shard's month.
fn first_day(shard: ShardKey) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(shard.year(), shard.month(), 1)
}

/// Leading cells before the 1st when weeks start on Sunday.
fn leading_days(first: NaiveDate) -> u32 {
    first.weekday().num_days_from_sunday()
}

fn days_in_month(first: NaiveDate) -> u32 {
    first
        .checked_add_months(Months::new(1))
        .and_then(|next| u32::try_from((next - first).num_days()).ok())
        .unwrap_or(0)
}

/// Six-week grid for one month, padded with the surrounding months' days.
pub fn month_grid(
    shard: ShardKey,
    index: &AttendanceIndex,
    today: NaiveDate,
) -> Vec<CalendarDayCell> {
    let Some(start) = first_day(shard)
        .and_then(|first| first.checked_sub_signed(TimeDelta::days(leading_days(first).into())))
    else {
        return Vec::new();
    };

    (0..GRID_CELLS as i64)
        .map_while(|offset| start.checked_add_signed(TimeDelta::days(offset)))
        .map(|date| {
            let in_month = date.year() == shard.year() && date.month() == shard.month();
            index.cell(date, in_month, today)
        })
        .collect()
}

/// Twelve month blocks for a yearly overview.
///
/// Each block starts with blank cells up to the weekday of the 1st and then
/// lists only that month's days.
pub fn year_grid(year: i32, index: &AttendanceIndex, today: NaiveDate) -> Vec<MonthBlock> {
    (1..=12)
        .filter_map(|month| ShardKey::new(year, month).ok())
        .filter_map(|shard| Some((shard, first_day(shard)?)))
        .map(|(shard, first)| {
            let blanks = leading_days(first) as usize;

            let mut days = vec![CalendarDayCell::blank(); blanks];
            days.extend(
                first
                    .iter_days()
                    .take(days_in_month(first) as usize)
                    .map(|date| index.cell(date, true, today)),
            );

            MonthBlock {
                month: shard.month() - 1,
                days,
            }
        })
        .collect()
}
