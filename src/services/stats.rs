// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Count-based statistics over a window of attendance records.
//!
//! All functions are pure and infallible: an empty window yields zero
//! counts, never an error.

use chrono::Datelike;
use std::collections::HashMap;

use crate::models::stats::{
    DEFAULT_TYPE_COLOR, DEFAULT_TYPE_ICON, UNTYPED_COLOR, UNTYPED_ICON, UNTYPED_ID, UNTYPED_NAME,
};
use crate::models::{AttendanceRecord, AttendanceSummary, ShardKey, TrainingType, WorkoutTypeStat};

/// Attendance count per month of `year`, January at index 0.
///
/// Records from other years are ignored.
pub fn monthly_breakdown(year: i32, records: &[AttendanceRecord]) -> [u32; 12] {
    let mut counts = [0u32; 12];
    for record in records {
        let date = record.date.naive();
        if date.year() == year {
            counts[date.month0() as usize] += 1;
        }
    }
    counts
}

/// Month and year totals for the stats header.
pub fn summary(shard: ShardKey, records: &[AttendanceRecord]) -> AttendanceSummary {
    let monthly_breakdown = monthly_breakdown(shard.year(), records);
    AttendanceSummary {
        year: shard.year(),
        month: shard.month(),
        monthly_count: monthly_breakdown[(shard.month() - 1) as usize],
        yearly_count: monthly_breakdown.iter().sum(),
        monthly_breakdown,
    }
}

/// Count records per training type.
///
/// Only types with at least one record are reported. Records whose type is
/// absent or not in `catalog` are merged into one untyped bucket. Sorted by
/// count descending; ties keep catalog order, with the untyped bucket last.
pub fn type_frequency(
    records: &[AttendanceRecord],
    catalog: &[TrainingType],
) -> Vec<WorkoutTypeStat> {
    let mut counts: HashMap<&str, u32> = HashMap::new();
    for record in records {
        if let Some(id) = record.training_type_id.as_deref() {
            *counts.entry(id).or_insert(0) += 1;
        }
    }

    let mut stats: Vec<WorkoutTypeStat> = Vec::new();
    let mut resolved = 0u32;
    for training_type in catalog {
        // A duplicated catalog entry must not count its records twice.
        let Some(count) = counts.remove(training_type.id.as_str()) else {
            continue;
        };
        resolved += count;
        stats.push(WorkoutTypeStat {
            type_id: training_type.id.clone(),
            name: training_type.name.clone(),
            icon: training_type
                .icon
                .clone()
                .filter(|i| !i.is_empty())
                .unwrap_or_else(|| DEFAULT_TYPE_ICON.to_string()),
            color: if training_type.color.is_empty() {
                DEFAULT_TYPE_COLOR.to_string()
            } else {
                training_type.color.clone()
            },
            count,
        });
    }

    let untyped = records.len() as u32 - resolved;
    if untyped > 0 {
        stats.push(WorkoutTypeStat {
            type_id: UNTYPED_ID.to_string(),
            name: UNTYPED_NAME.to_string(),
            icon: UNTYPED_ICON.to_string(),
            color: UNTYPED_COLOR.to_string(),
            count: untyped,
        });
    }

    // Stable sort keeps insertion order for ties.
    stats.sort_by(|a, b| b.count.cmp(&a.count));
    stats
}

/// [`type_frequency`] restricted to one month of the window.
pub fn type_frequency_for_month(
    shard: ShardKey,
    records: &[AttendanceRecord],
    catalog: &[TrainingType],
) -> Vec<WorkoutTypeStat> {
    let in_month: Vec<AttendanceRecord> = records
        .iter()
        .filter(|r| shard.contains(&r.date))
        .cloned()
        .collect();
    type_frequency(&in_month, catalog)
}

/// Largest count, never below 1, for scaling bar charts.
pub fn max_count(counts: impl IntoIterator<Item = u32>) -> u32 {
    counts.into_iter().fold(1, u32::max)
}

/// Sum of all bucket counts.
pub fn total(stats: &[WorkoutTypeStat]) -> u32 {
    stats.iter().map(|s| s.count).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AttendanceDate;
    use chrono::Utc;

    fn record(date: &str, type_id: Option<&str>) -> AttendanceRecord {
        AttendanceRecord::new(
            AttendanceDate::parse(date).unwrap(),
            Utc::now(),
            type_id.map(String::from),
            None,
        )
    }

    fn training_type(id: &str, name: &str) -> TrainingType {
        TrainingType {
            id: id.to_string(),
            name: name.to_string(),
            color: "#ff0000".to_string(),
            icon: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_unresolved_ids_fold_into_untyped() {
        let records = vec![
            record("2024-01-01", Some("A")),
            record("2024-01-02", None),
            record("2024-01-03", Some("missing-id")),
        ];
        let catalog = vec![training_type("A", "Cardio")];

        let stats = type_frequency(&records, &catalog);

        assert_eq!(stats.len(), 2);
        assert!(stats[0].is_untyped());
        assert_eq!(stats[0].count, 2);
        assert_eq!(stats[1].name, "Cardio");
        assert_eq!(stats[1].count, 1);
        assert_eq!(stats[1].icon, DEFAULT_TYPE_ICON);
        assert_eq!(total(&stats), 3);
    }

    #[test]
    fn test_ties_follow_catalog_order() {
        let records = vec![
            record("2024-01-01", Some("B")),
            record("2024-01-02", Some("A")),
            record("2024-01-03", None),
        ];
        let catalog = vec![training_type("A", "Cardio"), training_type("B", "Legs")];

        let names: Vec<String> = type_frequency(&records, &catalog)
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, ["Cardio", "Legs", UNTYPED_NAME]);
    }

    #[test]
    fn test_types_without_records_are_omitted() {
        let records = vec![record("2024-01-01", Some("A"))];
        let catalog = vec![training_type("A", "Cardio"), training_type("B", "Legs")];
        assert_eq!(type_frequency(&records, &catalog).len(), 1);
        assert!(type_frequency(&[], &catalog).is_empty());
    }

    #[test]
    fn test_monthly_breakdown_reports_every_month() {
        let records = vec![
            record("2024-01-01", None),
            record("2024-01-15", None),
            record("2024-12-31", None),
            record("2023-12-31", None),
        ];
        let counts = monthly_breakdown(2024, &records);
        assert_eq!(counts, [2, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1]);

        let s = summary(ShardKey::new(2024, 1).unwrap(), &records);
        assert_eq!(s.monthly_count, 2);
        assert_eq!(s.yearly_count, 3);
    }

    #[test]
    fn test_month_filter() {
        let records = vec![
            record("2024-01-01", Some("A")),
            record("2024-02-01", Some("A")),
            record("2024-02-02", None),
        ];
        let catalog = vec![training_type("A", "Cardio")];
        let stats = type_frequency_for_month(ShardKey::new(2024, 2).unwrap(), &records, &catalog);
        assert_eq!(total(&stats), 2);
    }

    #[test]
    fn test_max_count_floor() {
        assert_eq!(max_count([]), 1);
        assert_eq!(max_count([0, 0]), 1);
        assert_eq!(max_count([3, 7, 2]), 7);
    }
}
