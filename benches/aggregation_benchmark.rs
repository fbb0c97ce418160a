use chrono::{Duration, NaiveDate, Utc};
use criterion::{criterion_group, criterion_main, Criterion};
use gym_tracker::models::{AttendanceDate, AttendanceRecord, ShardKey, TrainingType};
use gym_tracker::services::{calendar, stats, AttendanceIndex};
use std::hint::black_box;

/// A busy year: five sessions a week cycling through four types, plus some
/// records pointing at a type that no longer exists.
fn busy_year() -> (Vec<AttendanceRecord>, Vec<TrainingType>) {
    let catalog: Vec<TrainingType> = ["Cardio", "Legs", "Push", "Pull"]
        .iter()
        .enumerate()
        .map(|(i, name)| TrainingType {
            id: format!("type-{}", i),
            name: name.to_string(),
            color: "#6366f1".to_string(),
            icon: Some("🏋️".to_string()),
            created_at: Utc::now(),
        })
        .collect();

    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let records = (0..366)
        .filter(|d| d % 7 < 5)
        .map(|d| {
            let type_id = match d % 11 {
                0 => None,
                1 => Some("deleted".to_string()),
                n => Some(format!("type-{}", n % 4)),
            };
            AttendanceRecord::new(
                AttendanceDate::from_naive(start + Duration::days(d)),
                Utc::now(),
                type_id,
                None,
            )
        })
        .collect();

    (records, catalog)
}

fn benchmark_aggregation(c: &mut Criterion) {
    let (records, catalog) = busy_year();
    let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
    let june = ShardKey::new(2024, 6).unwrap();

    let mut group = c.benchmark_group("aggregation");

    group.bench_function("build_index", |b| {
        b.iter(|| AttendanceIndex::build(black_box(&records), black_box(&catalog)))
    });

    let index = AttendanceIndex::build(&records, &catalog);

    group.bench_function("month_grid", |b| {
        b.iter(|| calendar::month_grid(june, black_box(&index), today))
    });

    group.bench_function("year_grid", |b| {
        b.iter(|| calendar::year_grid(2024, black_box(&index), today))
    });

    group.bench_function("type_frequency_year", |b| {
        b.iter(|| stats::type_frequency(black_box(&records), black_box(&catalog)))
    });

    group.bench_function("monthly_breakdown", |b| {
        b.iter(|| stats::monthly_breakdown(2024, black_box(&records)))
    });

    group.finish();
}

criterion_group!(benches, benchmark_aggregation);
criterion_main!(benches);
