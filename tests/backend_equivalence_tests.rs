// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! The remote and local backends must be indistinguishable through the
//! stores: the same operations give the same observable results.

use gym_tracker::db::{Backend, MemoryDocuments, MemoryKeyValue};
use gym_tracker::error::AppError;
use gym_tracker::models::{NewTrainingType, TrainingTypePatch, UserId};
use gym_tracker::services::{AttendanceStore, TrainingTypeRegistry};
use std::sync::Arc;
use std::time::Duration;

mod common;

/// What a user would see after a scripted session, with generated ids and
/// timestamps stripped.
#[derive(Debug, PartialEq)]
struct Observed {
    year: Vec<(String, Option<String>, Option<String>)>,
    february: Vec<String>,
    types: Vec<(String, String, Option<String>)>,
}

async fn run_script(backend: &Backend) -> Observed {
    let user = UserId::new("script-user").unwrap();
    let attendance = AttendanceStore::new(backend);
    let registry = TrainingTypeRegistry::new(backend);

    let cardio = registry
        .create(
            &user,
            NewTrainingType {
                name: "Cardio".to_string(),
                color: "#ef4444".to_string(),
                icon: Some("🏃".to_string()),
            },
        )
        .await
        .unwrap();
    let legs = registry
        .create(
            &user,
            NewTrainingType {
                name: "Legs".to_string(),
                color: "#22c55e".to_string(),
                icon: None,
            },
        )
        .await
        .unwrap();

    registry
        .update(
            &user,
            &legs.id,
            TrainingTypePatch {
                name: Some("Leg day".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    attendance
        .mark(&user, "2024-12-31", Some(cardio.id.clone()), None)
        .await
        .unwrap();
    attendance
        .mark(&user, "2024-02-29", Some(legs.id.clone()), Some("heavy".into()))
        .await
        .unwrap();
    attendance.mark(&user, "2024-01-01", None, None).await.unwrap();
    attendance.mark(&user, "2024-02-01", None, None).await.unwrap();
    // Re-marking replaces the whole record.
    attendance
        .mark(&user, "2024-02-01", Some(cardio.id.clone()), None)
        .await
        .unwrap();
    attendance.toggle(&user, "2024-06-15").await.unwrap();
    attendance.toggle(&user, "2024-06-15").await.unwrap();
    attendance.remove(&user, "2024-03-03").await.unwrap();
    attendance
        .set_details(&user, "2024-01-01", None, Some("first day".into()))
        .await
        .unwrap();

    registry.delete(&user, &cardio.id).await.unwrap();
    registry.delete(&user, &cardio.id).await.unwrap();

    let type_name = |id: &Option<String>| {
        id.as_ref().map(|id| {
            if *id == cardio.id {
                "cardio".to_string()
            } else if *id == legs.id {
                "legs".to_string()
            } else {
                id.clone()
            }
        })
    };

    let year = attendance
        .get_year(&user, 2024)
        .await
        .unwrap()
        .into_iter()
        .map(|r| (r.date.to_string(), type_name(&r.training_type_id), r.notes))
        .collect();

    let february = attendance
        .get_month(&user, 2024, 2)
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.date.to_string())
        .collect();

    let types = registry
        .list(&user)
        .await
        .unwrap()
        .into_iter()
        .map(|t| (t.name, t.color, t.icon))
        .collect();

    Observed {
        year,
        february,
        types,
    }
}

#[tokio::test]
async fn test_backends_observe_the_same_state() {
    let backends = common::both_backends();
    let remote = run_script(&backends[0]).await;
    let local = run_script(&backends[1]).await;

    assert_eq!(remote, local);
    assert_eq!(
        remote.year,
        [
            ("2024-01-01".to_string(), None, Some("first day".to_string())),
            ("2024-02-01".to_string(), Some("cardio".to_string()), None),
            (
                "2024-02-29".to_string(),
                Some("legs".to_string()),
                Some("heavy".to_string())
            ),
            ("2024-12-31".to_string(), Some("cardio".to_string()), None),
        ]
    );
    assert_eq!(remote.february, ["2024-02-01", "2024-02-29"]);
    assert_eq!(
        remote.types,
        [("Leg day".to_string(), "#22c55e".to_string(), None)]
    );
}

#[tokio::test]
async fn test_year_order_independent_of_completion_order() {
    // Early months answer slowest, so reads finish in reverse order.
    let docs = MemoryDocuments::new().with_list_delay(|collection| {
        let month: u64 = collection
            .parents
            .last()
            .and_then(|(_, shard)| shard.get(5..7))
            .and_then(|m| m.parse().ok())
            .unwrap_or(0);
        Duration::from_millis((13 - month) * 5)
    });
    let backend = Backend::remote(Arc::new(docs));
    let store = AttendanceStore::new(&backend);
    let user = UserId::new("u1").unwrap();

    for date in ["2024-11-02", "2024-01-20", "2024-06-01", "2024-01-03", "2024-12-31"] {
        store.mark(&user, date, None, None).await.unwrap();
    }

    let dates: Vec<String> = store
        .get_year(&user, 2024)
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.date.to_string())
        .collect();
    assert_eq!(
        dates,
        ["2024-01-03", "2024-01-20", "2024-06-01", "2024-11-02", "2024-12-31"]
    );

    let range: Vec<String> = store
        .get_range(&user, 2024, 12)
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.date.to_string())
        .collect();
    assert_eq!(range, ["2024-11-02", "2024-12-31"]);
}

#[tokio::test]
async fn test_range_crosses_year_boundary() {
    for backend in common::both_backends() {
        let store = AttendanceStore::new(&backend);
        let user = UserId::new("u1").unwrap();

        for date in ["2023-12-31", "2024-01-15", "2024-02-01", "2024-03-01"] {
            store.mark(&user, date, None, None).await.unwrap();
        }

        let dates: Vec<String> = store
            .get_range(&user, 2024, 1)
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.date.to_string())
            .collect();
        assert_eq!(dates, ["2023-12-31", "2024-01-15", "2024-02-01"]);
    }
}

#[tokio::test]
async fn test_failures_surface_on_both_backends() {
    let docs = Arc::new(MemoryDocuments::new());
    let kv = Arc::new(MemoryKeyValue::new());
    let user = UserId::new("u1").unwrap();

    let remote = AttendanceStore::new(&Backend::remote(docs.clone()));
    let local = AttendanceStore::new(&Backend::fallback(kv.clone()));
    docs.set_offline(true);
    kv.set_offline(true);

    for store in [remote, local] {
        let err = store.mark(&user, "2024-01-01", None, None).await.unwrap_err();
        assert!(err.is_transient());

        let err = store.get_year(&user, 2024).await.unwrap_err();
        assert!(matches!(err, AppError::StoreUnavailable(_)));

        // Validation happens before any I/O.
        let err = store.mark(&user, "2024-1-1", None, None).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidDate(_)));
    }
}
