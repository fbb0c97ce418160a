// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::body::Body;
use axum::http::{header, Request, Response};
use gym_tracker::config::Config;
use gym_tracker::db::{Backend, FirestoreDocuments, MemoryDocuments, MemoryKeyValue};
use gym_tracker::middleware::auth::create_jwt;
use gym_tracker::models::UserId;
use gym_tracker::routes::create_router;
use gym_tracker::AppState;
use std::sync::Arc;

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a Firestore-backed backend connected to the emulator.
#[allow(dead_code)]
pub async fn test_remote_backend() -> Backend {
    let docs = FirestoreDocuments::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator");
    Backend::remote(Arc::new(docs))
}

/// One backend of each kind, both in memory.
#[allow(dead_code)]
pub fn both_backends() -> Vec<Backend> {
    vec![
        Backend::remote(Arc::new(MemoryDocuments::new())),
        Backend::fallback(Arc::new(MemoryKeyValue::new())),
    ]
}

/// A user id unique to this test run, for isolation on shared stores.
#[allow(dead_code)]
pub fn unique_user() -> UserId {
    use std::time::{SystemTime, UNIX_EPOCH};
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    UserId::new(format!("test-user-{}", nanos)).unwrap()
}

/// Create a test app over the given backend.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app_with_backend(backend: Backend) -> (axum::Router, Arc<AppState>) {
    let state = Arc::new(AppState::new(Config::test_default(), backend));
    (create_router(state.clone()), state)
}

/// Create a test app backed by in-memory local storage.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    create_test_app_with_backend(Backend::fallback(Arc::new(MemoryKeyValue::new())))
}

#[allow(dead_code)]
pub fn create_test_jwt(user_id: &str, signing_key: &[u8]) -> String {
    create_jwt(user_id, signing_key).expect("Failed to create JWT")
}

/// Build an authenticated request with an optional JSON body.
#[allow(dead_code)]
pub fn authed_request(
    state: &AppState,
    method: &str,
    uri: &str,
    body: Option<serde_json::Value>,
) -> Request<Body> {
    let token = create_test_jwt("user-1", &state.config.jwt_signing_key);
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token));

    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Read a response body as JSON.
#[allow(dead_code)]
pub async fn json_body(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
