// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Authentication boundary tests for the API.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use tower::ServiceExt;

mod common;

#[tokio::test]
async fn test_health_is_public() {
    let (app, _) = common::create_test_app();

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = common::json_body(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["backend"], "fallback");
}

#[tokio::test]
async fn test_api_requires_token() {
    let (app, _) = common::create_test_app();

    for uri in [
        "/api/types",
        "/api/attendance/month?year=2024&month=1",
        "/api/stats?year=2024",
        "/api/profile",
    ] {
        let response = app
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{}", uri);
    }
}

#[tokio::test]
async fn test_token_signed_with_other_key_rejected() {
    let (app, _) = common::create_test_app();
    let token = common::create_test_jwt("user-1", b"some_other_key_that_is_32_bytes!");

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/types")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_empty_subject_rejected() {
    let (app, state) = common::create_test_app();
    let token = common::create_test_jwt("", &state.config.jwt_signing_key);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/types")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_session_cookie_accepted() {
    let (app, state) = common::create_test_app();
    let token = common::create_test_jwt("user-1", &state.config.jwt_signing_key);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/backend")
                .header(header::COOKIE, format!("gym_token={}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = common::json_body(response).await;
    assert_eq!(body["using_fallback"], true);
}

#[tokio::test]
async fn test_users_do_not_see_each_other() {
    let (app, state) = common::create_test_app();
    let alice = common::create_test_jwt("alice", &state.config.jwt_signing_key);
    let bob = common::create_test_jwt("bob", &state.config.jwt_signing_key);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/api/attendance/2024-03-05")
                .header(header::AUTHORIZATION, format!("Bearer {}", alice))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{}"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/attendance/month?year=2024&month=3")
                .header(header::AUTHORIZATION, format!("Bearer {}", bob))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let body = common::json_body(response).await;
    assert_eq!(body.as_array().unwrap().len(), 0);
}
