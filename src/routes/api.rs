// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API routes for authenticated users: attendance, training types, profile.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{
    AttendanceRecord, NewTrainingType, ProfileUpdate, TrainingType, TrainingTypePatch,
    UserProfile,
};
use crate::AppState;
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    routing::{get, patch, post, put},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// API routes (require authentication via JWT).
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/backend", get(get_backend))
        .route("/api/attendance/month", get(get_month))
        .route("/api/attendance/year", get(get_year))
        .route("/api/attendance/range", get(get_range))
        .route(
            "/api/attendance/{date}",
            put(mark_attendance)
                .patch(update_attendance)
                .delete(remove_attendance),
        )
        .route("/api/attendance/{date}/toggle", post(toggle_attendance))
        .route("/api/types", get(list_types).post(create_type))
        .route("/api/types/{id}", patch(update_type).delete(delete_type))
        .route("/api/profile", get(get_profile).put(put_profile))
        .route("/api/profile/login", post(record_login))
}

/// Unwrap a JSON body, reporting malformed input as 400.
pub(crate) fn json_body<T>(payload: std::result::Result<Json<T>, JsonRejection>) -> Result<T> {
    payload
        .map(|Json(body)| body)
        .map_err(|e| AppError::BadRequest(e.body_text()))
}

/// Like [`json_body`], but a request without a JSON content type yields the
/// default body.
pub(crate) fn optional_json_body<T: Default>(
    payload: std::result::Result<Option<Json<T>>, JsonRejection>,
) -> Result<T> {
    payload
        .map(|body| body.map(|Json(body)| body).unwrap_or_default())
        .map_err(|e| AppError::BadRequest(e.body_text()))
}

/// Unwrap query parameters, reporting malformed input as 400.
pub(crate) fn query_params<T>(query: std::result::Result<Query<T>, QueryRejection>) -> Result<T> {
    query
        .map(|Query(params)| params)
        .map_err(|e| AppError::BadRequest(e.body_text()))
}

// ─── Backend ─────────────────────────────────────────────────

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct BackendResponse {
    pub mode: String,
    pub using_fallback: bool,
}

/// Which storage backend serves this process.
async fn get_backend(State(state): State<Arc<AppState>>) -> Json<BackendResponse> {
    Json(BackendResponse {
        mode: state.backend.mode().to_string(),
        using_fallback: state.backend.is_using_fallback(),
    })
}

// ─── Attendance ──────────────────────────────────────────────

#[derive(Deserialize)]
pub(crate) struct MonthQuery {
    pub year: i32,
    /// 1-12
    pub month: u32,
}

#[derive(Deserialize)]
pub(crate) struct YearQuery {
    pub year: i32,
}

async fn get_month(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    query: std::result::Result<Query<MonthQuery>, QueryRejection>,
) -> Result<Json<Vec<AttendanceRecord>>> {
    let q = query_params(query)?;
    let records = state
        .attendance
        .get_month(&user.user_id, q.year, q.month)
        .await?;
    Ok(Json(records))
}

async fn get_year(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    query: std::result::Result<Query<YearQuery>, QueryRejection>,
) -> Result<Json<Vec<AttendanceRecord>>> {
    let q = query_params(query)?;
    let records = state.attendance.get_year(&user.user_id, q.year).await?;
    Ok(Json(records))
}

/// The given month and its two neighbours.
async fn get_range(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    query: std::result::Result<Query<MonthQuery>, QueryRejection>,
) -> Result<Json<Vec<AttendanceRecord>>> {
    let q = query_params(query)?;
    let records = state
        .attendance
        .get_range(&user.user_id, q.year, q.month)
        .await?;
    Ok(Json(records))
}

/// Optional details of an attended day.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceBody {
    #[serde(default)]
    pub training_type_id: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

async fn mark_attendance(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(date): Path<String>,
    payload: std::result::Result<Option<Json<AttendanceBody>>, JsonRejection>,
) -> Result<Json<AttendanceRecord>> {
    let body = optional_json_body(payload)?;
    let record = state
        .attendance
        .mark(&user.user_id, &date, body.training_type_id, body.notes)
        .await?;
    Ok(Json(record))
}

async fn update_attendance(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(date): Path<String>,
    payload: std::result::Result<Json<AttendanceBody>, JsonRejection>,
) -> Result<Json<AttendanceRecord>> {
    let body = json_body(payload)?;
    let record = state
        .attendance
        .set_details(&user.user_id, &date, body.training_type_id, body.notes)
        .await?;
    Ok(Json(record))
}

async fn remove_attendance(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(date): Path<String>,
) -> Result<StatusCode> {
    state.attendance.remove(&user.user_id, &date).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ToggleResponse {
    pub date: String,
    pub attended: bool,
}

async fn toggle_attendance(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(date): Path<String>,
) -> Result<Json<ToggleResponse>> {
    let attended = state.attendance.toggle(&user.user_id, &date).await?;
    Ok(Json(ToggleResponse { date, attended }))
}

// ─── Training Types ──────────────────────────────────────────

async fn list_types(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<TrainingType>>> {
    Ok(Json(state.training_types.list(&user.user_id).await?))
}

async fn create_type(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    payload: std::result::Result<Json<NewTrainingType>, JsonRejection>,
) -> Result<(StatusCode, Json<TrainingType>)> {
    let data = json_body(payload)?;
    let created = state.training_types.create(&user.user_id, data).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_type(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    payload: std::result::Result<Json<TrainingTypePatch>, JsonRejection>,
) -> Result<Json<TrainingType>> {
    let patch = json_body(payload)?;
    let updated = state
        .training_types
        .update(&user.user_id, &id, patch)
        .await?;
    Ok(Json(updated))
}

async fn delete_type(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    state.training_types.delete(&user.user_id, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ─── User Profile ────────────────────────────────────────────

async fn get_profile(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<UserProfile>> {
    let profile = state
        .profiles
        .get(&user.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", user.user_id)))?;
    Ok(Json(profile))
}

async fn put_profile(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    payload: std::result::Result<Json<ProfileUpdate>, JsonRejection>,
) -> Result<Json<UserProfile>> {
    let update = json_body(payload)?;
    let profile = state.profiles.upsert(&user.user_id, &update).await?;
    Ok(Json(profile))
}

/// Record a sign-in, creating the profile on first use.
async fn record_login(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<UserProfile>> {
    let profile = state.profiles.touch_login(&user.user_id).await?;
    tracing::info!(user_id = %user.user_id, "User signed in");
    Ok(Json(profile))
}
