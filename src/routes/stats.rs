// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Calendar grids and statistics, computed per request from stored records.

use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::models::{AttendanceSummary, CalendarDayCell, MonthBlock, ShardKey, WorkoutTypeStat};
use crate::routes::api::{query_params, MonthQuery, YearQuery};
use crate::services::{calendar, stats, AttendanceIndex};
use crate::AppState;
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    routing::get,
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/calendar/month", get(get_month_calendar))
        .route("/api/calendar/year", get(get_year_calendar))
        .route("/api/stats", get(get_stats))
}

fn today() -> chrono::NaiveDate {
    chrono::Utc::now().date_naive()
}

// ─── Calendar ────────────────────────────────────────────────

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct MonthCalendarResponse {
    pub year: i32,
    pub month: u32,
    pub days: Vec<CalendarDayCell>,
}

/// Six-week grid; padding days show attendance too, so neighbours are loaded.
async fn get_month_calendar(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    query: std::result::Result<Query<MonthQuery>, QueryRejection>,
) -> Result<Json<MonthCalendarResponse>> {
    let q = query_params(query)?;
    let shard = ShardKey::new(q.year, q.month)?;

    let (records, catalog) = tokio::try_join!(
        state.attendance.get_range(&user.user_id, q.year, q.month),
        state.training_types.list(&user.user_id),
    )?;
    let index = AttendanceIndex::build(&records, &catalog);

    Ok(Json(MonthCalendarResponse {
        year: shard.year(),
        month: shard.month(),
        days: calendar::month_grid(shard, &index, today()),
    }))
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct YearCalendarResponse {
    pub year: i32,
    pub months: Vec<MonthBlock>,
}

async fn get_year_calendar(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    query: std::result::Result<Query<YearQuery>, QueryRejection>,
) -> Result<Json<YearCalendarResponse>> {
    let q = query_params(query)?;

    let (records, catalog) = tokio::try_join!(
        state.attendance.get_year(&user.user_id, q.year),
        state.training_types.list(&user.user_id),
    )?;
    let index = AttendanceIndex::build(&records, &catalog);

    Ok(Json(YearCalendarResponse {
        year: q.year,
        months: calendar::year_grid(q.year, &index, today()),
    }))
}

// ─── Stats ───────────────────────────────────────────────────

#[derive(Deserialize)]
struct StatsQuery {
    year: i32,
    /// Narrows type frequencies to one month (1-12)
    month: Option<u32>,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub year: i32,
    pub yearly_count: u32,
    pub monthly_breakdown: [u32; 12],
    /// Largest monthly count, at least 1
    pub max_monthly: u32,
    /// Present when a month was requested
    pub summary: Option<AttendanceSummary>,
    pub types: Vec<WorkoutTypeStat>,
    pub type_total: u32,
    /// Largest type count, at least 1
    pub max_type_count: u32,
}

async fn get_stats(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    query: std::result::Result<Query<StatsQuery>, QueryRejection>,
) -> Result<Json<StatsResponse>> {
    let q = query_params(query)?;
    let shard = q.month.map(|m| ShardKey::new(q.year, m)).transpose()?;

    let (records, catalog) = tokio::try_join!(
        state.attendance.get_year(&user.user_id, q.year),
        state.training_types.list(&user.user_id),
    )?;

    let monthly_breakdown = stats::monthly_breakdown(q.year, &records);
    let types = match shard {
        Some(shard) => stats::type_frequency_for_month(shard, &records, &catalog),
        None => stats::type_frequency(&records, &catalog),
    };

    tracing::debug!(
        user_id = %user.user_id,
        year = q.year,
        month = ?q.month,
        records = records.len(),
        "Stats computed"
    );

    Ok(Json(StatsResponse {
        year: q.year,
        yearly_count: monthly_breakdown.iter().sum(),
        monthly_breakdown,
        max_monthly: stats::max_count(monthly_breakdown),
        summary: shard.map(|s| stats::summary(s, &records)),
        type_total: stats::total(&types),
        max_type_count: stats::max_count(types.iter().map(|t| t.count)),
        types,
    }))
}
