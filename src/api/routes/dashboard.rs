//! Dashboard numbers: one aggregation over the session snapshot.
//!
//! Changing only `start`/`end` reuses the cached snapshot; a new `year` or
//! `refresh=true` refetches.

use crate::{
    api::{error::ApiError, state::AppState},
    core::{
        aggregate::{AggregateResult, aggregate},
        format::{format_period, format_won},
        grouping::{GroupSubtotal, group_subtotals},
        period::MonthRange,
        session::LoadStatus,
    },
};
use axum::{
    Json, Router,
    extract::{Query, State, rejection::QueryRejection},
    routing::get,
};
use chrono::Datelike;
use serde::{Deserialize, Serialize};
use tracing::info;

/// `/` and `/status`
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(dashboard))
        .route("/status", get(status))
}

/// Query string of `GET /api/dashboard`
#[derive(Debug, Deserialize)]
pub struct DashboardParams {
    /// Defaults to the current year
    pub year: Option<i32>,
    /// First month, default 1
    pub start: Option<u32>,
    /// Last month, default 12
    pub end: Option<u32>,
    /// Refetch even when the snapshot is cached
    #[serde(default)]
    pub refresh: bool,
}

/// Dashboard body
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    /// Aggregation output, flattened into the body
    #[serde(flatten)]
    pub result: AggregateResult,
    /// Grand profit over the range
    pub total_profit: f64,
    /// Subtotal cards in display order
    pub groups: Vec<GroupSubtotal>,
    /// e.g. "2024년 1월 ~ 12월"
    pub period: String,
}

/// Aggregates the selected period.
#[tracing::instrument(name = "GET /api/dashboard", skip(state, params))]
pub async fn dashboard(
    State(state): State<AppState>,
    params: Result<Query<DashboardParams>, QueryRejection>,
) -> Result<Json<DashboardResponse>, ApiError> {
    let Query(params) = params.map_err(|e| ApiError::bad_request(e.body_text()))?;

    let year = params.year.unwrap_or_else(|| chrono::Local::now().year());
    let range = MonthRange::new(params.start.unwrap_or(1), params.end.unwrap_or(12))?;

    let snapshot = state
        .session
        .snapshot_for(&state.db, year, params.refresh)
        .await?;
    let result = aggregate(&snapshot, state.config.studio_store_id, year, range);
    let groups = group_subtotals(&result, &state.config.grouping());
    let period = format_period(year, range);

    info!(
        period = %period,
        sales = %format_won(result.totals.sales),
        profit = %format_won(result.total_profit()),
        "Dashboard aggregated"
    );

    Ok(Json(DashboardResponse {
        total_profit: result.total_profit(),
        result,
        groups,
        period,
    }))
}

/// Current snapshot load status.
#[tracing::instrument(name = "GET /api/dashboard/status", skip(state))]
pub async fn status(State(state): State<AppState>) -> Json<LoadStatus> {
    Json(state.session.status().await)
}
