use crate::api::{error::ApiError, state::AppState};
use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;
use std::time::Instant;

/// `/` and `/db`
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(health))
        .route("/db", get(db_health))
}

/// Liveness body
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// `"ok"`
    pub status: String,
}

/// Database check body
#[derive(Debug, Serialize)]
pub struct DbHealthResponse {
    /// Round trip in milliseconds
    pub rtt: u128,
}

/// Liveness check.
#[tracing::instrument(name = "GET /health")]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// Pings the database.
#[tracing::instrument(name = "GET /health/db", skip(state))]
pub async fn db_health(State(state): State<AppState>) -> Result<Json<DbHealthResponse>, ApiError> {
    let now = Instant::now();
    state.db.ping().await.map_err(crate::errors::Error::from)?;
    Ok(Json(DbHealthResponse {
        rtt: now.elapsed().as_millis(),
    }))
}
