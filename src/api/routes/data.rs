use crate::{
    api::{error::ApiError, state::AppState},
    rows::RowQuery,
};
use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    routing::post,
};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use tracing::info;

/// `/data`
pub fn routes() -> Router<AppState> {
    Router::new().route("/data", post(query_rows))
}

/// Body of `POST /api/data`
#[derive(Debug, Deserialize)]
pub struct DataRequest {
    /// Target table, checked against the data allow-list
    pub table: String,
    /// Operation to run
    pub query: RowQuery,
}

/// Rows returned by `POST /api/data`
#[derive(Debug, Serialize)]
pub struct DataResponse {
    /// Selected or affected rows
    pub data: Vec<JsonValue>,
}

/// Runs one row query against the data allow-list.
#[tracing::instrument(name = "POST /api/data", skip(state, payload))]
pub async fn query_rows(
    State(state): State<AppState>,
    payload: Result<Json<DataRequest>, JsonRejection>,
) -> Result<Json<DataResponse>, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::bad_request(e.body_text()))?;

    let data = state
        .data_rows
        .execute(&request.table, &request.query)
        .await?;

    if request.query.kind.is_write() {
        info!(
            table = %request.table,
            rows = data.len(),
            "Rows written, dashboard invalidated"
        );
        state.session.invalidate().await;
    }

    Ok(Json(DataResponse { data }))
}
