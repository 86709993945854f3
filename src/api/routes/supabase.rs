//! Privileged table actions for the settings screens.
//!
//! Unlike `/api/data`, failures are reported as `{success: false, message}`
//! and the table list is narrower. When a service-role key is configured the
//! caller must present it as a bearer token.

use crate::{
    api::state::AppState,
    errors::{self, Error},
    rows::{QueryKind, query::equality_filters},
};
use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    routing::post,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use tracing::{error, info, warn};

/// `/supabase`
pub fn routes() -> Router<AppState> {
    Router::new().route("/supabase", post(table_action))
}

/// Body of `POST /api/supabase`
#[derive(Debug, Deserialize)]
pub struct ActionRequest {
    /// Operation to run
    pub action: QueryKind,
    /// Target table, checked against the action allow-list
    pub table: String,
    /// Row for insert, values for update
    #[serde(default)]
    pub data: Option<JsonValue>,
    /// Equality filters, `{column: value}`
    #[serde(default)]
    pub filters: Option<Map<String, JsonValue>>,
}

/// `{success, data?, message?}`
#[derive(Debug, Serialize)]
pub struct ActionResponse {
    /// Whether the action ran
    pub success: bool,
    /// Affected rows on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<JsonValue>>,
    /// Failure reason
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

fn failure(status: StatusCode, message: impl Into<String>) -> (StatusCode, Json<ActionResponse>) {
    (
        status,
        Json(ActionResponse {
            success: false,
            data: None,
            message: Some(message.into()),
        }),
    )
}

/// Runs one table action for the settings screens.
#[tracing::instrument(name = "POST /api/supabase", skip(state, headers, payload))]
pub async fn table_action(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<ActionRequest>, JsonRejection>,
) -> (StatusCode, Json<ActionResponse>) {
    let authorization = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok());
    if !state.secrets.authorizes_service_role(authorization) {
        warn!("Table action rejected: missing or invalid service role key");
        return failure(StatusCode::FORBIDDEN, "Forbidden");
    }

    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(e) => return failure(StatusCode::BAD_REQUEST, e.body_text()),
    };

    if !state.action_rows.tables().allows(&request.table) {
        warn!(table = %request.table, "Table action rejected: table not allowed");
        return failure(
            StatusCode::FORBIDDEN,
            format!("Table not allowed: {}", request.table),
        );
    }

    match run_action(&state, &request).await {
        Ok(rows) => {
            if request.action.is_write() {
                info!(table = %request.table, action = ?request.action, "Table action applied");
                state.session.invalidate().await;
            }
            (
                StatusCode::OK,
                Json(ActionResponse {
                    success: true,
                    data: Some(rows),
                    message: None,
                }),
            )
        }
        Err(e) => {
            error!(table = %request.table, "Table action failed: {}", e);
            failure(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

async fn run_action(state: &AppState, request: &ActionRequest) -> errors::Result<Vec<JsonValue>> {
    let rows = &state.action_rows;
    let table = request.table.as_str();
    let filters = request
        .filters
        .as_ref()
        .map(equality_filters)
        .unwrap_or_default();
    let missing_data = || Error::InvalidQuery {
        message: "data is required".to_string(),
    };

    match request.action {
        QueryKind::Select => rows.select(table, None, &filters, &[]).await,
        QueryKind::Insert => {
            let data = request.data.as_ref().ok_or_else(missing_data)?;
            rows.insert(table, data).await
        }
        QueryKind::Update => {
            let data = request
                .data
                .as_ref()
                .and_then(JsonValue::as_object)
                .ok_or_else(missing_data)?;
            rows.update(table, data, &filters).await
        }
        QueryKind::Delete => rows.delete(table, &filters).await,
    }
}
