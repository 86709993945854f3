use crate::{
    api::{error::ApiError, state::AppState},
    core::customer::{self, CustomerUpdate},
    entities::CustomerModel,
};
use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    routing::{get, put},
};
use tracing::info;

/// `/` and `/{id}`
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_customers))
        .route("/{id}", put(update_customer))
}

/// Every customer, by room.
#[tracing::instrument(name = "GET /api/customers", skip(state))]
pub async fn list_customers(
    State(state): State<AppState>,
) -> Result<Json<Vec<CustomerModel>>, ApiError> {
    let customers = customer::list_customers(&state.db).await?;
    Ok(Json(customers))
}

/// Validated partial update of one customer.
#[tracing::instrument(name = "PUT /api/customers/{id}", skip(state, payload))]
pub async fn update_customer(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    payload: Result<Json<CustomerUpdate>, JsonRejection>,
) -> Result<Json<CustomerModel>, ApiError> {
    let Json(update) = payload.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let updated = customer::update_customer(&state.db, id, update).await?;
    info!(customer_id = id, "Updated customer {}", updated.name);
    Ok(Json(updated))
}
