use crate::{
    api::{error::ApiError, state::AppState},
    errors::Error,
};
use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    routing::post,
};
use serde::{Deserialize, Serialize};
use tracing::info;

/// `/login`
pub fn routes() -> Router<AppState> {
    Router::new().route("/login", post(login))
}

/// Body of `POST /api/auth/login`
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Shared back-office password
    pub password: String,
}

/// Successful login
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// Always `true`; failures are error responses
    pub success: bool,
}

/// Checks the shared back-office password.
#[tracing::instrument(name = "POST /api/auth/login", skip_all)]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::bad_request(e.body_text()))?;

    if state.secrets.login_password.is_none() {
        return Err(ApiError::internal_error("LOGIN_PASSWORD is not configured"));
    }
    if !state.secrets.password_matches(&request.password) {
        return Err(Error::Unauthorized {
            message: "invalid password".to_string(),
        }
        .into());
    }

    info!("Back-office login succeeded");
    Ok(Json(LoginResponse { success: true }))
}
