//! HTTP error mapping.
//!
//! Handlers return `Result<_, ApiError>`; any [`crate::errors::Error`] converts
//! with `?` and picks its status from [`status_for`]. The body is always
//! `{"error": "<message>"}`.

use crate::errors::Error;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// Error returned by handlers, rendered as `{"error": message}`.
#[derive(Debug)]
pub struct ApiError {
    /// Response status
    pub status: StatusCode,
    /// Text of the `error` field
    pub message: String,
}

impl ApiError {
    /// Error with an explicit status.
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// 400, logged as a warning.
    pub fn bad_request(msg: impl Into<String>) -> Self {
        let msg = msg.into();
        tracing::warn!("Bad request: {}", msg);
        Self::new(StatusCode::BAD_REQUEST, msg)
    }

    /// 500, logged as an error.
    pub fn internal_error(msg: impl Into<String>) -> Self {
        let msg = msg.into();
        tracing::error!("Internal error: {}", msg);
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, msg)
    }
}

/// Status code for a crate error.
#[must_use]
pub const fn status_for(error: &Error) -> StatusCode {
    match error {
        Error::InvalidRange { .. }
        | Error::InvalidQuery { .. }
        | Error::Validation { .. }
        | Error::TableNotAllowed { .. }
        | Error::Json(_) => StatusCode::BAD_REQUEST,
        Error::NotFound { .. } => StatusCode::NOT_FOUND,
        Error::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
        Error::Config { .. }
        | Error::Database(_)
        | Error::FetchExhausted { .. }
        | Error::Io(_)
        | Error::EnvVar(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<Error> for ApiError {
    fn from(error: Error) -> Self {
        let status = status_for(&error);
        if status.is_server_error() {
            tracing::error!("Request failed: {}", error);
        } else {
            tracing::warn!("Request rejected: {}", error);
        }
        Self::new(status, error.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        #[derive(Serialize)]
        struct ErrorBody {
            error: String,
        }

        (
            self.status,
            Json(ErrorBody {
                error: self.message,
            }),
        )
            .into_response()
    }
}
