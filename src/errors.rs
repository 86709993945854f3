//! Unified error type for store-ledger.
//!
//! Every fallible operation in the crate returns [`Result`]. The API layer maps
//! each variant onto an HTTP status in `api::error`.

use thiserror::Error;

/// All errors produced by the service.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration file or environment problem
    #[error("Configuration error: {message}")]
    Config {
        /// Human-readable description
        message: String,
    },

    /// Database error surfaced by sea-orm
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Month range outside `1 ≤ start ≤ end ≤ 12`
    #[error("Invalid month range: {start}..={end}")]
    InvalidRange {
        /// Requested first month
        start: u32,
        /// Requested last month
        end: u32,
    },

    /// Table name not on the allow-list for the requested surface
    #[error("Table not allowed: {table}")]
    TableNotAllowed {
        /// Rejected table name
        table: String,
    },

    /// Malformed row-store query
    #[error("Invalid query: {message}")]
    InvalidQuery {
        /// What was wrong with the query
        message: String,
    },

    /// Snapshot fetch failed on every attempt
    #[error("Fetch failed after {attempts} attempts: {message}")]
    FetchExhausted {
        /// Number of attempts made
        attempts: u32,
        /// Last underlying error
        message: String,
    },

    /// Field value rejected before reaching the database
    #[error("Validation error: {message}")]
    Validation {
        /// Which field and why
        message: String,
    },

    /// Requested record does not exist
    #[error("{entity} {id} not found")]
    NotFound {
        /// Entity kind, e.g. `"customer"`
        entity: &'static str,
        /// Identifier that was looked up
        id: i64,
    },

    /// Credentials rejected
    #[error("Unauthorized: {message}")]
    Unauthorized {
        /// Reason shown to the caller
        message: String,
    },

    /// I/O failure (binding the listener, reading files)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Missing or invalid environment variable
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    /// JSON (de)serialization failure
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
