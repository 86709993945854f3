//! HTTP surface of the back office.
//!
//! ```text
//! POST /api/data              generic row queries
//! POST /api/supabase          privileged table actions
//! POST /api/auth/login        shared password check
//! GET  /api/customers         studio tenants
//! PUT  /api/customers/{id}
//! GET  /api/dashboard         aggregate + group subtotals
//! GET  /api/dashboard/status
//! GET  /health
//! ```

pub mod error;
mod routes;
pub mod state;

use axum::Router;
use state::AppState;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub use state::State;

/// Builds the full router over `state`.
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .merge(routes::data::routes())
        .merge(routes::supabase::routes())
        .nest("/auth", routes::auth::routes())
        .nest("/customers", routes::customers::routes())
        .nest("/dashboard", routes::dashboard::routes());

    Router::new()
        .nest("/api", api)
        .nest("/health", routes::health::routes())
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
}
