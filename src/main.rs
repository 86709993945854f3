use dotenvy::dotenv;
use std::sync::Arc;
use store_ledger::{
    api::{self, State},
    config::{database, secrets::Secrets, settings},
    errors::Result,
};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; variables may also come from the environment
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Load config.toml and secrets
    let app_config = settings::load_app_configuration()
        .inspect_err(|e| error!("Critical error loading application configuration: {}", e))?;
    let secrets = Secrets::from_env();
    if secrets.login_password.is_none() {
        warn!("LOGIN_PASSWORD is not set; login requests will fail");
    }
    info!(?secrets, "Successfully processed application configuration.");

    // 4. Connect, create missing tables and seed the store roster
    let db = database::create_connection()
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db)
        .await
        .inspect(|_| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to create tables: {}", e))?;
    let seeded = database::seed_stores(&db, &app_config.stores)
        .await
        .inspect_err(|e| error!("Failed to seed stores: {}", e))?;
    if seeded > 0 {
        info!("Seeded {} stores from configuration.", seeded);
    }

    // 5. Serve
    let bind = app_config.server.bind.clone();
    let state = Arc::new(State::new(db, app_config, secrets));
    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .inspect_err(|e| error!("Failed to bind {}: {}", bind, e))?;
    info!("Listening on {}", bind);

    axum::serve(listener, api::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped.");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
    }
}
