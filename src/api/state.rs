//! Shared handler state.

use crate::{
    config::{secrets::Secrets, settings::AppConfig},
    core::{session::DashboardSession, snapshot::RetryPolicy},
    rows::{RowStore, TableAllowList},
};
use sea_orm::DatabaseConnection;
use std::sync::Arc;

/// Router state handed to every handler.
pub type AppState = Arc<State>;

/// Everything the handlers share.
#[derive(Debug)]
pub struct State {
    /// Database handle
    pub db: DatabaseConnection,
    /// Loaded `config.toml`
    pub config: AppConfig,
    /// Passwords and keys from the environment
    pub secrets: Secrets,
    /// Cached dashboard snapshot
    pub session: DashboardSession,
    /// Tables reachable through `/api/data`
    pub data_rows: RowStore,
    /// Tables reachable through `/api/supabase`
    pub action_rows: RowStore,
}

impl State {
    /// Builds both row stores from the configured allow-lists.
    #[must_use]
    pub fn new(db: DatabaseConnection, config: AppConfig, secrets: Secrets) -> Self {
        let data_rows = RowStore::new(db.clone(), TableAllowList::new(config.tables.data.clone()));
        let action_rows = RowStore::new(
            db.clone(),
            TableAllowList::new(config.tables.actions.clone()),
        );
        let session = DashboardSession::new(RetryPolicy::from(config.retry));

        Self {
            db,
            config,
            secrets,
            session,
            data_rows,
            action_rows,
        }
    }
}
