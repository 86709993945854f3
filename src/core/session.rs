//! Dashboard session - owns the last good snapshot and its load status.
//!
//! A month-range change reruns the aggregation against the cached snapshot and
//! never touches the database. A new year, an explicit refresh, or a data write
//! (see [`DashboardSession::invalidate`]) triggers a fresh fetch.
//!
//! Every fetch takes a generation ticket. When a slower, older fetch finishes
//! after a newer one was started, its result is handed back to its caller but
//! never replaces the session state.

use crate::{
    core::snapshot::{RecordSource, RetryPolicy, Snapshot, fetch_with_retry},
    errors::Result,
};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{RwLock, broadcast};
use tracing::{debug, error, info};

/// Load lifecycle as seen by the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum LoadStatus {
    /// Nothing requested yet
    Idle,
    /// A fetch for `year` is in flight
    Loading {
        /// Year being fetched
        year: i32,
        /// Ticket generation
        generation: u64,
    },
    /// The snapshot for `year` is available
    Ready {
        /// Year loaded
        year: i32,
        /// Ticket generation
        generation: u64,
    },
    /// Every attempt failed; the caller may refresh manually
    Failed {
        /// Year requested
        year: i32,
        /// Ticket generation
        generation: u64,
        /// Last error
        message: String,
    },
}

/// Proof that a fetch was started; needed to publish its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    /// Year being fetched
    pub year: i32,
    /// Session generation when the fetch began
    pub generation: u64,
}

#[derive(Debug)]
struct SessionState {
    generation: u64,
    year: Option<i32>,
    snapshot: Option<Arc<Snapshot>>,
    stale: bool,
    status: LoadStatus,
}

/// Shared snapshot holder for the dashboard.
#[derive(Debug)]
pub struct DashboardSession {
    state: RwLock<SessionState>,
    events: broadcast::Sender<LoadStatus>,
    policy: RetryPolicy,
}

impl DashboardSession {
    /// Creates an idle session that fetches with `policy`.
    #[must_use]
    pub fn new(policy: RetryPolicy) -> Self {
        let (events, _) = broadcast::channel(32);
        Self {
            state: RwLock::new(SessionState {
                generation: 0,
                year: None,
                snapshot: None,
                stale: false,
                status: LoadStatus::Idle,
            }),
            events,
            policy,
        }
    }

    /// Receives every status transition from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<LoadStatus> {
        self.events.subscribe()
    }

    /// Current status.
    pub async fn status(&self) -> LoadStatus {
        self.state.read().await.status.clone()
    }

    /// The cached snapshot for `year`, if it is current.
    pub async fn cached(&self, year: i32) -> Option<Arc<Snapshot>> {
        let state = self.state.read().await;
        if state.stale || state.year != Some(year) {
            return None;
        }
        state.snapshot.clone()
    }

    /// Marks the cached snapshot out of date after a write.
    ///
    /// Any load already in flight read pre-write data, so its ticket is
    /// superseded as well.
    pub async fn invalidate(&self) {
        let mut state = self.state.write().await;
        if state.snapshot.is_some() {
            debug!("Dashboard snapshot invalidated");
        }
        state.stale = true;
        state.generation += 1;
    }

    /// Starts a load for `year`, superseding any load in flight.
    pub async fn begin_load(&self, year: i32) -> LoadTicket {
        let mut state = self.state.write().await;
        state.generation += 1;
        let ticket = LoadTicket {
            year,
            generation: state.generation,
        };
        self.publish(&mut state, LoadStatus::Loading {
            year,
            generation: ticket.generation,
        });
        ticket
    }

    /// Publishes the outcome of the load started with `ticket`.
    ///
    /// Results of superseded tickets are returned unchanged without touching
    /// the session.
    ///
    /// # Errors
    /// Returns the fetch error when `result` is an error.
    pub async fn complete_load(
        &self,
        ticket: LoadTicket,
        result: Result<Snapshot>,
    ) -> Result<Arc<Snapshot>> {
        let mut state = self.state.write().await;

        if ticket.generation != state.generation {
            debug!(
                year = ticket.year,
                generation = ticket.generation,
                current = state.generation,
                "Discarding superseded snapshot load"
            );
            return result.map(Arc::new);
        }

        match result {
            Ok(snapshot) => {
                let snapshot = Arc::new(snapshot);
                state.year = Some(ticket.year);
                state.snapshot = Some(Arc::clone(&snapshot));
                state.stale = false;
                self.publish(&mut state, LoadStatus::Ready {
                    year: ticket.year,
                    generation: ticket.generation,
                });
                info!(year = ticket.year, "Dashboard snapshot ready");
                Ok(snapshot)
            }
            Err(e) => {
                error!(year = ticket.year, "Dashboard snapshot failed: {}", e);
                self.publish(&mut state, LoadStatus::Failed {
                    year: ticket.year,
                    generation: ticket.generation,
                    message: e.to_string(),
                });
                Err(e)
            }
        }
    }

    /// Returns the snapshot for `year`, fetching only when needed.
    ///
    /// # Errors
    /// Returns [`crate::errors::Error::FetchExhausted`] when every retry failed.
    pub async fn snapshot_for<S: RecordSource>(
        &self,
        source: &S,
        year: i32,
        refresh: bool,
    ) -> Result<Arc<Snapshot>> {
        if !refresh {
            if let Some(snapshot) = self.cached(year).await {
                return Ok(snapshot);
            }
        }

        let ticket = self.begin_load(year).await;
        let result = fetch_with_retry(source, year, self.policy).await;
        self.complete_load(ticket, result).await
    }

    fn publish(&self, state: &mut SessionState, status: LoadStatus) {
        state.status = status.clone();
        // No subscribers is fine
        let _ = self.events.send(status);
    }
}
