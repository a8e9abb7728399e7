use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::catalog::{CatalogError, MovieCatalog, MovieSummary};
use crate::metrics::SEARCH_CYCLES;

/// Queries shorter than this (after trimming) never hit the catalog.
pub const MIN_QUERY_LEN: usize = 3;

/// Observable state of one search session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchState {
    /// The query this state belongs to.
    pub query: String,
    /// Results for the most recent completed, non-superseded fetch.
    pub results: Vec<MovieSummary>,
    /// True strictly between fetch start and its resolution.
    pub is_loading: bool,
    /// User-facing error text. Persists until the next query change or
    /// fetch outcome.
    pub error: Option<String>,
}

/// A keystroke-driven search lifecycle bound to one catalog.
///
/// Every `set_query` call supersedes the previous fetch cycle: the in-flight
/// task is aborted and, as a second line of defense, a generation counter is
/// checked before any state write, so an outcome that slipped past the abort
/// is still discarded. State updates are published through a watch channel.
pub struct SearchSession {
    catalog: Arc<dyn MovieCatalog>,
    tx: watch::Sender<SearchState>,
    generation: Arc<AtomicU64>,
    in_flight: Option<JoinHandle<()>>,
}

impl SearchSession {
    /// Create a new session with empty idle state.
    pub fn new(catalog: Arc<dyn MovieCatalog>) -> Self {
        let (tx, _) = watch::channel(SearchState::default());
        Self {
            catalog,
            tx,
            generation: Arc::new(AtomicU64::new(0)),
            in_flight: None,
        }
    }

    /// Subscribe to state updates.
    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.tx.subscribe()
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> SearchState {
        self.tx.borrow().clone()
    }

    /// Drive one fetch cycle for the given query.
    ///
    /// Cancels the previous cycle unconditionally. Queries shorter than
    /// [`MIN_QUERY_LEN`] clear results and error without a catalog call.
    pub fn set_query(&mut self, query: &str) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        if let Some(handle) = self.in_flight.take() {
            if !handle.is_finished() {
                debug!("superseding in-flight search");
                SEARCH_CYCLES.with_label_values(&["superseded"]).inc();
            }
            handle.abort();
        }

        let trimmed = query.trim();
        if trimmed.chars().count() < MIN_QUERY_LEN {
            SEARCH_CYCLES.with_label_values(&["short_query"]).inc();
            self.tx.send_replace(SearchState {
                query: query.to_string(),
                ..SearchState::default()
            });
            return;
        }

        self.tx.send_modify(|state| {
            state.query = query.to_string();
            state.is_loading = true;
            state.error = None;
        });

        let catalog = Arc::clone(&self.catalog);
        let tx = self.tx.clone();
        let current = Arc::clone(&self.generation);
        let fetch_query = trimmed.to_string();

        self.in_flight = Some(tokio::spawn(async move {
            let outcome = catalog.search(&fetch_query).await;

            // The generation check runs under the watch lock, serialized
            // against any newer cycle's own state write. An outcome for a
            // superseded query is dropped entirely, success and error alike.
            let applied = tx.send_if_modified(|state| {
                if current.load(Ordering::SeqCst) != generation {
                    return false;
                }
                match &outcome {
                    Ok(results) => {
                        state.results = results.clone();
                        state.error = None;
                    }
                    Err(err) => {
                        state.results = Vec::new();
                        state.error = Some(user_message(err));
                    }
                }
                state.is_loading = false;
                true
            });

            match (&outcome, applied) {
                (_, false) => SEARCH_CYCLES.with_label_values(&["superseded"]).inc(),
                (Ok(results), true) => {
                    debug!("search '{}' returned {} results", fetch_query, results.len());
                    SEARCH_CYCLES.with_label_values(&["applied"]).inc();
                }
                (Err(err), true) => {
                    debug!("search '{}' failed: {}", fetch_query, err);
                    SEARCH_CYCLES.with_label_values(&["error"]).inc();
                }
            }
        }));
    }
}

impl Drop for SearchSession {
    fn drop(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }
    }
}

/// Map catalog errors to the user-facing texts the UI renders in place of
/// the result list.
fn user_message(err: &CatalogError) -> String {
    match err {
        CatalogError::NotFound(_) => "Movie not found".to_string(),
        _ => "Something went wrong".to_string(),
    }
}
