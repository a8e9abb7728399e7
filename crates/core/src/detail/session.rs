use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::TitlePort;
use crate::catalog::{MovieCatalog, MovieDetail};

/// Observable state of one detail session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetailState {
    /// Currently selected IMDb ID, if any.
    pub selected: Option<String>,
    /// Fetched detail for the selection.
    pub detail: Option<MovieDetail>,
    /// True while the detail fetch is outstanding.
    pub is_loading: bool,
}

/// Fetch lifecycle for the single visible detail view.
///
/// Only one detail view exists at a time, so there is no request queue to
/// manage; a stale response for a superseded selection is suppressed by a
/// generation check rather than last-write-wins. The page-title side effect
/// fires once per successful fetch and is undone exactly once when the
/// selection is cleared or replaced.
pub struct DetailSession {
    catalog: Arc<dyn MovieCatalog>,
    title_port: Arc<dyn TitlePort>,
    tx: watch::Sender<DetailState>,
    generation: Arc<AtomicU64>,
    in_flight: Option<JoinHandle<()>>,
    title_active: Arc<AtomicBool>,
}

impl DetailSession {
    /// Create an inert session with nothing selected.
    pub fn new(catalog: Arc<dyn MovieCatalog>, title_port: Arc<dyn TitlePort>) -> Self {
        let (tx, _) = watch::channel(DetailState::default());
        Self {
            catalog,
            title_port,
            tx,
            generation: Arc::new(AtomicU64::new(0)),
            in_flight: None,
            title_active: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Subscribe to state updates.
    pub fn subscribe(&self) -> watch::Receiver<DetailState> {
        self.tx.subscribe()
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> DetailState {
        self.tx.borrow().clone()
    }

    /// Select a title and fetch its detail.
    ///
    /// Selecting the id that is already open closes the view instead
    /// (toggle semantics).
    pub fn select(&mut self, imdb_id: &str) {
        if self.tx.borrow().selected.as_deref() == Some(imdb_id) {
            self.close();
            return;
        }

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }
        self.clear_title();

        debug!("detail select: {}", imdb_id);
        self.tx.send_replace(DetailState {
            selected: Some(imdb_id.to_string()),
            detail: None,
            is_loading: true,
        });

        let catalog = Arc::clone(&self.catalog);
        let title_port = Arc::clone(&self.title_port);
        let title_active = Arc::clone(&self.title_active);
        let tx = self.tx.clone();
        let current = Arc::clone(&self.generation);
        let id = imdb_id.to_string();

        self.in_flight = Some(tokio::spawn(async move {
            let outcome = catalog.lookup(&id).await;

            let mut fetched: Option<MovieDetail> = None;
            let applied = tx.send_if_modified(|state| {
                if current.load(Ordering::SeqCst) != generation {
                    return false;
                }
                match &outcome {
                    Ok(detail) => {
                        fetched = Some(detail.clone());
                        state.detail = Some(detail.clone());
                    }
                    Err(err) => {
                        // The detail view has no error surface; the view
                        // simply stays empty.
                        warn!("detail lookup for {} failed: {}", id, err);
                        state.detail = None;
                    }
                }
                state.is_loading = false;
                true
            });

            if applied {
                if let Some(detail) = fetched {
                    title_port.set_title(&format!("Movie | {}", detail.title));
                    title_active.store(true, Ordering::SeqCst);
                }
            }
        }));
    }

    /// Clear the selection and restore the default title.
    pub fn close(&mut self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }
        self.clear_title();
        self.tx.send_replace(DetailState::default());
    }

    fn clear_title(&self) {
        if self.title_active.swap(false, Ordering::SeqCst) {
            self.title_port.reset();
        }
    }
}

impl Drop for DetailSession {
    fn drop(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }
        self.clear_title();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detail::DEFAULT_TITLE;
    use crate::testing::{fixtures, MockMovieCatalog, RecordingTitlePort};
    use std::time::Duration;
    use tokio::time::timeout;

    async fn wait_settled(rx: &mut watch::Receiver<DetailState>) -> DetailState {
        timeout(Duration::from_secs(5), async {
            loop {
                {
                    let state = rx.borrow();
                    if !state.is_loading {
                        return state.clone();
                    }
                }
                rx.changed().await.expect("session dropped");
            }
        })
        .await
        .expect("detail fetch never settled")
    }

    fn session_with(
        catalog: Arc<MockMovieCatalog>,
    ) -> (DetailSession, Arc<RecordingTitlePort>) {
        let port = Arc::new(RecordingTitlePort::new());
        let session = DetailSession::new(catalog, port.clone());
        (session, port)
    }

    #[tokio::test]
    async fn test_select_fetches_detail() {
        let catalog = Arc::new(MockMovieCatalog::new());
        catalog
            .add_movie(fixtures::movie_detail("tt0111161", "The Shawshank Redemption"))
            .await;

        let (mut session, port) = session_with(catalog);
        let mut rx = session.subscribe();

        session.select("tt0111161");
        let state = wait_settled(&mut rx).await;

        assert_eq!(state.selected.as_deref(), Some("tt0111161"));
        let detail = state.detail.expect("detail should be set");
        assert_eq!(detail.title, "The Shawshank Redemption");
        assert_eq!(
            port.titles(),
            vec!["Movie | The Shawshank Redemption".to_string()]
        );
    }

    #[tokio::test]
    async fn test_close_resets_title_once() {
        let catalog = Arc::new(MockMovieCatalog::new());
        catalog.add_movie(fixtures::movie_detail("tt0068646", "The Godfather")).await;

        let (mut session, port) = session_with(catalog);
        let mut rx = session.subscribe();

        session.select("tt0068646");
        wait_settled(&mut rx).await;

        session.close();
        session.close();

        assert_eq!(port.resets(), 1);
        assert_eq!(port.current(), DEFAULT_TITLE);
        assert!(session.state().selected.is_none());
    }

    #[tokio::test]
    async fn test_selecting_same_id_toggles_closed() {
        let catalog = Arc::new(MockMovieCatalog::new());
        catalog.add_movie(fixtures::movie_detail("tt0068646", "The Godfather")).await;

        let (mut session, _port) = session_with(catalog);
        let mut rx = session.subscribe();

        session.select("tt0068646");
        wait_settled(&mut rx).await;

        session.select("tt0068646");
        let state = session.state();
        assert!(state.selected.is_none());
        assert!(state.detail.is_none());
    }

    #[tokio::test]
    async fn test_stale_response_does_not_overwrite_newer_selection() {
        let catalog = Arc::new(MockMovieCatalog::new());
        catalog.add_movie(fixtures::movie_detail("tt0111161", "The Shawshank Redemption")).await;
        catalog.add_movie(fixtures::movie_detail("tt0068646", "The Godfather")).await;

        catalog.set_lookup_delay(Duration::from_secs(60)).await;

        let (mut session, port) = session_with(catalog.clone());
        let mut rx = session.subscribe();

        session.select("tt0111161");
        catalog.set_lookup_delay(Duration::ZERO).await;
        session.select("tt0068646");

        let state = wait_settled(&mut rx).await;
        assert_eq!(state.selected.as_deref(), Some("tt0068646"));
        assert_eq!(state.detail.unwrap().title, "The Godfather");

        tokio::time::sleep(Duration::from_millis(50)).await;
        let state = session.state();
        assert_eq!(state.detail.unwrap().title, "The Godfather");
        assert_eq!(port.titles(), vec!["Movie | The Godfather".to_string()]);
    }

    #[tokio::test]
    async fn test_failed_lookup_clears_loading() {
        let catalog = Arc::new(MockMovieCatalog::new());

        let (mut session, port) = session_with(catalog);
        let mut rx = session.subscribe();

        session.select("tt0000000");
        let state = wait_settled(&mut rx).await;

        assert!(state.detail.is_none());
        assert!(!state.is_loading);
        assert!(port.titles().is_empty());
    }
}
