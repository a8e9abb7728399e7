//! WebSocket live session: the interactive search-and-rate loop.
//!
//! Each connection gets its own search session, detail session and rating
//! draft. Client frames drive the lifecycles; every state change the
//! sessions publish is pushed back as a JSON frame.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use futures::stream::SplitSink;
use futures::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use popcorn_core::detail::DEFAULT_TITLE;
use popcorn_core::{
    DetailSession, DetailState, RatingDraft, SearchSession, SearchState, TitlePort, WatchedEntry,
    WatchedStats,
};

use crate::metrics::{WS_FRAMES_SENT, WS_SESSIONS_ACTIVE, WS_SESSIONS_TOTAL};
use crate::state::AppState;

/// Frames sent by the client.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientFrame {
    /// The search box changed.
    Query { query: String },
    /// A result was clicked. Selecting the already-open title closes it.
    Select { imdb_id: String },
    /// The detail pane was dismissed.
    Close,
    /// A star rating was picked for the open title.
    Rate { rating: u8 },
    /// Add the open title to the watched list with the drafted rating.
    Add,
    /// Remove a title from the watched list.
    Delete { imdb_id: String },
}

/// Frames pushed to the client.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerFrame {
    /// Search state changed.
    Search(SearchState),
    /// Detail state changed. Carries the stored rating when the selected
    /// title is already watched.
    Detail {
        #[serde(flatten)]
        state: DetailState,
        watched_rating: Option<u8>,
    },
    /// The ambient title should change.
    Title { title: String },
    /// Watched list snapshot after a mutation.
    Watched {
        entries: Vec<WatchedEntry>,
        stats: WatchedStats,
    },
    /// A client frame could not be honored.
    Error { message: String },
}

impl ServerFrame {
    fn kind(&self) -> &'static str {
        match self {
            ServerFrame::Search(_) => "search",
            ServerFrame::Detail { .. } => "detail",
            ServerFrame::Title { .. } => "title",
            ServerFrame::Watched { .. } => "watched",
            ServerFrame::Error { .. } => "error",
        }
    }
}

/// Title port that forwards title changes to the connected client.
struct WsTitlePort {
    tx: mpsc::UnboundedSender<String>,
}

impl TitlePort for WsTitlePort {
    fn set_title(&self, title: &str) {
        let _ = self.tx.send(title.to_string());
    }

    fn reset(&self) {
        let _ = self.tx.send(DEFAULT_TITLE.to_string());
    }
}

/// WebSocket upgrade handler.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

/// Drive one live session until the client goes away.
async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (mut sender, mut receiver) = socket.split();

    WS_SESSIONS_TOTAL.inc();
    WS_SESSIONS_ACTIVE.inc();
    info!("Live session connected");

    let (title_tx, mut title_rx) = mpsc::unbounded_channel();
    let mut search = SearchSession::new(state.catalog());
    let mut detail = DetailSession::new(state.catalog(), Arc::new(WsTitlePort { tx: title_tx }));
    let mut draft = RatingDraft::new();

    let mut search_rx = search.subscribe();
    let mut detail_rx = detail.subscribe();

    // Initial watched snapshot so the client can render immediately.
    if send_frame(&mut sender, &watched_snapshot(&state)).await {
        loop {
            tokio::select! {
                changed = search_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let frame = ServerFrame::Search(search_rx.borrow_and_update().clone());
                    if !send_frame(&mut sender, &frame).await {
                        break;
                    }
                }
                changed = detail_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let snapshot = detail_rx.borrow_and_update().clone();
                    let watched_rating = snapshot
                        .selected
                        .as_deref()
                        .and_then(|id| state.watched().user_rating_for(id));
                    let frame = ServerFrame::Detail {
                        state: snapshot,
                        watched_rating,
                    };
                    if !send_frame(&mut sender, &frame).await {
                        break;
                    }
                }
                Some(title) = title_rx.recv() => {
                    if !send_frame(&mut sender, &ServerFrame::Title { title }).await {
                        break;
                    }
                }
                frame = receiver.next() => {
                    match frame {
                        Some(Ok(Message::Text(text))) => {
                            match serde_json::from_str::<ClientFrame>(text.as_str()) {
                                Ok(client_frame) => {
                                    let keep_going = handle_client_frame(
                                        client_frame,
                                        &state,
                                        &mut search,
                                        &mut detail,
                                        &mut draft,
                                        &mut sender,
                                    )
                                    .await;
                                    if !keep_going {
                                        break;
                                    }
                                }
                                Err(e) => {
                                    debug!("Unparseable client frame: {}", e);
                                    let frame = ServerFrame::Error {
                                        message: "Unrecognized frame".to_string(),
                                    };
                                    if !send_frame(&mut sender, &frame).await {
                                        break;
                                    }
                                }
                            }
                        }
                        Some(Ok(Message::Close(_))) | None => {
                            debug!("Live session closed by client");
                            break;
                        }
                        Some(Ok(_)) => {}
                        Some(Err(e)) => {
                            warn!("WebSocket receive error: {}", e);
                            break;
                        }
                    }
                }
            }
        }
    }

    WS_SESSIONS_ACTIVE.dec();
    info!("Live session disconnected");
}

/// Apply one client frame. Returns false when the socket is gone.
async fn handle_client_frame(
    frame: ClientFrame,
    state: &Arc<AppState>,
    search: &mut SearchSession,
    detail: &mut DetailSession,
    draft: &mut RatingDraft,
    sender: &mut SplitSink<WebSocket, Message>,
) -> bool {
    match frame {
        ClientFrame::Query { query } => {
            search.set_query(&query);
            true
        }
        ClientFrame::Select { imdb_id } => {
            // A new selection discards any drafted rating, including the
            // toggle-close on the already-open title.
            draft.clear();
            detail.select(&imdb_id);
            true
        }
        ClientFrame::Close => {
            draft.clear();
            detail.close();
            true
        }
        ClientFrame::Rate { rating } => match draft.set(rating) {
            Ok(()) => true,
            Err(e) => {
                send_frame(
                    sender,
                    &ServerFrame::Error {
                        message: e.to_string(),
                    },
                )
                .await
            }
        },
        ClientFrame::Add => {
            let snapshot = detail.state();
            let outcome = match (snapshot.detail, draft.rating()) {
                (Some(loaded), Some(rating)) => {
                    WatchedEntry::from_detail(&loaded, rating, draft.decisions())
                        .and_then(|entry| state.watched().add(entry))
                }
                (None, _) => {
                    return send_frame(
                        sender,
                        &ServerFrame::Error {
                            message: "No title is open".to_string(),
                        },
                    )
                    .await;
                }
                (_, None) => {
                    return send_frame(
                        sender,
                        &ServerFrame::Error {
                            message: "No rating picked".to_string(),
                        },
                    )
                    .await;
                }
            };

            match outcome {
                Ok(()) => {
                    draft.clear();
                    detail.close();
                    send_frame(sender, &watched_snapshot(state)).await
                }
                Err(e) => {
                    send_frame(
                        sender,
                        &ServerFrame::Error {
                            message: e.to_string(),
                        },
                    )
                    .await
                }
            }
        }
        ClientFrame::Delete { imdb_id } => {
            state.watched().remove(&imdb_id);
            send_frame(sender, &watched_snapshot(state)).await
        }
    }
}

fn watched_snapshot(state: &AppState) -> ServerFrame {
    ServerFrame::Watched {
        entries: state.watched().entries(),
        stats: state.watched().stats(),
    }
}

/// Serialize and send one frame. Returns false when the client is gone.
async fn send_frame(sender: &mut SplitSink<WebSocket, Message>, frame: &ServerFrame) -> bool {
    WS_FRAMES_SENT.with_label_values(&[frame.kind()]).inc();

    match serde_json::to_string(frame) {
        Ok(json) => {
            if sender.send(Message::Text(json.into())).await.is_err() {
                debug!("WebSocket send failed, client disconnected");
                false
            } else {
                true
            }
        }
        Err(e) => {
            error!("Failed to serialize server frame: {}", e);
            true
        }
    }
}
