use axum::{
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::{handlers, middleware, movies, watched, ws};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    // API routes
    let api_routes = Router::new()
        // Health and config
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        // Catalog
        .route("/movies/search", get(movies::search_movies))
        .route("/movies/{imdb_id}", get(movies::get_movie))
        // Watched list
        .route("/watched", get(watched::list_watched))
        .route("/watched", post(watched::add_watched))
        .route("/watched/stats", get(watched::get_stats))
        .route("/watched/{imdb_id}", delete(watched::delete_watched))
        // Live session
        .route("/ws", get(ws::ws_handler))
        .with_state(state);

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/metrics", get(handlers::metrics))
        .layer(axum::middleware::from_fn(middleware::metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
