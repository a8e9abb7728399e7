//! Watched list endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use popcorn_core::{WatchedEntry, WatchedError, WatchedStats};

use super::movies::catalog_error_response;
use super::ErrorResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AddWatchedRequest {
    pub imdb_id: String,
    pub user_rating: u8,
    /// How many times the rating was changed before this decision.
    #[serde(default)]
    pub rating_decisions: u32,
}

pub async fn list_watched(State(state): State<Arc<AppState>>) -> Json<Vec<WatchedEntry>> {
    Json(state.watched().entries())
}

pub async fn get_stats(State(state): State<Arc<AppState>>) -> Json<WatchedStats> {
    Json(state.watched().stats())
}

/// Add a title to the watched list.
///
/// The entry is built server-side from a fresh catalog lookup, so clients
/// only supply the ID and their rating.
pub async fn add_watched(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AddWatchedRequest>,
) -> Result<(StatusCode, Json<WatchedEntry>), (StatusCode, Json<ErrorResponse>)> {
    let detail = state
        .catalog()
        .lookup(&req.imdb_id)
        .await
        .map_err(catalog_error_response)?;

    let entry = WatchedEntry::from_detail(&detail, req.user_rating, req.rating_decisions)
        .map_err(watched_error_response)?;

    state
        .watched()
        .add(entry.clone())
        .map_err(watched_error_response)?;

    Ok((StatusCode::CREATED, Json(entry)))
}

/// Remove a title from the watched list.
///
/// Deleting an absent ID is a 404 and leaves the collection untouched.
pub async fn delete_watched(
    State(state): State<Arc<AppState>>,
    Path(imdb_id): Path<String>,
) -> Result<StatusCode, (StatusCode, Json<ErrorResponse>)> {
    match state.watched().remove(&imdb_id) {
        Some(_) => Ok(StatusCode::NO_CONTENT),
        None => Err((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new(format!(
                "Not in watched list: {}",
                imdb_id
            ))),
        )),
    }
}

fn watched_error_response(err: WatchedError) -> (StatusCode, Json<ErrorResponse>) {
    let status = match &err {
        WatchedError::AlreadyWatched(_) => StatusCode::CONFLICT,
        WatchedError::InvalidRating(_) => StatusCode::BAD_REQUEST,
        WatchedError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(ErrorResponse::new(err.to_string())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_maps_to_409() {
        let (status, _) =
            watched_error_response(WatchedError::AlreadyWatched("tt0133093".to_string()));
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[test]
    fn test_invalid_rating_maps_to_400() {
        let (status, body) = watched_error_response(WatchedError::InvalidRating(11));
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.error.contains("between 1 and 10"));
    }
}
