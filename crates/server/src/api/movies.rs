//! Catalog search and detail lookup endpoints.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::warn;

use popcorn_core::search::MIN_QUERY_LEN;
use popcorn_core::{CatalogError, MovieDetail, MovieSummary};

use super::ErrorResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub query: String,
}

/// Search the catalog by free-text query.
///
/// Queries shorter than three characters after trimming return an empty
/// list without touching the upstream catalog.
pub async fn search_movies(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<MovieSummary>>, (StatusCode, Json<ErrorResponse>)> {
    let trimmed = params.query.trim();
    if trimmed.chars().count() < MIN_QUERY_LEN {
        return Ok(Json(Vec::new()));
    }

    match state.catalog().search(trimmed).await {
        Ok(results) => Ok(Json(results)),
        Err(e) => Err(catalog_error_response(e)),
    }
}

/// Full detail for one title by IMDb ID.
pub async fn get_movie(
    State(state): State<Arc<AppState>>,
    Path(imdb_id): Path<String>,
) -> Result<Json<MovieDetail>, (StatusCode, Json<ErrorResponse>)> {
    match state.catalog().lookup(&imdb_id).await {
        Ok(detail) => Ok(Json(detail)),
        Err(e) => Err(catalog_error_response(e)),
    }
}

/// Map a catalog error to a status code and user-facing message.
///
/// Upstream transport and protocol failures all collapse into one generic
/// message; the real cause goes to the log.
pub(super) fn catalog_error_response(err: CatalogError) -> (StatusCode, Json<ErrorResponse>) {
    let (status, message) = match &err {
        CatalogError::NotFound(_) => (StatusCode::NOT_FOUND, "Movie not found".to_string()),
        CatalogError::NotConfigured(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg.clone()),
        CatalogError::HttpError(_) | CatalogError::ApiError { .. } | CatalogError::ParseError(_) => {
            warn!("Catalog request failed: {}", err);
            (StatusCode::BAD_GATEWAY, "Something went wrong".to_string())
        }
    };
    (status, Json(ErrorResponse::new(message)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_to_404() {
        let (status, body) = catalog_error_response(CatalogError::NotFound("nope".to_string()));
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.error, "Movie not found");
    }

    #[test]
    fn test_upstream_failure_maps_to_generic_message() {
        let (status, body) = catalog_error_response(CatalogError::ApiError {
            status: 500,
            message: "internal".to_string(),
        });
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body.error, "Something went wrong");
    }

    #[test]
    fn test_not_configured_maps_to_503() {
        let (status, _) =
            catalog_error_response(CatalogError::NotConfigured("no API key".to_string()));
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }
}
