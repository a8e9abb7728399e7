//! Movie catalog integration for the OMDB API.
//!
//! This module provides a client for querying an external movie database
//! to back search results, detail views and watch-list entries.

mod omdb;
mod types;

pub use omdb::{OmdbClient, OmdbConfig};
pub use types::*;

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur when interacting with the movie catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Title not found (logical failure reported by the API).
    #[error("Movie not found: {0}")]
    NotFound(String),

    /// API returned an error.
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Client not configured (missing API key, etc.).
    #[error("Client not configured: {0}")]
    NotConfigured(String),
}

/// Trait for movie catalog clients.
///
/// Implemented by `OmdbClient` and by the mock catalog in `testing`,
/// so fetch lifecycles can run without a network.
#[async_trait]
pub trait MovieCatalog: Send + Sync {
    /// Search for titles by free-text query.
    async fn search(&self, query: &str) -> Result<Vec<MovieSummary>, CatalogError>;

    /// Get full detail for a specific title by IMDb ID.
    async fn lookup(&self, imdb_id: &str) -> Result<MovieDetail, CatalogError>;
}
