//! HTTP and WebSocket API.

pub mod handlers;
pub mod middleware;
pub mod movies;
pub mod routes;
pub mod watched;
pub mod ws;

pub use routes::create_router;

use serde::Serialize;

/// JSON error body shared by all API handlers.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
