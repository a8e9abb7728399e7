//! Common test utilities for API testing with mocks.
//!
//! Provides a test fixture that builds an in-process router with a mock
//! catalog and a temp-file watched store, so endpoints can be exercised
//! without a network or a real OMDB key.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use popcorn_core::testing::MockMovieCatalog;
use popcorn_core::{
    Config, JsonWatchedStore, MovieCatalog, OmdbConfig, ServerConfig, StorageConfig, WatchedList,
    WatchedStore,
};
use popcorn_server::api::create_router;
use popcorn_server::state::AppState;

/// Re-export fixtures for test convenience
#[allow(unused_imports)]
pub use popcorn_core::testing::fixtures;

/// Test fixture for API testing with mock dependencies.
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Mock catalog, seed movies and inspect recorded queries
    pub catalog: Arc<MockMovieCatalog>,
    /// The shared watched list behind the router
    pub watched: Arc<WatchedList>,
    /// Temporary directory holding the watched store file
    pub temp_dir: TempDir,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestFixture {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let watched_path = temp_dir.path().join("watched.json");

        let config = Config {
            omdb: OmdbConfig {
                api_key: "test-key".to_string(),
                base_url: None,
            },
            server: ServerConfig::default(),
            storage: StorageConfig {
                watched_path: watched_path.clone(),
            },
        };

        let catalog = Arc::new(MockMovieCatalog::new());
        let store: Arc<dyn WatchedStore> = Arc::new(JsonWatchedStore::new(&watched_path));
        let watched =
            Arc::new(WatchedList::load(store).expect("Failed to load empty watched list"));

        let state = Arc::new(AppState::new(
            config,
            Arc::clone(&catalog) as Arc<dyn MovieCatalog>,
            Arc::clone(&watched),
        ));

        let router = create_router(state);

        Self {
            router,
            catalog,
            watched,
            temp_dir,
        }
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path, None).await
    }

    /// Send a POST request with JSON body.
    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        self.request("POST", path, Some(body)).await
    }

    /// Send a DELETE request.
    pub async fn delete(&self, path: &str) -> TestResponse {
        self.request("DELETE", path, None).await
    }

    /// Send a GET request and return the raw body as text.
    pub async fn get_text(&self, path: &str) -> (StatusCode, String) {
        let request = Request::builder()
            .uri(path)
            .body(Body::empty())
            .expect("Failed to build request");
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Request failed");

        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read body")
            .to_bytes();
        (status, String::from_utf8_lossy(&bytes).into_owned())
    }

    async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(path);

        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(serde_json::to_vec(&json).expect("Failed to serialize body"))
            }
            None => Body::empty(),
        };

        let request = builder.body(body).expect("Failed to build request");
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Request failed");

        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read body")
            .to_bytes();

        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        TestResponse { status, body }
    }
}
