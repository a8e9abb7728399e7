//! Testing utilities and mock implementations.
//!
//! This module provides mocks for the external service traits so fetch
//! lifecycles and the server API can be tested without real infrastructure.

mod memory_store;
mod mock_catalog;
mod title_port;

pub use memory_store::MemoryWatchedStore;
pub use mock_catalog::{MockMovieCatalog, RecordedCatalogQuery};
pub use title_port::RecordingTitlePort;

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::catalog::{MovieDetail, MovieSummary};
    use crate::watched::WatchedEntry;

    /// Create a test movie detail with reasonable defaults.
    pub fn movie_detail(imdb_id: &str, title: &str) -> MovieDetail {
        MovieDetail {
            imdb_id: imdb_id.to_string(),
            title: title.to_string(),
            year: "1999".to_string(),
            released: Some("31 Mar 1999".to_string()),
            runtime: Some("120 min".to_string()),
            genre: Some("Drama, Thriller".to_string()),
            director: Some("Jane Doe".to_string()),
            actors: Some("Actor One, Actor Two".to_string()),
            plot: Some(format!("A movie about {}.", title.to_lowercase())),
            poster: Some(format!("http://img.example/{}.jpg", imdb_id)),
            imdb_rating: Some("7.5".to_string()),
        }
    }

    /// Create a test search result summary.
    pub fn movie_summary(imdb_id: &str, title: &str) -> MovieSummary {
        movie_detail(imdb_id, title).summary()
    }

    /// Create a test watched entry.
    pub fn watched_entry(
        imdb_id: &str,
        title: &str,
        user_rating: u8,
        runtime_minutes: u32,
    ) -> WatchedEntry {
        WatchedEntry {
            imdb_id: imdb_id.to_string(),
            title: title.to_string(),
            year: "1999".to_string(),
            poster: Some(format!("http://img.example/{}.jpg", imdb_id)),
            runtime_minutes,
            imdb_rating: 7.5,
            user_rating,
            rating_decisions: 1,
            added_at: chrono::Utc::now(),
        }
    }
}
