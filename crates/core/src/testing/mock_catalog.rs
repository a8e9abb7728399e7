//! Mock movie catalog for testing.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::catalog::{CatalogError, MovieCatalog, MovieDetail, MovieSummary};

/// A recorded catalog query for test assertions.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCatalogQuery {
    Search { query: String },
    Lookup { imdb_id: String },
}

/// Mock implementation of the [`MovieCatalog`] trait.
///
/// Provides controllable behavior for testing:
/// - Seed movies; search matches on title substring, lookup by id
/// - Track queries for assertions
/// - Simulate failures (one-shot error injection)
/// - Delay responses, for exercising cancellation
pub struct MockMovieCatalog {
    movies: Arc<RwLock<HashMap<String, MovieDetail>>>,
    queries: Arc<RwLock<Vec<RecordedCatalogQuery>>>,
    next_error: Arc<RwLock<Option<CatalogError>>>,
    search_delay: Arc<RwLock<Duration>>,
    lookup_delay: Arc<RwLock<Duration>>,
}

impl Default for MockMovieCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl MockMovieCatalog {
    /// Create a new empty mock catalog.
    pub fn new() -> Self {
        Self {
            movies: Arc::new(RwLock::new(HashMap::new())),
            queries: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
            search_delay: Arc::new(RwLock::new(Duration::ZERO)),
            lookup_delay: Arc::new(RwLock::new(Duration::ZERO)),
        }
    }

    /// Add a movie, findable by search and lookup.
    pub async fn add_movie(&self, movie: MovieDetail) {
        self.movies.write().await.insert(movie.imdb_id.clone(), movie);
    }

    /// Replace all movies at once.
    pub async fn set_movies(&self, movies: Vec<MovieDetail>) {
        let mut map = self.movies.write().await;
        map.clear();
        for movie in movies {
            map.insert(movie.imdb_id.clone(), movie);
        }
    }

    /// Get all recorded queries.
    pub async fn recorded_queries(&self) -> Vec<RecordedCatalogQuery> {
        self.queries.read().await.clone()
    }

    /// Number of catalog calls issued so far.
    pub async fn query_count(&self) -> usize {
        self.queries.read().await.len()
    }

    /// Configure the next operation to fail with the given error.
    pub async fn set_next_error(&self, error: CatalogError) {
        *self.next_error.write().await = Some(error);
    }

    /// Delay applied to search calls issued after this point.
    pub async fn set_search_delay(&self, delay: Duration) {
        *self.search_delay.write().await = delay;
    }

    /// Delay applied to lookup calls issued after this point.
    pub async fn set_lookup_delay(&self, delay: Duration) {
        *self.lookup_delay.write().await = delay;
    }

    async fn take_error(&self) -> Option<CatalogError> {
        self.next_error.write().await.take()
    }

    async fn record(&self, query: RecordedCatalogQuery) {
        self.queries.write().await.push(query);
    }
}

#[async_trait]
impl MovieCatalog for MockMovieCatalog {
    async fn search(&self, query: &str) -> Result<Vec<MovieSummary>, CatalogError> {
        self.record(RecordedCatalogQuery::Search {
            query: query.to_string(),
        })
        .await;

        let delay = *self.search_delay.read().await;
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        if let Some(err) = self.take_error().await {
            return Err(err);
        }

        let movies = self.movies.read().await;
        let query_lower = query.to_lowercase();

        let mut results: Vec<MovieSummary> = movies
            .values()
            .filter(|m| m.title.to_lowercase().contains(&query_lower))
            .map(|m| m.summary())
            .collect();
        results.sort_by(|a, b| a.imdb_id.cmp(&b.imdb_id));

        if results.is_empty() {
            // OMDB reports an empty result set as a logical failure.
            return Err(CatalogError::NotFound("Movie not found!".to_string()));
        }

        Ok(results)
    }

    async fn lookup(&self, imdb_id: &str) -> Result<MovieDetail, CatalogError> {
        self.record(RecordedCatalogQuery::Lookup {
            imdb_id: imdb_id.to_string(),
        })
        .await;

        let delay = *self.lookup_delay.read().await;
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        if let Some(err) = self.take_error().await {
            return Err(err);
        }

        self.movies
            .read()
            .await
            .get(imdb_id)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(format!("No title with ID {}", imdb_id)))
    }
}
