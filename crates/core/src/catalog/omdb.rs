//! OMDB (Open Movie Database) API client.
//!
//! OMDB requires an API key for access. All operations go through a single
//! endpoint; the operation is selected by query parameter (`s` for search,
//! `i` for lookup by IMDb ID). Logical failures are reported in-band with
//! `"Response": "False"` and an error text.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::types::{MovieDetail, MovieSummary};
use super::CatalogError;
use crate::metrics::{CATALOG_REQUESTS, CATALOG_REQUEST_DURATION};

/// OMDB API client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OmdbConfig {
    /// OMDB API key (required).
    pub api_key: String,
    /// Base URL (default: http://www.omdbapi.com/).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

/// OMDB API client.
pub struct OmdbClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl OmdbClient {
    /// Create a new OMDB client.
    pub fn new(config: OmdbConfig) -> Result<Self, CatalogError> {
        if config.api_key.is_empty() {
            return Err(CatalogError::NotConfigured(
                "OMDB API key is required".to_string(),
            ));
        }

        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;

        let base_url = config
            .base_url
            .unwrap_or_else(|| "http://www.omdbapi.com/".to_string());

        Ok(Self {
            client,
            base_url,
            api_key: config.api_key,
        })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        op: &'static str,
        params: &[(&str, &str)],
    ) -> Result<T, CatalogError> {
        let timer = CATALOG_REQUEST_DURATION.with_label_values(&[op]).start_timer();

        let response = self
            .client
            .get(&self.base_url)
            .query(&[("apikey", self.api_key.as_str())])
            .query(params)
            .send()
            .await;
        timer.observe_duration();

        let response = match response {
            Ok(r) => r,
            Err(e) => {
                CATALOG_REQUESTS.with_label_values(&[op, "transport_error"]).inc();
                return Err(e.into());
            }
        };

        let status = response.status();
        if status == 401 {
            CATALOG_REQUESTS.with_label_values(&[op, "unauthorized"]).inc();
            return Err(CatalogError::NotConfigured(
                "Invalid OMDB API key".to_string(),
            ));
        }
        if !status.is_success() {
            CATALOG_REQUESTS.with_label_values(&[op, "api_error"]).inc();
            let body = response.text().await.unwrap_or_default();
            return Err(CatalogError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        response.json().await.map_err(|e| {
            CATALOG_REQUESTS.with_label_values(&[op, "parse_error"]).inc();
            CatalogError::ParseError(format!("Failed to parse {} response: {}", op, e))
        })
    }
}

#[async_trait::async_trait]
impl super::MovieCatalog for OmdbClient {
    /// Search for titles by query.
    async fn search(&self, query: &str) -> Result<Vec<MovieSummary>, CatalogError> {
        debug!("OMDB search: query='{}'", query);

        let body: OmdbSearchResponse = self.get_json("search", &[("s", query)]).await?;

        if body.response == "False" {
            CATALOG_REQUESTS.with_label_values(&["search", "not_found"]).inc();
            return Err(CatalogError::NotFound(
                body.error.unwrap_or_else(|| "Movie not found!".to_string()),
            ));
        }

        CATALOG_REQUESTS.with_label_values(&["search", "ok"]).inc();
        Ok(body.search.into_iter().map(|r| r.into()).collect())
    }

    /// Get full detail for a specific title by IMDb ID.
    async fn lookup(&self, imdb_id: &str) -> Result<MovieDetail, CatalogError> {
        debug!("OMDB lookup: id={}", imdb_id);

        let body: OmdbDetailResponse = self.get_json("lookup", &[("i", imdb_id)]).await?;

        if body.response == "False" {
            CATALOG_REQUESTS.with_label_values(&["lookup", "not_found"]).inc();
            return Err(CatalogError::NotFound(
                body.error
                    .unwrap_or_else(|| format!("No title with ID {}", imdb_id)),
            ));
        }

        CATALOG_REQUESTS.with_label_values(&["lookup", "ok"]).inc();
        body.try_into()
    }
}

// ============================================================================
// OMDB API Response Types (private)
// ============================================================================

#[derive(Debug, Deserialize)]
struct OmdbSearchResponse {
    #[serde(rename = "Search", default)]
    search: Vec<OmdbSearchItem>,
    #[serde(rename = "Response")]
    response: String,
    #[serde(rename = "Error")]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OmdbSearchItem {
    #[serde(rename = "imdbID")]
    imdb_id: String,
    #[serde(rename = "Title")]
    title: String,
    #[serde(rename = "Year", default)]
    year: String,
    #[serde(rename = "Poster")]
    poster: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OmdbDetailResponse {
    #[serde(rename = "imdbID")]
    imdb_id: Option<String>,
    #[serde(rename = "Title")]
    title: Option<String>,
    #[serde(rename = "Year", default)]
    year: String,
    #[serde(rename = "Released")]
    released: Option<String>,
    #[serde(rename = "Runtime")]
    runtime: Option<String>,
    #[serde(rename = "Genre")]
    genre: Option<String>,
    #[serde(rename = "Director")]
    director: Option<String>,
    #[serde(rename = "Actors")]
    actors: Option<String>,
    #[serde(rename = "Plot")]
    plot: Option<String>,
    #[serde(rename = "Poster")]
    poster: Option<String>,
    #[serde(rename = "imdbRating")]
    imdb_rating: Option<String>,
    #[serde(rename = "Response")]
    response: String,
    #[serde(rename = "Error")]
    error: Option<String>,
}

/// OMDB reports missing fields as the literal string "N/A".
fn not_available(value: Option<String>) -> Option<String> {
    value.filter(|v| v != "N/A")
}

// ============================================================================
// Conversions
// ============================================================================

impl From<OmdbSearchItem> for MovieSummary {
    fn from(r: OmdbSearchItem) -> Self {
        Self {
            imdb_id: r.imdb_id,
            title: r.title,
            year: r.year,
            poster: not_available(r.poster),
        }
    }
}

impl TryFrom<OmdbDetailResponse> for MovieDetail {
    type Error = CatalogError;

    fn try_from(d: OmdbDetailResponse) -> Result<Self, CatalogError> {
        let imdb_id = d
            .imdb_id
            .ok_or_else(|| CatalogError::ParseError("detail response missing imdbID".into()))?;
        let title = d
            .title
            .ok_or_else(|| CatalogError::ParseError("detail response missing Title".into()))?;

        Ok(Self {
            imdb_id,
            title,
            year: d.year,
            released: not_available(d.released),
            runtime: not_available(d.runtime),
            genre: not_available(d.genre),
            director: not_available(d.director),
            actors: not_available(d.actors),
            plot: not_available(d.plot),
            poster: not_available(d.poster),
            imdb_rating: not_available(d.imdb_rating),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_requires_api_key() {
        let result = OmdbClient::new(OmdbConfig {
            api_key: String::new(),
            base_url: None,
        });
        assert!(matches!(result, Err(CatalogError::NotConfigured(_))));
    }

    #[test]
    fn test_search_item_conversion_maps_na_poster() {
        let item = OmdbSearchItem {
            imdb_id: "tt0111161".to_string(),
            title: "The Shawshank Redemption".to_string(),
            year: "1994".to_string(),
            poster: Some("N/A".to_string()),
        };

        let summary: MovieSummary = item.into();
        assert_eq!(summary.imdb_id, "tt0111161");
        assert!(summary.poster.is_none());
    }

    #[test]
    fn test_search_response_failure_marker() {
        let json = r#"{"Response":"False","Error":"Movie not found!"}"#;
        let body: OmdbSearchResponse = serde_json::from_str(json).unwrap();
        assert_eq!(body.response, "False");
        assert_eq!(body.error.as_deref(), Some("Movie not found!"));
        assert!(body.search.is_empty());
    }

    #[test]
    fn test_search_response_success() {
        let json = r#"{
            "Search": [
                {"Title":"Alien","Year":"1979","imdbID":"tt0078748","Type":"movie","Poster":"http://img/alien.jpg"},
                {"Title":"Aliens","Year":"1986","imdbID":"tt0090605","Type":"movie","Poster":"N/A"}
            ],
            "totalResults": "2",
            "Response": "True"
        }"#;
        let body: OmdbSearchResponse = serde_json::from_str(json).unwrap();
        assert_eq!(body.response, "True");
        assert_eq!(body.search.len(), 2);

        let summaries: Vec<MovieSummary> = body.search.into_iter().map(|r| r.into()).collect();
        assert_eq!(summaries[0].poster.as_deref(), Some("http://img/alien.jpg"));
        assert!(summaries[1].poster.is_none());
    }

    #[test]
    fn test_detail_response_conversion() {
        let json = r#"{
            "Title": "Inception",
            "Year": "2010",
            "Released": "16 Jul 2010",
            "Runtime": "148 min",
            "Genre": "Action, Adventure, Sci-Fi",
            "Director": "Christopher Nolan",
            "Actors": "Leonardo DiCaprio, Joseph Gordon-Levitt",
            "Plot": "A thief who steals corporate secrets...",
            "Poster": "http://img/inception.jpg",
            "imdbRating": "8.8",
            "imdbID": "tt1375666",
            "Response": "True"
        }"#;
        let body: OmdbDetailResponse = serde_json::from_str(json).unwrap();
        let detail: MovieDetail = body.try_into().unwrap();

        assert_eq!(detail.imdb_id, "tt1375666");
        assert_eq!(detail.runtime_minutes(), Some(148));
        assert_eq!(detail.imdb_rating_value(), Some(8.8));
        assert_eq!(detail.director.as_deref(), Some("Christopher Nolan"));
    }

    #[test]
    fn test_detail_response_na_fields_are_none() {
        let json = r#"{
            "Title": "Obscure Short",
            "Year": "2001",
            "Released": "N/A",
            "Runtime": "N/A",
            "Genre": "N/A",
            "Director": "N/A",
            "Actors": "N/A",
            "Plot": "N/A",
            "Poster": "N/A",
            "imdbRating": "N/A",
            "imdbID": "tt9999999",
            "Response": "True"
        }"#;
        let body: OmdbDetailResponse = serde_json::from_str(json).unwrap();
        let detail: MovieDetail = body.try_into().unwrap();

        assert!(detail.runtime.is_none());
        assert!(detail.poster.is_none());
        assert_eq!(detail.runtime_minutes(), None);
        assert_eq!(detail.imdb_rating_value(), None);
    }
}
