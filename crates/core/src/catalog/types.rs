//! Types for movie catalog API responses.

use serde::{Deserialize, Serialize};

/// A title as it appears in search results.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieSummary {
    /// IMDb ID (e.g. "tt0111161").
    pub imdb_id: String,
    /// Title text.
    pub title: String,
    /// Release year as reported by the catalog (may be a range for series).
    pub year: String,
    /// Poster image URL. The catalog's "N/A" sentinel maps to `None`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
}

/// Full detail for a single title.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieDetail {
    /// IMDb ID.
    pub imdb_id: String,
    /// Title text.
    pub title: String,
    /// Release year.
    pub year: String,
    /// Release date (e.g. "14 Oct 1994").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub released: Option<String>,
    /// Runtime as free text (e.g. "148 min").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime: Option<String>,
    /// Genre names, comma separated as reported by the catalog.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    /// Director credit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub director: Option<String>,
    /// Cast credit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actors: Option<String>,
    /// Plot summary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plot: Option<String>,
    /// Poster image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
    /// Aggregate IMDb rating as free text (e.g. "9.3").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imdb_rating: Option<String>,
}

impl MovieDetail {
    /// Parse the runtime free text into whole minutes.
    ///
    /// "148 min" -> Some(148). Returns `None` when the runtime is missing
    /// or does not start with an integer.
    pub fn runtime_minutes(&self) -> Option<u32> {
        self.runtime
            .as_ref()
            .and_then(|r| r.split_whitespace().next())
            .and_then(|n| n.parse().ok())
    }

    /// Parse the aggregate rating into a number.
    pub fn imdb_rating_value(&self) -> Option<f32> {
        self.imdb_rating.as_ref().and_then(|r| r.parse().ok())
    }

    /// A search-result view of this detail.
    pub fn summary(&self) -> MovieSummary {
        MovieSummary {
            imdb_id: self.imdb_id.clone(),
            title: self.title.clone(),
            year: self.year.clone(),
            poster: self.poster.clone(),
        }
    }
}
