use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::WatchedError;
use crate::catalog::MovieDetail;

/// A rated title in the watched collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WatchedEntry {
    /// IMDb ID, unique within the collection.
    pub imdb_id: String,
    /// Title text.
    pub title: String,
    /// Release year.
    pub year: String,
    /// Poster image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
    /// Runtime in whole minutes, parsed from the detail's free text.
    /// 0 when the catalog reported no runtime.
    pub runtime_minutes: u32,
    /// Aggregate rating reported by the external catalog. 0.0 when absent.
    pub imdb_rating: f32,
    /// The user's own rating, 1-10.
    pub user_rating: u8,
    /// How many distinct rating values the user picked before submitting.
    pub rating_decisions: u32,
    /// When the entry was added.
    pub added_at: DateTime<Utc>,
}

impl WatchedEntry {
    /// Build an entry from a fetched detail plus the user's rating draft.
    pub fn from_detail(
        detail: &MovieDetail,
        user_rating: u8,
        rating_decisions: u32,
    ) -> Result<Self, WatchedError> {
        if !(1..=10).contains(&user_rating) {
            return Err(WatchedError::InvalidRating(user_rating));
        }

        Ok(Self {
            imdb_id: detail.imdb_id.clone(),
            title: detail.title.clone(),
            year: detail.year.clone(),
            poster: detail.poster.clone(),
            runtime_minutes: detail.runtime_minutes().unwrap_or(0),
            imdb_rating: detail.imdb_rating_value().unwrap_or(0.0),
            user_rating,
            rating_decisions,
            added_at: Utc::now(),
        })
    }
}

/// Aggregate statistics over the watched collection.
///
/// All averages are 0.0 for an empty collection; no NaN ever leaves here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WatchedStats {
    pub count: usize,
    pub avg_imdb_rating: f64,
    pub avg_user_rating: f64,
    pub avg_runtime_minutes: f64,
}

impl WatchedStats {
    pub fn from_entries(entries: &[WatchedEntry]) -> Self {
        if entries.is_empty() {
            return Self::default();
        }

        let count = entries.len();
        let n = count as f64;
        Self {
            count,
            avg_imdb_rating: entries.iter().map(|e| e.imdb_rating as f64).sum::<f64>() / n,
            avg_user_rating: entries.iter().map(|e| e.user_rating as f64).sum::<f64>() / n,
            avg_runtime_minutes: entries.iter().map(|e| e.runtime_minutes as f64).sum::<f64>()
                / n,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;

    #[test]
    fn test_from_detail_parses_numeric_fields() {
        let mut detail = fixtures::movie_detail("tt1375666", "Inception");
        detail.runtime = Some("148 min".to_string());
        detail.imdb_rating = Some("8.8".to_string());

        let entry = WatchedEntry::from_detail(&detail, 9, 3).unwrap();
        assert_eq!(entry.runtime_minutes, 148);
        assert_eq!(entry.imdb_rating, 8.8);
        assert_eq!(entry.user_rating, 9);
        assert_eq!(entry.rating_decisions, 3);
    }

    #[test]
    fn test_from_detail_defaults_missing_numbers_to_zero() {
        let mut detail = fixtures::movie_detail("tt9999999", "Obscure Short");
        detail.runtime = None;
        detail.imdb_rating = None;

        let entry = WatchedEntry::from_detail(&detail, 5, 1).unwrap();
        assert_eq!(entry.runtime_minutes, 0);
        assert_eq!(entry.imdb_rating, 0.0);
    }

    #[test]
    fn test_from_detail_rejects_invalid_rating() {
        let detail = fixtures::movie_detail("tt1375666", "Inception");
        assert!(matches!(
            WatchedEntry::from_detail(&detail, 0, 0),
            Err(WatchedError::InvalidRating(0))
        ));
        assert!(matches!(
            WatchedEntry::from_detail(&detail, 11, 0),
            Err(WatchedError::InvalidRating(11))
        ));
    }

    #[test]
    fn test_stats_empty_collection_is_zero_safe() {
        let stats = WatchedStats::from_entries(&[]);
        assert_eq!(stats.count, 0);
        assert_eq!(stats.avg_imdb_rating, 0.0);
        assert_eq!(stats.avg_user_rating, 0.0);
        assert_eq!(stats.avg_runtime_minutes, 0.0);
    }

    #[test]
    fn test_stats_averages() {
        let entries = vec![
            fixtures::watched_entry("tt0000001", "A", 8, 100),
            fixtures::watched_entry("tt0000002", "B", 6, 140),
        ];
        let stats = WatchedStats::from_entries(&entries);
        assert_eq!(stats.count, 2);
        assert_eq!(stats.avg_user_rating, 7.0);
        assert_eq!(stats.avg_runtime_minutes, 120.0);
    }

    #[test]
    fn test_entry_serde_round_trip() {
        let entry = fixtures::watched_entry("tt0111161", "The Shawshank Redemption", 10, 142);
        let json = serde_json::to_string(&entry).unwrap();
        let back: WatchedEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(entry, back);
    }
}
