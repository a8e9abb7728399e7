//! The watched collection: rated titles and their persistence.
//!
//! The collection is the sole unit persisted; storage is a single JSON
//! array, fully overwritten on every mutation.

mod json_store;
mod list;
mod types;

pub use json_store::JsonWatchedStore;
pub use list::WatchedList;
pub use types::{WatchedEntry, WatchedStats};

use thiserror::Error;

/// Errors for watched list operations.
#[derive(Debug, Error)]
pub enum WatchedError {
    /// The title is already in the collection. IDs are unique; a present
    /// title is never re-addable.
    #[error("Title already in the watched list: {0}")]
    AlreadyWatched(String),

    /// User rating outside the 1-10 scale.
    #[error("User rating must be between 1 and 10, got {0}")]
    InvalidRating(u8),

    /// Storage read/write failure.
    #[error("Storage error: {0}")]
    Storage(String),
}

/// Storage port for the watched collection.
///
/// Load happens once at startup; save rewrites the whole collection,
/// last-write-wins, no incremental update.
pub trait WatchedStore: Send + Sync {
    /// Read the persisted collection. Absent storage yields an empty list.
    fn load(&self) -> Result<Vec<WatchedEntry>, WatchedError>;

    /// Overwrite the persisted collection.
    fn save(&self, entries: &[WatchedEntry]) -> Result<(), WatchedError>;
}
