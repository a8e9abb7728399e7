use std::sync::{Arc, RwLock};

use tracing::{info, warn};

use super::{WatchedEntry, WatchedError, WatchedStats, WatchedStore};
use crate::metrics::WATCHED_MUTATIONS;

/// The in-memory watched collection, hydrated from a store at startup and
/// written back on every mutation.
///
/// Persistence is best-effort: a failed save is logged, never surfaced, and
/// the in-memory collection stays authoritative for the process lifetime.
pub struct WatchedList {
    store: Arc<dyn WatchedStore>,
    entries: RwLock<Vec<WatchedEntry>>,
}

impl WatchedList {
    /// Hydrate the collection from storage.
    pub fn load(store: Arc<dyn WatchedStore>) -> Result<Self, WatchedError> {
        let entries = store.load()?;
        info!("Watched list loaded with {} entries", entries.len());
        Ok(Self {
            store,
            entries: RwLock::new(entries),
        })
    }

    /// Append a new entry. Rejects ids already present.
    pub fn add(&self, entry: WatchedEntry) -> Result<(), WatchedError> {
        if !(1..=10).contains(&entry.user_rating) {
            return Err(WatchedError::InvalidRating(entry.user_rating));
        }

        let mut entries = self.entries.write().unwrap();
        if entries.iter().any(|e| e.imdb_id == entry.imdb_id) {
            WATCHED_MUTATIONS
                .with_label_values(&["add", "duplicate"])
                .inc();
            return Err(WatchedError::AlreadyWatched(entry.imdb_id));
        }

        entries.push(entry);
        self.persist(&entries);
        WATCHED_MUTATIONS.with_label_values(&["add", "ok"]).inc();
        Ok(())
    }

    /// Remove the entry with the given id. Absent ids leave the collection
    /// unchanged and return `None`.
    pub fn remove(&self, imdb_id: &str) -> Option<WatchedEntry> {
        let mut entries = self.entries.write().unwrap();
        let position = entries.iter().position(|e| e.imdb_id == imdb_id);

        match position {
            Some(index) => {
                let removed = entries.remove(index);
                self.persist(&entries);
                WATCHED_MUTATIONS.with_label_values(&["delete", "ok"]).inc();
                Some(removed)
            }
            None => {
                WATCHED_MUTATIONS
                    .with_label_values(&["delete", "missing"])
                    .inc();
                None
            }
        }
    }

    /// Snapshot of all entries.
    pub fn entries(&self) -> Vec<WatchedEntry> {
        self.entries.read().unwrap().clone()
    }

    /// Whether the id is already in the collection.
    pub fn contains(&self, imdb_id: &str) -> bool {
        self.entries
            .read()
            .unwrap()
            .iter()
            .any(|e| e.imdb_id == imdb_id)
    }

    /// The user's rating for an id already in the collection.
    pub fn user_rating_for(&self, imdb_id: &str) -> Option<u8> {
        self.entries
            .read()
            .unwrap()
            .iter()
            .find(|e| e.imdb_id == imdb_id)
            .map(|e| e.user_rating)
    }

    /// Aggregate statistics over the collection.
    pub fn stats(&self) -> WatchedStats {
        WatchedStats::from_entries(&self.entries.read().unwrap())
    }

    fn persist(&self, entries: &[WatchedEntry]) {
        if let Err(e) = self.store.save(entries) {
            warn!("Failed to persist watched list: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{fixtures, MemoryWatchedStore};

    fn empty_list() -> (WatchedList, Arc<MemoryWatchedStore>) {
        let store = Arc::new(MemoryWatchedStore::new());
        let list = WatchedList::load(store.clone()).unwrap();
        (list, store)
    }

    #[test]
    fn test_add_and_list() {
        let (list, store) = empty_list();
        list.add(fixtures::watched_entry("tt0111161", "The Shawshank Redemption", 10, 142))
            .unwrap();

        assert_eq!(list.entries().len(), 1);
        assert!(list.contains("tt0111161"));
        assert_eq!(list.user_rating_for("tt0111161"), Some(10));
        assert_eq!(store.saved().len(), 1);
    }

    #[test]
    fn test_duplicate_add_rejected() {
        let (list, store) = empty_list();
        list.add(fixtures::watched_entry("tt0111161", "A", 8, 100))
            .unwrap();

        let result = list.add(fixtures::watched_entry("tt0111161", "A", 9, 100));
        assert!(matches!(result, Err(WatchedError::AlreadyWatched(_))));
        assert_eq!(list.entries().len(), 1);
        assert_eq!(list.user_rating_for("tt0111161"), Some(8));
        assert_eq!(store.save_count(), 1);
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let (list, store) = empty_list();
        list.add(fixtures::watched_entry("tt0111161", "A", 8, 100))
            .unwrap();

        assert!(list.remove("tt9999999").is_none());
        assert_eq!(list.entries().len(), 1);
        // No save for a no-op delete.
        assert_eq!(store.save_count(), 1);
    }

    #[test]
    fn test_remove_last_entry_gives_zero_stats() {
        let (list, _store) = empty_list();
        list.add(fixtures::watched_entry("tt0111161", "A", 8, 100))
            .unwrap();

        let removed = list.remove("tt0111161").unwrap();
        assert_eq!(removed.imdb_id, "tt0111161");

        let stats = list.stats();
        assert_eq!(stats.count, 0);
        assert_eq!(stats.avg_user_rating, 0.0);
    }

    #[test]
    fn test_invalid_rating_rejected() {
        let (list, _store) = empty_list();
        let mut entry = fixtures::watched_entry("tt0111161", "A", 8, 100);
        entry.user_rating = 0;
        assert!(matches!(
            list.add(entry),
            Err(WatchedError::InvalidRating(0))
        ));
    }

    #[test]
    fn test_failed_save_does_not_fail_mutation() {
        let store = Arc::new(MemoryWatchedStore::new());
        let list = WatchedList::load(store.clone()).unwrap();
        store.fail_next_save();

        list.add(fixtures::watched_entry("tt0111161", "A", 8, 100))
            .unwrap();
        assert_eq!(list.entries().len(), 1);
    }

    #[test]
    fn test_reload_round_trip() {
        let store = Arc::new(MemoryWatchedStore::new());
        {
            let list = WatchedList::load(store.clone()).unwrap();
            list.add(fixtures::watched_entry("tt0111161", "A", 8, 100))
                .unwrap();
            list.add(fixtures::watched_entry("tt0068646", "B", 9, 175))
                .unwrap();
        }

        let reloaded = WatchedList::load(store).unwrap();
        let entries = reloaded.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].imdb_id, "tt0111161");
        assert_eq!(entries[1].imdb_id, "tt0068646");
    }
}
