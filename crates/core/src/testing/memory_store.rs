//! In-memory watched store for testing.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::watched::{WatchedEntry, WatchedError, WatchedStore};

/// A watched store that keeps the persisted array in memory.
///
/// Counts saves and can be told to fail the next one, so best-effort
/// persistence paths can be asserted on.
#[derive(Default)]
pub struct MemoryWatchedStore {
    entries: Mutex<Vec<WatchedEntry>>,
    save_count: AtomicUsize,
    fail_next_save: AtomicBool,
}

impl MemoryWatchedStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the persisted state before a `WatchedList::load`.
    pub fn seed(&self, entries: Vec<WatchedEntry>) {
        *self.entries.lock().unwrap() = entries;
    }

    /// The currently persisted array.
    pub fn saved(&self) -> Vec<WatchedEntry> {
        self.entries.lock().unwrap().clone()
    }

    /// How many saves have been performed.
    pub fn save_count(&self) -> usize {
        self.save_count.load(Ordering::SeqCst)
    }

    /// Make the next save fail with a storage error.
    pub fn fail_next_save(&self) {
        self.fail_next_save.store(true, Ordering::SeqCst);
    }
}

impl WatchedStore for MemoryWatchedStore {
    fn load(&self) -> Result<Vec<WatchedEntry>, WatchedError> {
        Ok(self.entries.lock().unwrap().clone())
    }

    fn save(&self, entries: &[WatchedEntry]) -> Result<(), WatchedError> {
        if self.fail_next_save.swap(false, Ordering::SeqCst) {
            return Err(WatchedError::Storage("injected save failure".to_string()));
        }
        self.save_count.fetch_add(1, Ordering::SeqCst);
        *self.entries.lock().unwrap() = entries.to_vec();
        Ok(())
    }
}
