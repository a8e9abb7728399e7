//! Recording title port for testing the detail lifecycle's side effect.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::detail::{TitlePort, DEFAULT_TITLE};

/// A [`TitlePort`] that records every title set and counts resets.
pub struct RecordingTitlePort {
    current: Mutex<String>,
    titles: Mutex<Vec<String>>,
    resets: AtomicUsize,
}

impl Default for RecordingTitlePort {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingTitlePort {
    pub fn new() -> Self {
        Self {
            current: Mutex::new(DEFAULT_TITLE.to_string()),
            titles: Mutex::new(Vec::new()),
            resets: AtomicUsize::new(0),
        }
    }

    /// The ambient title right now.
    pub fn current(&self) -> String {
        self.current.lock().unwrap().clone()
    }

    /// Every title that was set, in order.
    pub fn titles(&self) -> Vec<String> {
        self.titles.lock().unwrap().clone()
    }

    /// How many times the title was restored to the default.
    pub fn resets(&self) -> usize {
        self.resets.load(Ordering::SeqCst)
    }
}

impl TitlePort for RecordingTitlePort {
    fn set_title(&self, title: &str) {
        *self.current.lock().unwrap() = title.to_string();
        self.titles.lock().unwrap().push(title.to_string());
    }

    fn reset(&self) {
        *self.current.lock().unwrap() = DEFAULT_TITLE.to_string();
        self.resets.fetch_add(1, Ordering::SeqCst);
    }
}
