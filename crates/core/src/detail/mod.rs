//! Detail-fetch lifecycle.
//!
//! Fetches full detail for the selected title and drives the ambient
//! page-title side effect through an injected [`TitlePort`].

mod rating;
mod session;

pub use rating::RatingDraft;
pub use session::{DetailSession, DetailState};

/// Ambient title restored whenever no detail view is active.
pub const DEFAULT_TITLE: &str = "POPCORN";

/// Capability port for the ambient "current title" display value.
///
/// The server forwards title changes to the connected client. Injected so
/// the lifecycle is testable without any real display.
pub trait TitlePort: Send + Sync {
    /// Set the ambient title while a detail view is active.
    fn set_title(&self, title: &str);

    /// Restore the default title.
    fn reset(&self);
}

/// A no-op port for contexts with no ambient title to drive.
#[derive(Debug, Default)]
pub struct NoopTitlePort;

impl TitlePort for NoopTitlePort {
    fn set_title(&self, _title: &str) {}
    fn reset(&self) {}
}
