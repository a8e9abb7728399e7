//! Search-fetch lifecycle.
//!
//! Keystroke-driven catalog search with cancel-on-change semantics: each
//! query change supersedes the in-flight request, and a superseded request's
//! outcome is never applied to state.

mod session;

pub use session::{SearchSession, SearchState, MIN_QUERY_LEN};
