pub mod catalog;
pub mod config;
pub mod detail;
pub mod metrics;
pub mod search;
pub mod testing;
pub mod watched;

pub use catalog::{CatalogError, MovieCatalog, MovieDetail, MovieSummary, OmdbClient, OmdbConfig};
pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, SanitizedConfig,
    ServerConfig, StorageConfig,
};
pub use detail::{DetailSession, DetailState, RatingDraft, TitlePort};
pub use search::{SearchSession, SearchState};
pub use watched::{
    JsonWatchedStore, WatchedEntry, WatchedError, WatchedList, WatchedStats, WatchedStore,
};
