use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - OMDB section exists (enforced by serde)
/// - API key is non-empty
/// - Server port is not 0
/// - Watched path is non-empty
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.omdb.api_key.is_empty() {
        return Err(ConfigError::ValidationError(
            "omdb.api_key cannot be empty".to_string(),
        ));
    }

    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    if config.storage.watched_path.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "storage.watched_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}
