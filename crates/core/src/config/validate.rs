use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Library section exists (enforced by serde)
/// - Server port is not 0
/// - Cache durations and page size are not 0
/// - Tag file name is a bare file name
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    if config.cache.staleness_secs == 0 {
        return Err(ConfigError::ValidationError(
            "cache.staleness_secs cannot be 0".to_string(),
        ));
    }

    if config.cache.search_ttl_secs == 0 {
        return Err(ConfigError::ValidationError(
            "cache.search_ttl_secs cannot be 0".to_string(),
        ));
    }

    if config.cache.max_page_size == 0 {
        return Err(ConfigError::ValidationError(
            "cache.max_page_size cannot be 0".to_string(),
        ));
    }

    let tag_file = config.library.tag_file.as_str();
    if tag_file.trim().is_empty()
        || tag_file.trim() != tag_file
        || tag_file.contains(['/', '\\'])
        || matches!(tag_file, "." | "..")
    {
        return Err(ConfigError::ValidationError(format!(
            "library.tag_file must be a plain file name, got {:?}",
            config.library.tag_file
        )));
    }

    Ok(())
}
