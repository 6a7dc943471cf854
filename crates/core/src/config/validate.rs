use super::{types::Config, ConfigError};
use crate::search::MAX_BATCH_SIZE;

/// Validate configuration
/// Currently validates:
/// - API base URL is http(s) and the per-call timeout is non-zero
/// - Batch size is between 1 and `MAX_BATCH_SIZE`
/// - Search sizes and age window are non-zero
/// - Retry policy makes at least one attempt and has ordered backoff bounds
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let base_url = &config.api.base_url;
    if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
        return Err(ConfigError::ValidationError(format!(
            "api.base_url must be an http(s) URL, got '{}'",
            base_url
        )));
    }

    if config.api.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "api.timeout_secs cannot be 0".to_string(),
        ));
    }

    if config.search.batch_size == 0 {
        return Err(ConfigError::ValidationError(
            "search.batch_size cannot be 0".to_string(),
        ));
    }

    if config.search.batch_size > MAX_BATCH_SIZE {
        return Err(ConfigError::ValidationError(format!(
            "search.batch_size ({}) exceeds the maximum of {}",
            config.search.batch_size, MAX_BATCH_SIZE
        )));
    }

    if config.search.max_stories == 0 {
        return Err(ConfigError::ValidationError(
            "search.max_stories cannot be 0".to_string(),
        ));
    }

    if config.search.max_age_secs == 0 {
        return Err(ConfigError::ValidationError(
            "search.max_age_secs cannot be 0".to_string(),
        ));
    }

    if config.retry.max_attempts == 0 {
        return Err(ConfigError::ValidationError(
            "retry.max_attempts cannot be 0".to_string(),
        ));
    }

    if config.retry.initial_backoff_ms > config.retry.max_backoff_ms {
        return Err(ConfigError::ValidationError(format!(
            "retry.initial_backoff_ms ({}) exceeds retry.max_backoff_ms ({})",
            config.retry.initial_backoff_ms, config.retry.max_backoff_ms
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_invalid(config: &Config) {
        let result = validate_config(config);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_validate_default_config() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_non_http_base_url_fails() {
        let mut config = Config::default();
        config.api.base_url = "ftp://example.com/v0".to_string();
        assert_invalid(&config);
    }

    #[test]
    fn test_validate_zero_timeout_fails() {
        let mut config = Config::default();
        config.api.timeout_secs = 0;
        assert_invalid(&config);
    }

    #[test]
    fn test_validate_oversized_batch_fails() {
        let mut config = Config::default();
        config.search.batch_size = MAX_BATCH_SIZE + 1;
        assert_invalid(&config);

        config.search.batch_size = MAX_BATCH_SIZE;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_zero_batch_size_fails() {
        let mut config = Config::default();
        config.search.batch_size = 0;
        assert_invalid(&config);
    }

    #[test]
    fn test_validate_zero_max_stories_fails() {
        let mut config = Config::default();
        config.search.max_stories = 0;
        assert_invalid(&config);
    }

    #[test]
    fn test_validate_zero_age_window_fails() {
        let mut config = Config::default();
        config.search.max_age_secs = 0;
        assert_invalid(&config);
    }

    #[test]
    fn test_validate_zero_attempts_fails() {
        let mut config = Config::default();
        config.retry.max_attempts = 0;
        assert_invalid(&config);
    }

    #[test]
    fn test_validate_inverted_backoff_fails() {
        let mut config = Config::default();
        config.retry.initial_backoff_ms = 5000;
        config.retry.max_backoff_ms = 100;
        assert_invalid(&config);
    }
}
