use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Upload size ceiling is not 0
/// - Backend tool timeout is not 0
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    if config.storage.max_upload_bytes == 0 {
        return Err(ConfigError::ValidationError(
            "storage.max_upload_bytes cannot be 0".to_string(),
        ));
    }

    if config.tools.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "tools.timeout_secs cannot be 0".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_default_config() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_port_zero_fails() {
        let mut config = Config::default();
        config.server.port = 0;
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_validate_zero_upload_limit_fails() {
        let mut config = Config::default();
        config.storage.max_upload_bytes = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_zero_timeout_fails() {
        let mut config = Config::default();
        config.tools.timeout_secs = 0;
        assert!(validate_config(&config).is_err());
    }
}
