use super::{types::Config, AuthMethod, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Auth section exists (enforced by serde)
/// - Server port is not 0
/// - Base path is absolute
/// - Basic auth rule is not empty
/// - Image timeouts are not 0
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    if !config.server.base_path.starts_with('/') {
        return Err(ConfigError::ValidationError(format!(
            "server.base_path must start with '/', got '{}'",
            config.server.base_path
        )));
    }

    if config.auth.method == AuthMethod::Basic
        && config.auth.basic.username_prefix.is_empty()
        && config.auth.basic.password_suffix.is_empty()
    {
        return Err(ConfigError::ValidationError(
            "auth.basic must set username_prefix or password_suffix".to_string(),
        ));
    }

    if config.images.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "images.timeout_secs cannot be 0".to_string(),
        ));
    }

    if config.images.connect_timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "images.connect_timeout_secs cannot be 0".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_config_from_str;

    fn base_config() -> Config {
        load_config_from_str(
            r#"
[auth]
method = "basic"
"#,
        )
        .unwrap()
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(validate_config(&base_config()).is_ok());
    }

    #[test]
    fn test_validate_port_zero_fails() {
        let mut config = base_config();
        config.server.port = 0;
        let result = validate_config(&config);
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_validate_relative_base_path_fails() {
        let mut config = base_config();
        config.server.base_path = "cats".to_string();
        let result = validate_config(&config);
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_validate_empty_basic_rule_fails() {
        let mut config = base_config();
        config.auth.basic.username_prefix = String::new();
        config.auth.basic.password_suffix = String::new();
        let result = validate_config(&config);
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_validate_empty_rule_ignored_without_basic_auth() {
        let mut config = base_config();
        config.auth.method = AuthMethod::None;
        config.auth.basic.username_prefix = String::new();
        config.auth.basic.password_suffix = String::new();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_zero_image_timeout_fails() {
        let mut config = base_config();
        config.images.timeout_secs = 0;
        let result = validate_config(&config);
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_validate_zero_connect_timeout_fails() {
        let mut config = base_config();
        config.images.connect_timeout_secs = 0;
        let result = validate_config(&config);
        assert!(
            matches!(result, Err(ConfigError::ValidationError(msg)) if msg.contains("connect_timeout_secs"))
        );
    }
}
