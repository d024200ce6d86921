//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::RelayConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse a configuration from TOML text without validating it.
pub fn parse_config(content: &str) -> Result<RelayConfig, ConfigError> {
    Ok(toml::from_str(content)?)
}

/// Load a configuration from a TOML file without validating it.
///
/// Callers that layer overrides on top (e.g. CLI flags) validate the merged result.
pub fn read_config(path: &Path) -> Result<RelayConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<RelayConfig, ConfigError> {
    let config = read_config(path)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::LogFormat;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config.upstream.url, "https://ecsc-expat.sy:8443");
        assert_eq!(config.cookies.login_path, "/secure/auth/login");
        assert!(config.upstream.alt_used);
    }

    #[test]
    fn test_partial_sections_keep_other_defaults() {
        let config = parse_config(
            r#"
            [upstream]
            url = "http://127.0.0.1:3000"

            [observability]
            log_format = "json"
            log_exchanges = true
            "#,
        )
        .unwrap();

        assert_eq!(config.upstream.url, "http://127.0.0.1:3000");
        assert!(config.upstream.alt_used);
        assert_eq!(config.observability.log_format, LogFormat::Json);
        assert!(config.observability.log_exchanges);
        assert_eq!(config.observability.body_log_limit, 2048);
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
    }

    #[test]
    fn test_syntax_error_is_parse_error() {
        let err = parse_config("[upstream\nurl = 1").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_config(Path::new("/definitely/not/here/relay.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let path = std::env::temp_dir().join(format!("cors-relay-{}.toml", uuid::Uuid::new_v4()));
        fs::write(&path, "[timeouts]\nconnect_secs = 0\n").unwrap();

        let err = load_config(&path).unwrap_err();
        fs::remove_file(&path).ok();

        match err {
            ConfigError::Validation(errors) => {
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].field, "timeouts.connect_secs");
            }
            other => panic!("expected validation error, got {other}"),
        }
    }
}
