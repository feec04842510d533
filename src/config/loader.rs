//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use crate::config::schema::ProbeConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable holding the MongoDB connection string.
pub const MONGODB_URI_ENV: &str = "MONGODB_URI";

/// Environment variable overriding the scrape endpoint bind address.
pub const METRICS_ADDRESS_ENV: &str = "PROBE_METRICS_ADDRESS";

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
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

/// Load configuration from an optional TOML file, apply process environment
/// overrides, then validate.
pub fn load_config(path: Option<&Path>) -> Result<ProbeConfig, ConfigError> {
    let config: ProbeConfig = match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            toml::from_str(&content)?
        }
        None => ProbeConfig::default(),
    };

    let config = apply_env_overrides(config, |key| std::env::var(key).ok());
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Overlay environment values onto a config. Unset or empty variables leave
/// the existing value in place.
pub fn apply_env_overrides<F>(mut config: ProbeConfig, lookup: F) -> ProbeConfig
where
    F: Fn(&str) -> Option<String>,
{
    let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

    if let Some(uri) = non_empty(MONGODB_URI_ENV) {
        config.store.uri = uri;
    }
    if let Some(address) = non_empty(METRICS_ADDRESS_ENV) {
        config.observability.metrics_address = address;
    }

    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::DEFAULT_MONGODB_URI;
    use std::io::Write;

    #[test]
    fn test_missing_uri_falls_back_to_default() {
        let config = apply_env_overrides(ProbeConfig::default(), |_| None);
        assert_eq!(config.store.uri, DEFAULT_MONGODB_URI);
        assert_eq!(config.store.uri, "mongodb://mongodb:27017/restauranty");
    }

    #[test]
    fn test_empty_uri_falls_back_to_default() {
        let config = apply_env_overrides(ProbeConfig::default(), |_| Some(String::new()));
        assert_eq!(config.store.uri, DEFAULT_MONGODB_URI);
    }

    #[test]
    fn test_env_overrides_file_values() {
        let mut config = ProbeConfig::default();
        config.store.uri = "mongodb://from-file:27017/app".into();

        let config = apply_env_overrides(config, |key| match key {
            MONGODB_URI_ENV => Some("mongodb://from-env:27017/orders".into()),
            METRICS_ADDRESS_ENV => Some("127.0.0.1:9999".into()),
            _ => None,
        });

        assert_eq!(config.store.uri, "mongodb://from-env:27017/orders");
        assert_eq!(config.observability.metrics_address, "127.0.0.1:9999");
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[store]\nmax_pool_size = 0").unwrap();

        match load_config(Some(file.path())) {
            Err(ConfigError::Validation(errors)) => {
                assert!(errors.iter().any(|e| e.field == "store.max_pool_size"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_load_reports_parse_errors() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[store\nuri = ").unwrap();

        assert!(matches!(load_config(Some(file.path())), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");

        assert!(matches!(load_config(Some(&path)), Err(ConfigError::Io(_))));
    }
}
