//! Configuration validation.
//!
//! Serde handles syntax; this module checks value ranges and formats.
//! Every violation is collected so a bad file can be fixed in one pass.

use std::fmt;
use std::net::SocketAddr;

use crate::config::schema::ProbeConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field, e.g. `store.uri`.
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a parsed configuration.
pub fn validate_config(config: &ProbeConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let store = &config.store;

    if !(store.uri.starts_with("mongodb://") || store.uri.starts_with("mongodb+srv://")) {
        errors.push(ValidationError::new(
            "store.uri",
            "must start with mongodb:// or mongodb+srv://",
        ));
    }
    if store.server_selection_timeout_secs == 0 {
        errors.push(ValidationError::new(
            "store.server_selection_timeout_secs",
            "must be greater than zero",
        ));
    }
    if store.socket_timeout_secs == 0 {
        errors.push(ValidationError::new(
            "store.socket_timeout_secs",
            "must be greater than zero",
        ));
    }
    if store.max_pool_size == 0 {
        errors.push(ValidationError::new(
            "store.max_pool_size",
            "must be greater than zero",
        ));
    }

    let observability = &config.observability;
    if !LOG_LEVELS.contains(&observability.log_level.as_str()) {
        errors.push(ValidationError::new(
            "observability.log_level",
            format!("unknown level '{}'", observability.log_level),
        ));
    }
    if observability.metrics_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("'{}' is not a socket address", observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
