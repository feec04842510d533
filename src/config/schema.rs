//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the probe.
//! All types derive Serde traits for deserialization from config files.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Connection string used when neither the config file nor `MONGODB_URI` set one.
pub const DEFAULT_MONGODB_URI: &str = "mongodb://mongodb:27017/restauranty";

/// Root configuration for the health probe.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProbeConfig {
    /// Data store connection settings.
    pub store: StoreConfig,

    /// Logging and metrics exposition settings.
    pub observability: ObservabilityConfig,
}

/// MongoDB connection settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Connection string (`mongodb://` or `mongodb+srv://`).
    pub uri: String,

    /// How long server selection may block before the connect attempt fails.
    pub server_selection_timeout_secs: u64,

    /// Deadline for individual probe commands.
    pub socket_timeout_secs: u64,

    /// Whether operations may queue while no server is available.
    /// The Rust driver never buffers, so only `false` is meaningful.
    pub buffer_commands: bool,

    /// Upper bound on pooled connections per server.
    pub max_pool_size: u32,
}

impl StoreConfig {
    pub fn server_selection_timeout(&self) -> Duration {
        Duration::from_secs(self.server_selection_timeout_secs)
    }

    pub fn socket_timeout(&self) -> Duration {
        Duration::from_secs(self.socket_timeout_secs)
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            uri: DEFAULT_MONGODB_URI.to_string(),
            server_selection_timeout_secs: 30,
            socket_timeout_secs: 45,
            buffer_commands: false,
            max_pool_size: 10,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable the scrape endpoint.
    pub metrics_enabled: bool,

    /// Scrape endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: true,
            metrics_address: "0.0.0.0:9216".to_string(),
        }
    }
}
