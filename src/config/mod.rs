//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → environment overrides (MONGODB_URI, PROBE_METRICS_ADDRESS)
//!     → validation.rs (semantic checks)
//!     → ProbeConfig (validated, immutable)
//! ```
//!
//! # Design Decisions
//! - Config is read once at startup; a sidecar restart picks up changes
//! - All fields have defaults so the probe runs with no file at all
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{ObservabilityConfig, ProbeConfig, StoreConfig, DEFAULT_MONGODB_URI};
