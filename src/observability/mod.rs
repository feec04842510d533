//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! HealthProbe state changes
//!     → logging.rs (tracing events on stdout)
//!     → metrics.rs (MetricsSink → mongo_connection_status gauge)
//!
//! Consumers:
//!     → Log aggregation (container stdout)
//!     → Metrics endpoint (Prometheus scrape)
//! ```

pub mod logging;
pub mod metrics;
