//! MongoDB connection health probe.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod probe;
pub mod store;

pub use config::ProbeConfig;
pub use lifecycle::Shutdown;
pub use probe::{ConnectionState, HealthProbe, LifecycleEvent};
