//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Metrics recorder → probe (Down) → scrape endpoint → connect → event loop
//!
//! Shutdown (shutdown.rs):
//!     Signal received → broadcast → probe unsubscribes, endpoint drains
//!     → store client closed → exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → trigger shutdown
//! ```
//!
//! # Design Decisions
//! - The scrape endpoint is up before connecting, so a slow connect still
//!   reports 0 instead of failing scrapes
//! - Config and listener errors are fatal; store errors are not

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
pub use startup::{run, StartupError};
