//! Data store adapter.
//!
//! # Responsibilities
//! - Build a MongoDB client with bounded timeouts
//! - Verify the connection once at startup
//! - Translate driver topology events into probe lifecycle events

pub mod client;
pub mod topology;

use std::time::Duration;

pub use client::{open, StoreHandle};
pub use topology::TopologyTracker;

/// Everything that can go wrong while establishing the store connection.
/// The probe treats all of these as a single connection failure.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("invalid connection string: {0}")]
    InvalidUri(#[source] mongodb::error::Error),
    #[error("failed to create client: {0}")]
    Client(#[source] mongodb::error::Error),
    #[error("ping failed: {0}")]
    Ping(#[source] mongodb::error::Error),
    #[error("ping timed out after {0:?}")]
    Timeout(Duration),
}
