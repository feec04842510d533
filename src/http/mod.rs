//! HTTP surface of the sidecar.
//!
//! # Routes
//! - `GET /metrics`: Prometheus text exposition, scraped externally
//! - `GET /health`: sidecar liveness plus the current store state

pub mod server;

pub use server::{build_router, AppState, HttpServer};
