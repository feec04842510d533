//! Dependency health probe.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     connect() → ping store → Up / Down
//!
//! Steady state:
//!     store SDAM events → TopologyTracker → LifecycleEvent stream
//!     → run() → on_disconnected / on_reconnected
//!     → MetricsSink (mongo_connection_status)
//! ```
//!
//! # Design Decisions
//! - Connection failures are never escalated; the gauge carries the outcome
//! - Retries are left to the driver's own server monitoring
//! - The event stream is owned by `run` and dropped on shutdown

pub mod event;
pub mod state;

use std::sync::Arc;

use tokio::sync::broadcast;

use crate::config::StoreConfig;
use crate::observability::metrics::MetricsSink;
use crate::store::{self, StoreHandle};

pub use event::{lifecycle_channel, EventSender, EventStream, LifecycleEvent};
pub use state::{ConnectionState, StatusHandle};

/// Tracks the store's connection state and mirrors it onto a metrics sink.
pub struct HealthProbe {
    state: StatusHandle,
    sink: Arc<dyn MetricsSink>,
}

impl HealthProbe {
    /// Create a probe in the `Down` state and publish that to the sink.
    pub fn new(sink: Arc<dyn MetricsSink>) -> Self {
        let probe = Self {
            state: StatusHandle::new(ConnectionState::Down),
            sink,
        };
        probe.sink.record_connection_state(ConnectionState::Down);
        probe
    }

    pub fn state(&self) -> ConnectionState {
        self.state.get()
    }

    pub fn status_handle(&self) -> StatusHandle {
        self.state.clone()
    }

    /// Attempt the single startup connection.
    ///
    /// Lifecycle events from the client are published on `events` for as long
    /// as the returned handle lives. On failure the probe is left `Down` and
    /// `None` is returned; nothing is retried.
    pub async fn connect(&self, config: &StoreConfig, events: EventSender) -> Option<StoreHandle> {
        match store::open(config, events).await {
            Ok(handle) => {
                tracing::info!(database = %handle.database(), "Connected to MongoDB");
                self.set_state(ConnectionState::Up);
                Some(handle)
            }
            Err(e) => {
                tracing::error!(error = %e, "Error connecting to MongoDB");
                self.set_state(ConnectionState::Down);
                None
            }
        }
    }

    pub fn on_disconnected(&self) {
        tracing::warn!("MongoDB disconnected");
        self.set_state(ConnectionState::Down);
    }

    pub fn on_reconnected(&self) {
        tracing::info!("MongoDB reconnected");
        self.set_state(ConnectionState::Up);
    }

    pub fn handle(&self, event: LifecycleEvent) {
        match event {
            LifecycleEvent::Disconnected => self.on_disconnected(),
            LifecycleEvent::Reconnected => self.on_reconnected(),
        }
    }

    /// Consume lifecycle events until shutdown is signalled or every sender
    /// is gone. The stream is dropped on return.
    pub async fn run(&self, mut events: EventStream, mut shutdown: broadcast::Receiver<()>) {
        loop {
            tokio::select! {
                event = events.recv() => match event {
                    Some(event) => self.handle(event),
                    None => {
                        tracing::debug!("Lifecycle event stream closed");
                        break;
                    }
                },
                _ = shutdown.recv() => {
                    tracing::info!("Health probe received shutdown signal, unsubscribing");
                    break;
                }
            }
        }
    }

    fn set_state(&self, state: ConnectionState) {
        self.state.set(state);
        self.sink.record_connection_state(state);
    }
}
