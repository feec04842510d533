//! MongoDB client construction and the startup ping.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use mongodb::bson::doc;
use mongodb::event::sdam::SdamEvent;
use mongodb::event::EventHandler;
use mongodb::options::ClientOptions;
use mongodb::Client;
use tokio::time;

use crate::config::StoreConfig;
use crate::probe::{EventSender, LifecycleEvent};
use crate::store::topology::TopologyTracker;
use crate::store::StoreError;

/// Reported to the server in the handshake so the probe shows up in `currentOp`.
pub const APP_NAME: &str = "mongo-health-probe";

/// Database used when the connection string names none.
pub const DEFAULT_DATABASE: &str = "test";

/// Owns the topology tracker and the probe's sender for the driver callback.
/// Once detached, edges are still tracked but no longer delivered.
struct EdgeForwarder {
    tracker: TopologyTracker,
    events: Option<EventSender>,
}

impl EdgeForwarder {
    fn new(events: EventSender) -> Self {
        Self {
            tracker: TopologyTracker::new(),
            events: Some(events),
        }
    }

    fn on_sdam(&mut self, event: &SdamEvent) {
        let edge = self.tracker.observe_sdam(event);
        self.forward(edge);
    }

    fn forward(&mut self, edge: Option<LifecycleEvent>) {
        let (Some(edge), Some(events)) = (edge, self.events.as_ref()) else {
            return;
        };
        tracing::debug!(?edge, "Topology edge observed");
        // The probe may already have unsubscribed during shutdown.
        let _ = events.send(edge);
    }

    /// Drop the sender, closing the probe's stream from this side.
    fn detach(&mut self) {
        self.events = None;
    }
}

type SharedForwarder = Arc<Mutex<EdgeForwarder>>;

fn lock(forwarder: &SharedForwarder) -> std::sync::MutexGuard<'_, EdgeForwarder> {
    forwarder.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A live client whose lifecycle events feed the probe.
pub struct StoreHandle {
    client: Client,
    database: String,
    forwarder: SharedForwarder,
}

impl StoreHandle {
    /// Database resolved from the connection string.
    pub fn database(&self) -> &str {
        &self.database
    }

    /// Close the client. Servers closing during shutdown are not reported.
    pub async fn shutdown(self) {
        tracing::debug!(database = %self.database, "Closing MongoDB client");
        lock(&self.forwarder).detach();
        self.client.shutdown().await;
    }
}

/// Build client options from config. Separated out so option mapping can be
/// checked without a server.
pub async fn client_options(config: &StoreConfig) -> Result<ClientOptions, StoreError> {
    let mut options = ClientOptions::parse(&config.uri)
        .await
        .map_err(StoreError::InvalidUri)?;

    options.server_selection_timeout = Some(config.server_selection_timeout());
    options.max_pool_size = Some(config.max_pool_size);
    options.app_name = Some(APP_NAME.to_string());

    if config.buffer_commands {
        tracing::warn!("buffer_commands has no effect: operations are never queued by this client");
    }

    Ok(options)
}

/// Connect to the store and verify it with a `ping`.
///
/// Availability edges seen by the driver's monitor are forwarded to `events`
/// while the client is live. If the ping fails, `events` is dropped before the
/// client closes, so no edge is reported for a connection that never succeeded.
pub async fn open(config: &StoreConfig, events: EventSender) -> Result<StoreHandle, StoreError> {
    let mut options = client_options(config).await?;
    let database = options
        .default_database
        .clone()
        .unwrap_or_else(|| DEFAULT_DATABASE.to_string());

    let forwarder: SharedForwarder = Arc::new(Mutex::new(EdgeForwarder::new(events)));
    let callback_forwarder = Arc::clone(&forwarder);
    options.sdam_event_handler = Some(EventHandler::callback(move |event: SdamEvent| {
        lock(&callback_forwarder).on_sdam(&event);
    }));

    tracing::debug!(
        database = %database,
        server_selection_timeout_secs = config.server_selection_timeout_secs,
        max_pool_size = config.max_pool_size,
        "Connecting to MongoDB"
    );

    let client = Client::with_options(options).map_err(StoreError::Client)?;

    if let Err(e) = ping(&client, &database, config.socket_timeout()).await {
        lock(&forwarder).detach();
        client.shutdown().await;
        return Err(e);
    }

    Ok(StoreHandle {
        client,
        database,
        forwarder,
    })
}

async fn ping(client: &Client, database: &str, deadline: Duration) -> Result<(), StoreError> {
    let db = client.database(database);
    match time::timeout(deadline, db.run_command(doc! { "ping": 1 })).await {
        Ok(Ok(_)) => Ok(()),
        Ok(Err(e)) => Err(StoreError::Ping(e)),
        Err(_) => Err(StoreError::Timeout(deadline)),
    }
}
