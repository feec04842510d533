//! Lifecycle notifications emitted by the store client.

use tokio::sync::mpsc;

/// A connectivity edge observed on the store client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    /// Every known server became unavailable.
    Disconnected,
    /// A server became available again after a disconnect.
    Reconnected,
}

pub type EventSender = mpsc::UnboundedSender<LifecycleEvent>;
pub type EventStream = mpsc::UnboundedReceiver<LifecycleEvent>;

/// Create the subscription pair the store client publishes into and the
/// probe consumes from. Dropping the stream unsubscribes.
pub fn lifecycle_channel() -> (EventSender, EventStream) {
    mpsc::unbounded_channel()
}
