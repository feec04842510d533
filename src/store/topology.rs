//! Reduce driver topology events to connect/disconnect edges.
//!
//! # State Transitions
//! ```text
//! available set non-empty → empty            : Disconnected
//! available set empty → non-empty (after a
//!     Disconnected)                          : Reconnected
//! first server available after startup       : (nothing, reported by connect)
//! ```

use std::collections::HashSet;

use mongodb::event::sdam::SdamEvent;
use mongodb::ServerType;

use crate::probe::LifecycleEvent;

#[derive(Debug, Default)]
pub struct TopologyTracker {
    available: HashSet<String>,
    disconnected: bool,
}

impl TopologyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the availability of one server and return the lifecycle edge,
    /// if this observation crossed one.
    pub fn observe(&mut self, address: &str, available: bool) -> Option<LifecycleEvent> {
        let was_connected = !self.available.is_empty();
        if available {
            self.available.insert(address.to_string());
        } else {
            self.available.remove(address);
        }
        let is_connected = !self.available.is_empty();

        match (was_connected, is_connected) {
            (true, false) => {
                self.disconnected = true;
                Some(LifecycleEvent::Disconnected)
            }
            (false, true) if self.disconnected => {
                self.disconnected = false;
                Some(LifecycleEvent::Reconnected)
            }
            _ => None,
        }
    }

    /// Feed a raw SDAM event. Events that say nothing about server
    /// availability are ignored.
    pub fn observe_sdam(&mut self, event: &SdamEvent) -> Option<LifecycleEvent> {
        match event {
            SdamEvent::ServerDescriptionChanged(change) => {
                let available = change.new_description.server_type() != ServerType::Unknown;
                self.observe(&change.address.to_string(), available)
            }
            SdamEvent::ServerClosed(closed) => self.observe(&closed.address.to_string(), false),
            _ => None,
        }
    }

    pub fn available_servers(&self) -> usize {
        self.available.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_availability_is_silent() {
        let mut tracker = TopologyTracker::new();
        assert_eq!(tracker.observe("mongodb:27017", true), None);
        assert_eq!(tracker.available_servers(), 1);
    }

    #[test]
    fn test_losing_last_server_disconnects() {
        let mut tracker = TopologyTracker::new();
        tracker.observe("a:27017", true);
        tracker.observe("b:27017", true);

        assert_eq!(tracker.observe("a:27017", false), None);
        assert_eq!(tracker.observe("b:27017", false), Some(LifecycleEvent::Disconnected));
    }

    #[test]
    fn test_recovery_after_disconnect_reconnects_once() {
        let mut tracker = TopologyTracker::new();
        tracker.observe("a:27017", true);
        tracker.observe("a:27017", false);

        assert_eq!(tracker.observe("a:27017", true), Some(LifecycleEvent::Reconnected));
        assert_eq!(tracker.observe("b:27017", true), None);
    }

    #[test]
    fn test_repeated_unavailable_reports_are_ignored() {
        let mut tracker = TopologyTracker::new();
        tracker.observe("a:27017", true);

        assert_eq!(tracker.observe("a:27017", false), Some(LifecycleEvent::Disconnected));
        assert_eq!(tracker.observe("a:27017", false), None);
        assert_eq!(tracker.observe("c:27017", false), None);
    }

    #[test]
    fn test_never_connected_server_going_unknown_is_silent() {
        let mut tracker = TopologyTracker::new();
        assert_eq!(tracker.observe("a:27017", false), None);
        assert_eq!(tracker.observe("a:27017", true), None);
    }
}
