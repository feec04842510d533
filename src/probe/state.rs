//! Connection state published by the probe.
//!
//! # States
//! - Up (1): the store answered the initial ping or has reconnected since
//! - Down (0): connect failed, or the driver lost every server
//!
//! The probe is the only writer. Other tasks (the `/health` handler) read
//! through a [`StatusHandle`].

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ConnectionState {
    Down = 0,
    Up = 1,
}

impl ConnectionState {
    /// Value reported on the `mongo_connection_status` gauge.
    pub fn gauge_value(self) -> f64 {
        f64::from(self as u8)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ConnectionState::Down => "down",
            ConnectionState::Up => "up",
        }
    }

    fn from_u8(raw: u8) -> Self {
        if raw == ConnectionState::Up as u8 {
            ConnectionState::Up
        } else {
            ConnectionState::Down
        }
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cheap, cloneable read view of the probe's current state.
#[derive(Debug, Clone)]
pub struct StatusHandle {
    raw: Arc<AtomicU8>,
}

impl StatusHandle {
    pub(crate) fn new(initial: ConnectionState) -> Self {
        Self {
            raw: Arc::new(AtomicU8::new(initial as u8)),
        }
    }

    pub fn get(&self) -> ConnectionState {
        ConnectionState::from_u8(self.raw.load(Ordering::Acquire))
    }

    pub(crate) fn set(&self, state: ConnectionState) {
        self.raw.store(state as u8, Ordering::Release);
    }
}
