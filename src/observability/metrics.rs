//! Metrics collection and exposition.
//!
//! # Metrics
//! - `mongo_connection_status` (gauge): 1=connected, 0=disconnected
//!
//! The probe never touches a recorder directly; it writes through a
//! [`MetricsSink`] so tests and embedders can substitute their own.

use metrics::{Gauge, Recorder};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusRecorder};

use crate::probe::ConnectionState;

pub const CONNECTION_STATUS: &str = "mongo_connection_status";

const CONNECTION_STATUS_HELP: &str =
    "Indicates MongoDB connection status: 1 for connected, 0 for disconnected";

/// Destination for the probe's gauge updates.
pub trait MetricsSink: Send + Sync {
    fn record_connection_state(&self, state: ConnectionState);
}

/// Sink holding a gauge registered on one specific recorder, so the values
/// it writes are the ones that recorder's handle renders.
#[derive(Clone)]
pub struct PrometheusSink {
    gauge: Gauge,
}

impl PrometheusSink {
    /// Register the gauge and its help text on `recorder`.
    pub fn new(recorder: &dyn Recorder) -> Self {
        let gauge = metrics::with_local_recorder(recorder, || {
            metrics::describe_gauge!(CONNECTION_STATUS, CONNECTION_STATUS_HELP);
            metrics::gauge!(CONNECTION_STATUS)
        });
        Self { gauge }
    }
}

impl MetricsSink for PrometheusSink {
    fn record_connection_state(&self, state: ConnectionState) {
        self.gauge.set(state.gauge_value());
    }
}

/// Build the recorder whose handle backs the `/metrics` endpoint.
pub fn build_recorder() -> PrometheusRecorder {
    PrometheusBuilder::new().build_recorder()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gauge_sample(rendered: &str) -> Option<f64> {
        rendered
            .lines()
            .find_map(|line| line.strip_prefix("mongo_connection_status "))
            .and_then(|value| value.trim().parse().ok())
    }

    #[test]
    fn test_prometheus_sink_renders_latest_state() {
        let recorder = build_recorder();
        let handle = recorder.handle();
        let sink = PrometheusSink::new(&recorder);

        sink.record_connection_state(ConnectionState::Up);
        let rendered = handle.render();
        assert!(rendered.contains("# TYPE mongo_connection_status gauge"));
        assert!(rendered.contains(CONNECTION_STATUS_HELP));
        assert_eq!(gauge_sample(&rendered), Some(1.0));

        sink.record_connection_state(ConnectionState::Down);
        assert_eq!(gauge_sample(&handle.render()), Some(0.0));
    }

    #[test]
    fn test_sinks_on_separate_recorders_do_not_mix() {
        let first = build_recorder();
        let second = build_recorder();

        PrometheusSink::new(&first).record_connection_state(ConnectionState::Up);
        PrometheusSink::new(&second).record_connection_state(ConnectionState::Down);

        assert_eq!(gauge_sample(&first.handle().render()), Some(1.0));
        assert_eq!(gauge_sample(&second.handle().render()), Some(0.0));
    }
}
