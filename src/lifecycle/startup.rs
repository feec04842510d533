//! Startup orchestration.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusRecorder;
use tokio::net::TcpListener;

use crate::config::ProbeConfig;
use crate::http::{AppState, HttpServer};
use crate::lifecycle::Shutdown;
use crate::observability::metrics::{build_recorder, PrometheusSink};
use crate::probe::{lifecycle_channel, HealthProbe};

/// Fatal errors. A failed store connection is deliberately not one of them.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("invalid metrics address '{0}'")]
    MetricsAddress(String),
    #[error("failed to bind metrics endpoint: {0}")]
    Bind(#[source] std::io::Error),
}

/// Run the probe until `stop` resolves.
pub async fn run<F>(config: ProbeConfig, stop: F) -> Result<(), StartupError>
where
    F: Future<Output = ()>,
{
    run_with_recorder(config, build_recorder(), stop).await
}

/// Same as [`run`], exporting through `recorder`. The gauge is registered on
/// it and `/metrics` renders its handle.
pub async fn run_with_recorder<F>(
    config: ProbeConfig,
    recorder: PrometheusRecorder,
    stop: F,
) -> Result<(), StartupError>
where
    F: Future<Output = ()>,
{
    let shutdown = Shutdown::new();
    let probe = HealthProbe::new(Arc::new(PrometheusSink::new(&recorder)));

    let server_task = if config.observability.metrics_enabled {
        let addr: SocketAddr = config
            .observability
            .metrics_address
            .parse()
            .map_err(|_| StartupError::MetricsAddress(config.observability.metrics_address.clone()))?;
        let listener = TcpListener::bind(addr).await.map_err(StartupError::Bind)?;

        let server = HttpServer::new(AppState {
            status: probe.status_handle(),
            metrics: recorder.handle(),
        });
        let server_shutdown = shutdown.subscribe();
        Some(tokio::spawn(async move {
            if let Err(e) = server.run(listener, server_shutdown).await {
                tracing::error!(error = %e, "Metrics endpoint failed");
            }
        }))
    } else {
        tracing::info!("Metrics endpoint disabled");
        None
    };

    tokio::pin!(stop);
    let (events_tx, events_rx) = lifecycle_channel();

    let store = tokio::select! {
        store = probe.connect(&config.store, events_tx) => store,
        _ = &mut stop => {
            tracing::info!("Shutdown requested while connecting, abandoning connect");
            shutdown.trigger();
            if let Some(task) = server_task {
                let _ = task.await;
            }
            return Ok(());
        }
    };

    let probe_shutdown = shutdown.subscribe();
    let events = probe.run(events_rx, probe_shutdown);
    tokio::pin!(events);
    let stream_ended = tokio::select! {
        _ = &mut events => true,
        _ = &mut stop => false,
    };
    if stream_ended {
        // Without a client there is nothing left to observe, but the
        // endpoint keeps reporting 0 until the process is stopped.
        tracing::debug!("No further lifecycle events, waiting for shutdown");
        stop.await;
    }
    shutdown.trigger();
    if !stream_ended {
        events.await;
    }

    if let Some(store) = store {
        store.shutdown().await;
    }
    if let Some(task) = server_task {
        let _ = task.await;
    }

    tracing::info!(state = %probe.state(), "Health probe stopped");
    Ok(())
}
