//! HTTP server setup and handlers.

use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;

use crate::probe::StatusHandle;

/// Prometheus text exposition content type.
const EXPOSITION_CONTENT_TYPE: &str = "text/plain; version=0.0.4";

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub status: StatusHandle,
    pub metrics: PrometheusHandle,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthReport {
    pub status: String,
    pub mongo: String,
}

/// Build the router with all middleware layers.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/metrics", get(metrics_handler))
        .route("/health", get(health_handler))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Scrape endpoint server.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    pub fn new(state: AppState) -> Self {
        Self {
            router: build_router(state),
        }
    }

    /// Serve until shutdown is broadcast.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "Metrics endpoint listening");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("Metrics endpoint stopped");
        Ok(())
    }
}

async fn metrics_handler(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, EXPOSITION_CONTENT_TYPE)],
        state.metrics.render(),
    )
}

/// Always 200 while the sidecar runs; the store state is informational.
async fn health_handler(State(state): State<AppState>) -> Json<HealthReport> {
    Json(HealthReport {
        status: "ok".to_string(),
        mongo: state.status.get().to_string(),
    })
}
