//! MongoDB connection health probe (sidecar).
//!
//! Connects once to the configured MongoDB deployment and exposes the
//! `mongo_connection_status` gauge (1 = connected, 0 = disconnected),
//! following the driver's disconnect/reconnect notifications afterwards.
//!
//! ```text
//!   MongoDB ──SDAM events──▶ store ──LifecycleEvent──▶ probe ──▶ gauge
//!                                                                  │
//!   Prometheus ◀──────────── GET /metrics ◀── http ◀───────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use mongo_health_probe::config::load_config;
use mongo_health_probe::lifecycle::{self, signals::shutdown_signal};
use mongo_health_probe::observability::logging::init_logging;

#[derive(Parser)]
#[command(name = "mongo-health-probe")]
#[command(about = "Expose MongoDB connection status as a Prometheus gauge", long_about = None)]
struct Cli {
    /// Optional TOML config file. MONGODB_URI overrides the store URI.
    #[arg(short, long, env = "PROBE_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    init_logging(&config.observability.log_level);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        metrics_enabled = config.observability.metrics_enabled,
        metrics_address = %config.observability.metrics_address,
        server_selection_timeout_secs = config.store.server_selection_timeout_secs,
        "mongo-health-probe starting"
    );

    lifecycle::run(config, shutdown_signal()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
