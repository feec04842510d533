//! Log subscriber setup.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when `RUST_LOG` is unset.
pub fn default_filter(log_level: &str) -> String {
    format!("mongo_health_probe={log_level},tower_http={log_level},mongodb=warn")
}

/// Install the global subscriber. `RUST_LOG` wins over the configured level.
pub fn init_logging(log_level: &str) {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_filter(log_level))),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_uses_level_for_crate() {
        let filter = default_filter("debug");
        assert!(filter.starts_with("mongo_health_probe=debug"));
        assert!(filter.parse::<EnvFilter>().is_ok());
    }
}
