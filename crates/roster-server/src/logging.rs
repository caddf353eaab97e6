//! Tracing subscriber setup.

use roster_config::{LogFormat, ObservabilityConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Builds the filter: `RUST_LOG` wins over the configured level.
pub fn env_filter(config: &ObservabilityConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level))
}

/// Installs the global subscriber.
///
/// Returns an error if a subscriber is already installed.
pub fn init_logging(config: &ObservabilityConfig) -> anyhow::Result<()> {
    let registry = tracing_subscriber::registry().with(env_filter(config));

    match config.log_format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_target(true))
            .try_init()?,
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .try_init()?,
    }

    Ok(())
}
