//! Tracing subscriber bootstrap

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{LogFormat, LoggingConfig};
use crate::error::{Result, TetherError};

/// Install the global subscriber. `RUST_LOG` overrides the configured level.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| TetherError::Logging(e.to_string()))?;

    let registry = tracing_subscriber::registry().with(env_filter);
    let result = match config.format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_target(true))
            .try_init(),
        LogFormat::Text => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_ansi(config.color)
                    .with_thread_ids(false)
                    .with_file(false),
            )
            .try_init(),
    };

    result.map_err(|e| TetherError::Logging(e.to_string()))?;
    tracing::info!(level = %config.level, format = ?config.format, "Logging initialised");
    Ok(())
}
