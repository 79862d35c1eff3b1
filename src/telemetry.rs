//! Tracing subscriber installation.

use crate::config::{LogConfig, LogFormat};
use thiserror::Error;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Errors raised while installing the global subscriber.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The configured filter directives do not parse.
    #[error("invalid log filter {filter:?}: {source}")]
    Filter {
        /// Directives that were rejected.
        filter: String,
        /// Parser error.
        source: tracing_subscriber::filter::ParseError,
    },

    /// A global subscriber is already installed.
    #[error("failed to install tracing subscriber: {0}")]
    Install(#[from] tracing_subscriber::util::TryInitError),
}

/// Builds the event filter: `RUST_LOG` when set, otherwise the configured
/// directives.
///
/// # Errors
///
/// Returns [`TelemetryError::Filter`] when the configured directives are
/// malformed.
pub fn env_filter(config: &LogConfig) -> Result<EnvFilter, TelemetryError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(&config.filter).map_err(|source| TelemetryError::Filter {
        filter: config.filter.clone(),
        source,
    })
}

/// Installs the global tracing subscriber described by `config`.
///
/// # Errors
///
/// Returns [`TelemetryError`] when the filter is malformed or a subscriber
/// is already installed.
pub fn init_tracing(config: &LogConfig) -> Result<(), TelemetryError> {
    let filter = env_filter(config)?;
    let registry = tracing_subscriber::registry().with(filter);
    match config.format {
        LogFormat::Pretty => registry.with(fmt::layer().pretty()).try_init()?,
        LogFormat::Json => registry
            .with(fmt::layer().json().with_current_span(true))
            .try_init()?,
    }
    Ok(())
}
