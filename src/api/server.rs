//! Binding, middleware and graceful shutdown for the API server.

use super::{AppState, router};
use crate::config::ServerConfig;
use axum::http::{HeaderValue, Method, header};
use std::io;
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};

/// Errors raised while starting or running the server.
#[derive(Debug, Error)]
pub enum ServeError {
    /// The configured allowed origin is not a valid header value.
    #[error("invalid allowed origin {origin:?}")]
    InvalidOrigin {
        /// The rejected origin.
        origin: String,
    },

    /// The listener could not be bound.
    #[error("failed to bind {address}: {source}")]
    Bind {
        /// Address that was requested.
        address: String,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The server stopped with an I/O error.
    #[error("server error: {0}")]
    Io(#[from] io::Error),
}

/// Builds the CORS layer for `allowed_origin`, allowing credentials.
///
/// # Errors
///
/// Returns [`ServeError::InvalidOrigin`] when the origin is not a valid
/// header value.
pub fn cors_layer(allowed_origin: &str) -> Result<CorsLayer, ServeError> {
    let origin =
        HeaderValue::from_str(allowed_origin).map_err(|_| ServeError::InvalidOrigin {
            origin: allowed_origin.to_owned(),
        })?;
    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]))
}

/// Serves the API on the configured address until Ctrl-C is received.
///
/// # Errors
///
/// Returns [`ServeError`] when the origin is invalid, the address cannot be
/// bound, or the server fails.
pub async fn serve(config: &ServerConfig, state: AppState) -> Result<(), ServeError> {
    let app = router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.allowed_origin)?);

    let address = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| ServeError::Bind {
            address: address.clone(),
            source,
        })?;

    info!(%address, "EOS API listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("EOS API stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
