//! Runs the EOS issue and todo tracking API.
//!
//! Usage:
//!
//! ```text
//! eos [--config <path>]
//! ```
//!
//! Without `--config`, settings are read from `eos.toml` in the working
//! directory when present. `EOS_*` environment variables override file
//! values, for example:
//!
//! ```text
//! EOS_SERVER_PORT=8080 \
//! EOS_STORAGE_BACKEND=postgres \
//! EOS_STORAGE_DATABASE_URL=postgres://eos@localhost/eos \
//! eos
//! ```

use clap::Parser;
use eos::{
    api::{AppState, ServeError, serve},
    config::{ConfigError, EosConfig, StorageTarget, load_config},
    telemetry::{TelemetryError, init_tracing},
    tracker::{
        adapters::{
            memory::{InMemoryIssueRepository, InMemoryTodoRepository},
            postgres::{PostgresIssueRepository, PostgresTodoRepository, connect, ensure_schema},
        },
        ports::{IssueRepository, TodoRepository, TrackerRepositoryError},
        services::{DynTrackerService, TrackerService},
    },
};
use mockable::DefaultClock;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Command-line arguments.
#[derive(Debug, Parser)]
#[command(name = "eos", version, about = "Issue and todo tracking API")]
struct Cli {
    /// Configuration file to read instead of `eos.toml`.
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,
}

#[derive(Debug, Error)]
enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),
    #[error("failed to prepare storage: {0}")]
    Storage(#[from] TrackerRepositoryError),
    #[error(transparent)]
    Serve(#[from] ServeError),
}

#[tokio::main]
async fn main() -> Result<(), StartupError> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    init_tracing(&config.log)?;

    let tracker = build_tracker(&config).await?;
    serve(&config.server, AppState::new(tracker)).await?;
    Ok(())
}

async fn build_tracker(config: &EosConfig) -> Result<DynTrackerService, StartupError> {
    let (issues, todos): (Arc<dyn IssueRepository>, Arc<dyn TodoRepository>) =
        match config.storage.target()? {
            StorageTarget::Memory => {
                info!("using in-memory storage");
                (
                    Arc::new(InMemoryIssueRepository::new()),
                    Arc::new(InMemoryTodoRepository::new()),
                )
            }
            StorageTarget::Postgres { database_url } => {
                let pool = connect(database_url, config.storage.max_connections)?;
                ensure_schema(&pool).await?;
                info!(
                    max_connections = config.storage.max_connections,
                    "using PostgreSQL storage"
                );
                (
                    Arc::new(PostgresIssueRepository::new(pool.clone())),
                    Arc::new(PostgresTodoRepository::new(pool)),
                )
            }
        };

    Ok(TrackerService::new(issues, todos, Arc::new(DefaultClock)).with_page_limits(
        config.pagination.default_limit,
        config.pagination.max_limit,
    ))
}
