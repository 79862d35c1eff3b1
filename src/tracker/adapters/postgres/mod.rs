//! `PostgreSQL` adapters for issue and todo persistence.

mod models;
mod repository;
mod schema;

pub use repository::{PostgresIssueRepository, PostgresTodoRepository, TrackerPgPool};

use crate::tracker::ports::{TrackerRepositoryError, TrackerRepositoryResult};
use diesel::connection::SimpleConnection;
use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool};

/// Schema applied by [`ensure_schema`].
pub const CREATE_TRACKER_SCHEMA_SQL: &str =
    include_str!("../../../../migrations/2026-10-01-000000_create_issues_and_todos/up.sql");

/// Builds a connection pool for `database_url`.
///
/// # Errors
///
/// Returns [`TrackerRepositoryError::Persistence`] when the pool cannot open
/// its initial connections.
pub fn connect(database_url: &str, max_connections: u32) -> TrackerRepositoryResult<TrackerPgPool> {
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    Pool::builder()
        .max_size(max_connections)
        .build(manager)
        .map_err(TrackerRepositoryError::persistence)
}

/// Creates the tracker tables and indexes when they do not exist yet.
///
/// # Errors
///
/// Returns [`TrackerRepositoryError::Persistence`] when a connection cannot
/// be obtained or the schema statements fail.
pub async fn ensure_schema(pool: &TrackerPgPool) -> TrackerRepositoryResult<()> {
    let shared_pool = pool.clone();
    tokio::task::spawn_blocking(move || {
        let mut connection = shared_pool.get().map_err(TrackerRepositoryError::persistence)?;
        connection
            .batch_execute(CREATE_TRACKER_SCHEMA_SQL)
            .map_err(TrackerRepositoryError::persistence)
    })
    .await
    .map_err(TrackerRepositoryError::persistence)?
}
