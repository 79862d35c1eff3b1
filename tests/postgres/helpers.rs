//! Shared helpers for `PostgreSQL` integration tests.

use chrono::{DateTime, Duration, TimeZone, Utc};
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use eos::tracker::{
    adapters::postgres::{
        CREATE_TRACKER_SCHEMA_SQL, PostgresIssueRepository, PostgresTodoRepository, connect,
    },
    domain::{Issue, IssueId, IssuePatch, Todo, TodoPatch, ValidationError},
};
use eyre::{Result, WrapErr, eyre};
use pg_embedded_setup_unpriv::TestCluster;
use tokio::runtime::Runtime;

/// Template database holding the migrated tracker schema.
pub const TEMPLATE_DB: &str = "eos_test_template";

/// Repositories bound to one throwaway database.
///
/// The database is dropped when the context goes out of scope. Fields drop
/// in order, so the pools close before the database is removed.
pub struct PgContext<'a> {
    /// Issue repository.
    pub issues: PostgresIssueRepository,
    /// Todo repository.
    pub todos: PostgresTodoRepository,
    /// Runtime driving the async repository calls.
    pub runtime: Runtime,
    _guard: CleanupGuard<'a>,
}

struct CleanupGuard<'a> {
    cluster: &'a TestCluster,
    db_name: String,
}

impl Drop for CleanupGuard<'_> {
    fn drop(&mut self) {
        if let Err(err) = self.cluster.drop_database(self.db_name.as_str()) {
            tracing::warn!(db = %self.db_name, error = %err, "failed to drop test database");
        }
    }
}

fn ensure_template(cluster: &TestCluster) -> Result<()> {
    cluster
        .ensure_template_exists(TEMPLATE_DB, |db_name| {
            let url = cluster.connection().database_url(db_name);
            let mut conn = PgConnection::establish(&url).map_err(|err| eyre!("{err}"))?;
            conn.batch_execute(CREATE_TRACKER_SCHEMA_SQL)
                .map_err(|err| eyre!("apply tracker schema: {err}"))?;
            Ok(())
        })
        .map_err(|err| eyre!("template setup: {err}"))
}

/// Creates a database from the migrated template and binds repositories
/// to it.
///
/// # Errors
///
/// Returns an error if the template, the database, the pool or the runtime
/// cannot be created.
pub fn prepare(cluster: &TestCluster) -> Result<PgContext<'_>> {
    ensure_template(cluster)?;
    let db_name = format!("eos_test_{}", uuid::Uuid::new_v4().simple());
    cluster
        .create_database_from_template(db_name.as_str(), TEMPLATE_DB)
        .map_err(|err| eyre!("create {db_name}: {err}"))?;
    let guard = CleanupGuard { cluster, db_name };

    let url = cluster.connection().database_url(&guard.db_name);
    let pool = connect(&url, 1).wrap_err("connect to test database")?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("build test runtime")?;
    Ok(PgContext {
        issues: PostgresIssueRepository::new(pool.clone()),
        todos: PostgresTodoRepository::new(pool),
        runtime,
        _guard: guard,
    })
}

/// Whole-second instant, so values survive the microsecond column
/// precision unchanged.
#[must_use]
pub fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 5, 1, 12, 0, 0)
        .single()
        .expect("valid timestamp")
}

/// Builds a valid issue.
///
/// # Errors
///
/// Returns an error if the patch fails validation.
pub fn issue(title: &str) -> Result<Issue, ValidationError> {
    Issue::create(
        IssuePatch::new()
            .with_title(title)
            .with_description("Seen on staging")
            .with_created_by("ana"),
        epoch(),
    )
}

/// Builds a valid todo assigned to `assignee`, due `due_in` after [`epoch`].
///
/// # Errors
///
/// Returns an error if the patch fails validation.
pub fn todo(issue_id: IssueId, assignee: &str, due_in: Duration) -> Result<Todo, ValidationError> {
    Todo::create(
        TodoPatch::new()
            .with_title("Follow up")
            .with_assigned_to(assignee)
            .with_assigned_by("ana")
            .with_due_at(epoch() + due_in)
            .with_originating_issue(issue_id),
        epoch(),
    )
}
