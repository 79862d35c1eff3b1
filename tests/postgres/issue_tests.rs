//! Issue persistence against `PostgreSQL`.

use super::helpers::{epoch, issue, prepare, todo};
use chrono::Duration;
use eos::tracker::{
    domain::{Issue, IssueId, IssuePatch},
    ports::{IssueRepository, TodoRepository, TrackerRepositoryError},
};
use eyre::{Result, WrapErr};
use pg_embedded_setup_unpriv::{TestCluster, test_support::shared_test_cluster};
use rstest::rstest;

#[rstest]
fn issue_round_trips_with_lifecycle_fields(
    shared_test_cluster: &'static TestCluster,
) -> Result<()> {
    let ctx = prepare(shared_test_cluster)?;
    let mut stored = issue("Fix login bug")?;
    ctx.runtime
        .block_on(ctx.issues.store(&stored))
        .wrap_err("store issue")?;

    stored.apply_patch(
        IssuePatch::new().with_status("resolved").with_type("long"),
        epoch() + Duration::hours(1),
    )?;
    ctx.runtime
        .block_on(ctx.issues.update(&stored))
        .wrap_err("update issue")?;

    let found = ctx
        .runtime
        .block_on(ctx.issues.find_by_id(stored.id()))
        .wrap_err("find issue")?;
    assert_eq!(found, Some(stored));
    Ok(())
}

#[rstest]
fn duplicate_and_missing_issues_are_reported(
    shared_test_cluster: &'static TestCluster,
) -> Result<()> {
    let ctx = prepare(shared_test_cluster)?;
    let stored = issue("Duplicate me")?;
    ctx.runtime
        .block_on(ctx.issues.store(&stored))
        .wrap_err("store issue")?;

    assert!(matches!(
        ctx.runtime.block_on(ctx.issues.store(&stored)),
        Err(TrackerRepositoryError::DuplicateIssue(_))
    ));

    let missing = issue("Never stored")?;
    assert!(matches!(
        ctx.runtime.block_on(ctx.issues.update(&missing)),
        Err(TrackerRepositoryError::IssueNotFound(_))
    ));
    assert!(matches!(
        ctx.runtime.block_on(ctx.issues.delete(missing.id())),
        Err(TrackerRepositoryError::IssueNotFound(_))
    ));
    Ok(())
}

#[rstest]
fn find_by_ids_returns_only_known_issues(shared_test_cluster: &'static TestCluster) -> Result<()> {
    let ctx = prepare(shared_test_cluster)?;
    let stored = issue("Batch lookup")?;
    ctx.runtime
        .block_on(ctx.issues.store(&stored))
        .wrap_err("store issue")?;

    let found = ctx
        .runtime
        .block_on(ctx.issues.find_by_ids(&[stored.id(), issue("Ghost")?.id()]))
        .wrap_err("find issues")?;
    assert_eq!(found, vec![stored]);
    Ok(())
}

#[rstest]
fn actor_names_have_no_length_ceiling(shared_test_cluster: &'static TestCluster) -> Result<()> {
    let ctx = prepare(shared_test_cluster)?;
    let long_name = "a".repeat(300);
    let reporter = Issue::create(
        IssuePatch::new()
            .with_title("Long reporter")
            .with_created_by(long_name.as_str()),
        epoch(),
    )?;
    ctx.runtime
        .block_on(ctx.issues.store(&reporter))
        .wrap_err("store issue")?;
    let assigned = todo(IssueId::new(), &long_name, Duration::days(1))?;
    ctx.runtime
        .block_on(ctx.todos.store(&assigned))
        .wrap_err("store todo")?;

    let found_issue = ctx
        .runtime
        .block_on(ctx.issues.find_by_id(reporter.id()))
        .wrap_err("find issue")?;
    let found_todo = ctx
        .runtime
        .block_on(ctx.todos.find_by_id(assigned.id()))
        .wrap_err("find todo")?;
    assert_eq!(
        found_issue.as_ref().map(Issue::created_by),
        Some(long_name.as_str())
    );
    assert_eq!(found_todo, Some(assigned));
    Ok(())
}
