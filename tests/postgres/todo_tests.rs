//! Todo persistence against `PostgreSQL`.

use super::helpers::{PgContext, epoch, prepare, todo};
use chrono::Duration;
use eos::tracker::{
    domain::{IssueId, TodoPatch, TodoStatus},
    ports::{PageRequest, TodoFilter, TodoRepository, TrackerRepositoryResult},
};
use eyre::{Result, WrapErr};
use pg_embedded_setup_unpriv::{TestCluster, test_support::shared_test_cluster};
use rstest::rstest;

fn count(ctx: &PgContext<'_>, status: TodoStatus) -> TrackerRepositoryResult<u64> {
    let mut filter = TodoFilter::new(epoch() + Duration::hours(2));
    filter.status = Some(status);
    ctx.runtime
        .block_on(ctx.todos.find_page(&filter, PageRequest::default()))
        .map(|page| page.total())
}

#[rstest]
fn lateness_is_evaluated_in_the_query(shared_test_cluster: &'static TestCluster) -> Result<()> {
    let ctx = prepare(shared_test_cluster)?;
    let overdue = todo(IssueId::new(), "bo", Duration::hours(1))?;
    let upcoming = todo(IssueId::new(), "bo", Duration::days(2))?;
    for item in [&overdue, &upcoming] {
        ctx.runtime
            .block_on(ctx.todos.store(item))
            .wrap_err("store todo")?;
    }

    for (status, expected) in [
        (TodoStatus::Late, 1),
        (TodoStatus::Pending, 1),
        (TodoStatus::Completed, 0),
    ] {
        let total = count(&ctx, status).wrap_err_with(|| format!("count {status} todos"))?;
        assert_eq!(total, expected, "unexpected {status} count");
    }
    Ok(())
}

#[rstest]
fn completed_todo_round_trips(shared_test_cluster: &'static TestCluster) -> Result<()> {
    let ctx = prepare(shared_test_cluster)?;
    let mut item = todo(IssueId::new(), "bo", Duration::days(1))?;
    ctx.runtime
        .block_on(ctx.todos.store(&item))
        .wrap_err("store todo")?;
    item.complete(epoch() + Duration::hours(3))?;
    ctx.runtime
        .block_on(ctx.todos.update(&item))
        .wrap_err("update todo")?;

    let found = ctx
        .runtime
        .block_on(ctx.todos.find_by_id(item.id()))
        .wrap_err("find todo")?;
    assert_eq!(found, Some(item));
    Ok(())
}

#[rstest]
fn cleared_description_is_stored_as_null(shared_test_cluster: &'static TestCluster) -> Result<()> {
    let ctx = prepare(shared_test_cluster)?;
    let mut item = todo(IssueId::new(), "bo", Duration::days(1))?;
    item.apply_patch(
        TodoPatch::new().with_description("Check the cron entry"),
        epoch(),
    )?;
    ctx.runtime
        .block_on(ctx.todos.store(&item))
        .wrap_err("store todo")?;
    item.apply_patch(
        TodoPatch::new().with_description(""),
        epoch() + Duration::minutes(5),
    )?;
    ctx.runtime
        .block_on(ctx.todos.update(&item))
        .wrap_err("update todo")?;

    let found = ctx
        .runtime
        .block_on(ctx.todos.find_by_id(item.id()))
        .wrap_err("find todo")?;
    assert_eq!(found.as_ref().and_then(|stored| stored.description()), None);
    assert_eq!(found, Some(item));
    Ok(())
}

#[rstest]
fn cascade_delete_counts_removed_rows(shared_test_cluster: &'static TestCluster) -> Result<()> {
    let ctx = prepare(shared_test_cluster)?;
    let issue_id = IssueId::new();
    for _ in 0..2 {
        let item = todo(issue_id, "bo", Duration::days(1))?;
        ctx.runtime
            .block_on(ctx.todos.store(&item))
            .wrap_err("store todo")?;
    }
    let unrelated = todo(IssueId::new(), "bo", Duration::days(1))?;
    ctx.runtime
        .block_on(ctx.todos.store(&unrelated))
        .wrap_err("store todo")?;

    let removed = ctx
        .runtime
        .block_on(ctx.todos.delete_by_originating_issue(issue_id))
        .wrap_err("cascade delete")?;
    assert_eq!(removed, 2);
    let survivor = ctx
        .runtime
        .block_on(ctx.todos.find_by_id(unrelated.id()))
        .wrap_err("find todo")?;
    assert_eq!(survivor, Some(unrelated));
    Ok(())
}
