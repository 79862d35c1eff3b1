//! Then steps for issue conversion BDD scenarios.

use super::world::{ConversionWorld, run_async};
use eos::tracker::{
    domain::{IssueStatus, TodoStatus},
    services::TrackerError,
};
use rstest_bdd_macros::then;

#[then(r#"a pending todo titled "{title}" is assigned to "{assignee}""#)]
fn pending_todo_created(
    world: &ConversionWorld,
    title: String,
    assignee: String,
) -> Result<(), eyre::Report> {
    let view = world
        .last_conversion
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing conversion result in scenario world"))?
        .as_ref()
        .map_err(|err| eyre::eyre!("unexpected conversion failure: {err}"))?;
    let todo = view.todo();

    if todo.status() != TodoStatus::Pending {
        return Err(eyre::eyre!("expected pending todo, found {}", todo.status()));
    }
    if todo.title() != title || todo.assigned_to() != assignee {
        return Err(eyre::eyre!(
            "unexpected todo {:?} assigned to {:?}",
            todo.title(),
            todo.assigned_to()
        ));
    }
    if view.originating_issue().map(|summary| summary.id()) != world.issue_id {
        return Err(eyre::eyre!("todo does not reference the converted issue"));
    }
    Ok(())
}

#[then("the issue is resolved")]
fn issue_resolved(world: &mut ConversionWorld) -> Result<(), eyre::Report> {
    let issue = run_async(world.service.get_issue(world.issue_id()?))
        .map_err(|err| eyre::eyre!("issue lookup failed: {err}"))?;
    if issue.status() != IssueStatus::Resolved || issue.resolved_at().is_none() {
        return Err(eyre::eyre!("expected a resolved issue, found {}", issue.status()));
    }
    Ok(())
}

#[then(r#"the conversion is rejected for field "{field}""#)]
fn conversion_rejected(world: &ConversionWorld, field: String) -> Result<(), eyre::Report> {
    let result = world
        .last_conversion
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing conversion result in scenario world"))?;
    match result {
        Err(TrackerError::Validation(err)) if err.has_field(&field) => Ok(()),
        other => Err(eyre::eyre!("expected a {field} violation, got {other:?}")),
    }
}

#[then("the issue is still open")]
fn issue_still_open(world: &mut ConversionWorld) -> Result<(), eyre::Report> {
    let issue = run_async(world.service.get_issue(world.issue_id()?))
        .map_err(|err| eyre::eyre!("issue lookup failed: {err}"))?;
    if issue.status() != IssueStatus::Open {
        return Err(eyre::eyre!("expected an open issue, found {}", issue.status()));
    }
    Ok(())
}

#[then("the todo no longer exists")]
fn todo_removed(world: &mut ConversionWorld) -> Result<(), eyre::Report> {
    let todo_id = world
        .todo_id
        .ok_or_else(|| eyre::eyre!("missing todo in scenario world"))?;
    match run_async(world.service.get_todo(todo_id)) {
        Err(TrackerError::TodoNotFound(_)) => Ok(()),
        other => Err(eyre::eyre!("expected the todo to be gone, got {other:?}")),
    }
}
