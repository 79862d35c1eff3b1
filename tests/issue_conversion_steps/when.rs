//! When steps for issue conversion BDD scenarios.

use super::world::{ConversionWorld, run_async};
use chrono::{Duration, Utc};
use eos::tracker::services::ConvertIssueRequest;
use eyre::WrapErr;
use rstest_bdd_macros::when;

/// Formats a due date `days` from now.
pub fn due_in_days(days: i64) -> String {
    (Utc::now() + Duration::days(days)).to_rfc3339()
}

#[when(r#"the issue is converted for "{assignee}" due in {days:i64} days"#)]
fn convert_with_due_date(
    world: &mut ConversionWorld,
    assignee: String,
    days: i64,
) -> Result<(), eyre::Report> {
    let issue_id = world.issue_id()?;
    let result = run_async(
        world
            .service
            .convert_issue_to_todo(issue_id, ConvertIssueRequest::new(assignee, due_in_days(days))),
    );
    if let Ok(view) = &result {
        world.todo_id = Some(view.todo().id());
    }
    world.last_conversion = Some(result);
    Ok(())
}

#[when(r#"the issue is converted for "{assignee}" without a due date"#)]
fn convert_without_due_date(
    world: &mut ConversionWorld,
    assignee: String,
) -> Result<(), eyre::Report> {
    let issue_id = world.issue_id()?;
    let request: ConvertIssueRequest =
        serde_json::from_value(serde_json::json!({ "assignedTo": assignee }))
            .wrap_err("build conversion request")?;
    world.last_conversion = Some(run_async(
        world.service.convert_issue_to_todo(issue_id, request),
    ));
    Ok(())
}

#[when("the issue is deleted")]
fn delete_issue(world: &mut ConversionWorld) -> Result<(), eyre::Report> {
    let issue_id = world.issue_id()?;
    run_async(world.service.delete_issue(issue_id)).wrap_err("delete issue")?;
    Ok(())
}
