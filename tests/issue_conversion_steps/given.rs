//! Given steps for issue conversion BDD scenarios.

use super::world::{ConversionWorld, run_async};
use super::when::due_in_days;
use eos::tracker::{domain::IssuePatch, services::ConvertIssueRequest};
use eyre::WrapErr;
use rstest_bdd_macros::given;

#[given(r#"an open issue titled "{title}" with priority "{priority}""#)]
fn open_issue(
    world: &mut ConversionWorld,
    title: String,
    priority: String,
) -> Result<(), eyre::Report> {
    let issue = run_async(
        world
            .service
            .create_issue(IssuePatch::new().with_title(title).with_priority(priority)),
    )
    .wrap_err("create issue for scenario")?;
    world.issue_id = Some(issue.id());
    Ok(())
}

#[given(r#"the issue has been converted for "{assignee}" due in {days:i64} days"#)]
fn issue_already_converted(
    world: &mut ConversionWorld,
    assignee: String,
    days: i64,
) -> Result<(), eyre::Report> {
    let issue_id = world.issue_id()?;
    let view = run_async(
        world
            .service
            .convert_issue_to_todo(issue_id, ConvertIssueRequest::new(assignee, due_in_days(days))),
    )
    .wrap_err("convert issue for scenario")?;
    world.todo_id = Some(view.todo().id());
    Ok(())
}
