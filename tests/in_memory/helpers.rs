//! Shared fixtures for in-memory repository integration tests.

use chrono::{DateTime, Duration, TimeZone, Utc};
use eos::tracker::{
    adapters::memory::{InMemoryIssueRepository, InMemoryTodoRepository},
    domain::{Issue, IssueId, IssuePatch, Todo, TodoPatch, ValidationError},
};
use rstest::fixture;

/// Instant the records in these tests are created around.
#[must_use]
pub fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 4, 1, 8, 0, 0)
        .single()
        .expect("valid timestamp")
}

/// Provides an empty issue repository.
#[fixture]
pub fn issue_repo() -> InMemoryIssueRepository {
    InMemoryIssueRepository::new()
}

/// Provides an empty todo repository.
#[fixture]
pub fn todo_repo() -> InMemoryTodoRepository {
    InMemoryTodoRepository::new()
}

/// Builds a valid issue created `minutes` after [`epoch`].
///
/// # Errors
///
/// Returns an error if the patch fails validation.
pub fn issue_at(
    title: &str,
    issue_type: &str,
    minutes: i64,
) -> Result<Issue, ValidationError> {
    Issue::create(
        IssuePatch::new()
            .with_title(title)
            .with_type(issue_type)
            .with_created_by("ana"),
        epoch() + Duration::minutes(minutes),
    )
}

/// Builds a valid todo for `issue_id`, assigned to `assignee`, due `due_in`
/// after [`epoch`].
///
/// # Errors
///
/// Returns an error if the patch fails validation.
pub fn todo_due(
    issue_id: IssueId,
    assignee: &str,
    due_in: Duration,
) -> Result<Todo, ValidationError> {
    Todo::create(
        TodoPatch::new()
            .with_title(format!("Follow up for {assignee}"))
            .with_assigned_to(assignee)
            .with_assigned_by("ana")
            .with_due_at(epoch() + due_in)
            .with_originating_issue(issue_id),
        epoch(),
    )
}
