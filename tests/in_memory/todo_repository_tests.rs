//! Todo repository contract against the in-memory adapter.

use super::helpers::{epoch, todo_due, todo_repo};
use chrono::Duration;
use eos::tracker::{
    adapters::memory::InMemoryTodoRepository,
    domain::{IssueId, TodoStatus},
    ports::{PageRequest, TodoFilter, TodoRepository, TrackerRepositoryError},
};
use eyre::{Result, WrapErr};
use rstest::rstest;

#[rstest]
#[tokio::test]
async fn storing_twice_is_a_duplicate(todo_repo: InMemoryTodoRepository) -> Result<()> {
    let todo = todo_due(IssueId::new(), "bo", Duration::days(1))?;
    todo_repo.store(&todo).await.wrap_err("store todo")?;

    let result = todo_repo.store(&todo).await;
    assert!(matches!(result, Err(TrackerRepositoryError::DuplicateTodo(id)) if id == todo.id()));
    Ok(())
}

#[rstest]
#[tokio::test]
async fn missing_todo_cannot_be_updated_or_deleted(todo_repo: InMemoryTodoRepository) -> Result<()> {
    let todo = todo_due(IssueId::new(), "bo", Duration::days(1))?;

    assert!(matches!(
        todo_repo.update(&todo).await,
        Err(TrackerRepositoryError::TodoNotFound(_))
    ));
    assert!(matches!(
        todo_repo.delete(todo.id()).await,
        Err(TrackerRepositoryError::TodoNotFound(_))
    ));
    Ok(())
}

#[rstest]
#[tokio::test]
async fn cascade_removes_only_the_issues_todos(todo_repo: InMemoryTodoRepository) -> Result<()> {
    let doomed = IssueId::new();
    let kept = IssueId::new();
    for issue_id in [doomed, doomed, kept] {
        let todo = todo_due(issue_id, "bo", Duration::days(1))?;
        todo_repo.store(&todo).await.wrap_err("store todo")?;
    }

    let removed = todo_repo
        .delete_by_originating_issue(doomed)
        .await
        .wrap_err("cascade delete")?;
    let again = todo_repo
        .delete_by_originating_issue(doomed)
        .await
        .wrap_err("repeat cascade delete")?;

    assert_eq!((removed, again), (2, 0));
    assert_eq!(todo_repo.len()?, 1);
    Ok(())
}

#[rstest]
#[case::before_due(Duration::hours(1), TodoStatus::Pending)]
#[case::after_due(Duration::hours(3), TodoStatus::Late)]
#[tokio::test]
async fn status_filter_uses_the_evaluation_instant(
    todo_repo: InMemoryTodoRepository,
    #[case] elapsed: Duration,
    #[case] expected: TodoStatus,
) -> Result<()> {
    let todo = todo_due(IssueId::new(), "bo", Duration::hours(2))?;
    todo_repo.store(&todo).await.wrap_err("store todo")?;

    let mut filter = TodoFilter::new(epoch() + elapsed);
    filter.status = Some(expected);
    let page = todo_repo
        .find_page(&filter, PageRequest::default())
        .await
        .wrap_err("find page")?;

    assert_eq!(page.total(), 1, "todo should match {expected}");
    Ok(())
}

#[rstest]
#[tokio::test]
async fn assignee_filter_and_due_date_order(todo_repo: InMemoryTodoRepository) -> Result<()> {
    let issue_id = IssueId::new();
    for (assignee, days) in [("bo", 3), ("cy", 1), ("bo", 1), ("bo", 2)] {
        let todo = todo_due(issue_id, assignee, Duration::days(days))?;
        todo_repo.store(&todo).await.wrap_err("store todo")?;
    }

    let mut filter = TodoFilter::new(epoch());
    filter.assigned_to = Some("bo".to_owned());
    let page = todo_repo
        .find_page(&filter, PageRequest::default())
        .await
        .wrap_err("find page")?;

    let due: Vec<_> = page.items().iter().map(|todo| todo.due_date()).collect();
    assert_eq!(
        due,
        [1, 2, 3].map(|days| epoch() + Duration::days(days)).to_vec()
    );
    Ok(())
}
