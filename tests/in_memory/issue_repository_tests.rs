//! Issue repository contract against the in-memory adapter.

use super::helpers::{issue_at, issue_repo};
use eos::tracker::{
    adapters::memory::InMemoryIssueRepository,
    domain::{Issue, IssueId, IssuePatch, IssueType},
    ports::{IssueFilter, IssueRepository, Page, PageRequest, TrackerRepositoryError},
};
use eyre::{Result, WrapErr};
use rstest::rstest;

#[rstest]
#[tokio::test]
async fn stored_issue_round_trips(issue_repo: InMemoryIssueRepository) -> Result<()> {
    let issue = issue_at("Slow dashboard", "short", 0)?;
    issue_repo.store(&issue).await.wrap_err("store issue")?;

    let found = issue_repo.find_by_id(issue.id()).await.wrap_err("find issue")?;
    assert_eq!(found, Some(issue));
    Ok(())
}

#[rstest]
#[tokio::test]
async fn storing_twice_is_a_duplicate(issue_repo: InMemoryIssueRepository) -> Result<()> {
    let issue = issue_at("Slow dashboard", "short", 0)?;
    issue_repo.store(&issue).await.wrap_err("store issue")?;

    let result = issue_repo.store(&issue).await;
    assert!(matches!(result, Err(TrackerRepositoryError::DuplicateIssue(id)) if id == issue.id()));
    Ok(())
}

#[rstest]
#[tokio::test]
async fn update_and_delete_require_an_existing_issue(
    issue_repo: InMemoryIssueRepository,
) -> Result<()> {
    let issue = issue_at("Never stored", "short", 0)?;

    assert!(matches!(
        issue_repo.update(&issue).await,
        Err(TrackerRepositoryError::IssueNotFound(_))
    ));
    assert!(matches!(
        issue_repo.delete(issue.id()).await,
        Err(TrackerRepositoryError::IssueNotFound(_))
    ));
    Ok(())
}

#[rstest]
#[tokio::test]
async fn update_replaces_the_stored_issue(issue_repo: InMemoryIssueRepository) -> Result<()> {
    let mut issue = issue_at("Slow dashboard", "short", 0)?;
    issue_repo.store(&issue).await.wrap_err("store issue")?;

    issue.apply_patch(IssuePatch::new().with_priority("low"), issue.created_at())?;
    issue_repo.update(&issue).await.wrap_err("update issue")?;

    let found = issue_repo.find_by_id(issue.id()).await.wrap_err("find issue")?;
    assert_eq!(found, Some(issue));
    Ok(())
}

#[rstest]
#[tokio::test]
async fn find_by_ids_skips_unknown_ids(issue_repo: InMemoryIssueRepository) -> Result<()> {
    let first = issue_at("First", "short", 0)?;
    let second = issue_at("Second", "long", 1)?;
    for issue in [&first, &second] {
        issue_repo.store(issue).await.wrap_err("store issue")?;
    }

    let found = issue_repo
        .find_by_ids(&[second.id(), IssueId::new(), second.id()])
        .await
        .wrap_err("find issues")?;
    assert_eq!(found, vec![second]);
    Ok(())
}

#[rstest]
#[tokio::test]
async fn pages_filter_by_type_newest_first(issue_repo: InMemoryIssueRepository) -> Result<()> {
    for (minutes, issue_type) in [(0, "long"), (1, "short"), (2, "long"), (3, "long")] {
        let issue = issue_at(&format!("Issue at {minutes}"), issue_type, minutes)?;
        issue_repo.store(&issue).await.wrap_err("store issue")?;
    }
    let filter = IssueFilter {
        issue_type: Some(IssueType::Long),
        ..IssueFilter::default()
    };

    let first = issue_repo
        .find_page(&filter, PageRequest::new(1, 2, 100)?)
        .await
        .wrap_err("first page")?;
    let second = issue_repo
        .find_page(&filter, PageRequest::new(2, 2, 100)?)
        .await
        .wrap_err("second page")?;

    assert_eq!(titles(&first), ["Issue at 3", "Issue at 2"]);
    assert_eq!(titles(&second), ["Issue at 0"]);
    assert_eq!((first.total(), first.pages()), (3, 2));
    Ok(())
}

#[rstest]
#[tokio::test]
async fn page_past_the_end_is_empty(issue_repo: InMemoryIssueRepository) -> Result<()> {
    let issue = issue_at("Only one", "short", 0)?;
    issue_repo.store(&issue).await.wrap_err("store issue")?;

    let page = issue_repo
        .find_page(&IssueFilter::default(), PageRequest::new(5, 10, 100)?)
        .await
        .wrap_err("find page")?;
    assert!(page.items().is_empty());
    assert_eq!(page.total(), 1);
    Ok(())
}

fn titles(page: &Page<Issue>) -> Vec<&str> {
    page.items().iter().map(Issue::title).collect()
}
