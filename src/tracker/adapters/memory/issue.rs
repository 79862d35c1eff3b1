//! In-memory issue repository.

use super::{lock_poisoned, paginate};
use crate::tracker::{
    domain::{Issue, IssueId},
    ports::{
        IssueFilter, IssueRepository, Page, PageRequest, TrackerRepositoryError,
        TrackerRepositoryResult,
    },
};
use async_trait::async_trait;
use std::cmp::Reverse;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Thread-safe in-memory issue repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryIssueRepository {
    issues: Arc<RwLock<HashMap<IssueId, Issue>>>,
}

impl InMemoryIssueRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored issues.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerRepositoryError::Persistence`] when the lock is
    /// poisoned.
    pub fn len(&self) -> TrackerRepositoryResult<usize> {
        Ok(self.issues.read().map_err(lock_poisoned)?.len())
    }

    /// Returns `true` when no issues are stored.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerRepositoryError::Persistence`] when the lock is
    /// poisoned.
    pub fn is_empty(&self) -> TrackerRepositoryResult<bool> {
        Ok(self.len()? == 0)
    }
}

#[async_trait]
impl IssueRepository for InMemoryIssueRepository {
    async fn store(&self, issue: &Issue) -> TrackerRepositoryResult<()> {
        let mut issues = self.issues.write().map_err(lock_poisoned)?;
        if issues.contains_key(&issue.id()) {
            return Err(TrackerRepositoryError::DuplicateIssue(issue.id()));
        }
        issues.insert(issue.id(), issue.clone());
        Ok(())
    }

    async fn update(&self, issue: &Issue) -> TrackerRepositoryResult<()> {
        let mut issues = self.issues.write().map_err(lock_poisoned)?;
        let stored = issues
            .get_mut(&issue.id())
            .ok_or(TrackerRepositoryError::IssueNotFound(issue.id()))?;
        stored.clone_from(issue);
        Ok(())
    }

    async fn find_by_id(&self, id: IssueId) -> TrackerRepositoryResult<Option<Issue>> {
        let issues = self.issues.read().map_err(lock_poisoned)?;
        Ok(issues.get(&id).cloned())
    }

    async fn find_by_ids(&self, ids: &[IssueId]) -> TrackerRepositoryResult<Vec<Issue>> {
        let issues = self.issues.read().map_err(lock_poisoned)?;
        let mut found: Vec<Issue> = ids.iter().filter_map(|id| issues.get(id).cloned()).collect();
        found.sort_by_key(Issue::id);
        found.dedup_by_key(|issue| issue.id());
        Ok(found)
    }

    async fn delete(&self, id: IssueId) -> TrackerRepositoryResult<()> {
        let mut issues = self.issues.write().map_err(lock_poisoned)?;
        issues
            .remove(&id)
            .map(|_| ())
            .ok_or(TrackerRepositoryError::IssueNotFound(id))
    }

    async fn find_page(
        &self,
        filter: &IssueFilter,
        page: PageRequest,
    ) -> TrackerRepositoryResult<Page<Issue>> {
        let issues = self.issues.read().map_err(lock_poisoned)?;
        let mut matching: Vec<Issue> = issues
            .values()
            .filter(|issue| filter.matches(issue))
            .cloned()
            .collect();
        matching.sort_by_key(|issue| (Reverse(issue.created_at()), issue.id()));
        Ok(paginate(matching, page))
    }
}
