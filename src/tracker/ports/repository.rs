//! Repository ports for issue and todo persistence.

use super::query::{IssueFilter, Page, PageRequest, TodoFilter};
use crate::tracker::domain::{Issue, IssueId, Todo, TodoId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for tracker repository operations.
pub type TrackerRepositoryResult<T> = Result<T, TrackerRepositoryError>;

/// Issue persistence contract.
#[async_trait]
pub trait IssueRepository: Send + Sync {
    /// Stores a new issue.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerRepositoryError::DuplicateIssue`] when the identifier
    /// already exists.
    async fn store(&self, issue: &Issue) -> TrackerRepositoryResult<()>;

    /// Persists changes to an existing issue.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerRepositoryError::IssueNotFound`] when the issue does
    /// not exist.
    async fn update(&self, issue: &Issue) -> TrackerRepositoryResult<()>;

    /// Finds an issue by identifier.
    ///
    /// Returns `None` when the issue does not exist.
    async fn find_by_id(&self, id: IssueId) -> TrackerRepositoryResult<Option<Issue>>;

    /// Returns the issues among `ids` that exist, in no particular order.
    async fn find_by_ids(&self, ids: &[IssueId]) -> TrackerRepositoryResult<Vec<Issue>>;

    /// Deletes an issue. Dependent todos are not touched.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerRepositoryError::IssueNotFound`] when the issue does
    /// not exist.
    async fn delete(&self, id: IssueId) -> TrackerRepositoryResult<()>;

    /// Returns one page of issues matching `filter`, newest first.
    async fn find_page(
        &self,
        filter: &IssueFilter,
        page: PageRequest,
    ) -> TrackerRepositoryResult<Page<Issue>>;
}

/// Todo persistence contract.
#[async_trait]
pub trait TodoRepository: Send + Sync {
    /// Stores a new todo.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerRepositoryError::DuplicateTodo`] when the identifier
    /// already exists.
    async fn store(&self, todo: &Todo) -> TrackerRepositoryResult<()>;

    /// Persists changes to an existing todo.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerRepositoryError::TodoNotFound`] when the todo does
    /// not exist.
    async fn update(&self, todo: &Todo) -> TrackerRepositoryResult<()>;

    /// Finds a todo by identifier.
    ///
    /// Returns `None` when the todo does not exist.
    async fn find_by_id(&self, id: TodoId) -> TrackerRepositoryResult<Option<Todo>>;

    /// Deletes a todo.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerRepositoryError::TodoNotFound`] when the todo does
    /// not exist.
    async fn delete(&self, id: TodoId) -> TrackerRepositoryResult<()>;

    /// Deletes every todo referencing `issue_id` and returns how many were
    /// removed. Zero matches is not an error.
    async fn delete_by_originating_issue(&self, issue_id: IssueId) -> TrackerRepositoryResult<u64>;

    /// Returns one page of todos matching `filter`, earliest due date first
    /// and newest first among equal due dates.
    async fn find_page(
        &self,
        filter: &TodoFilter,
        page: PageRequest,
    ) -> TrackerRepositoryResult<Page<Todo>>;
}

/// Errors returned by tracker repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TrackerRepositoryError {
    /// An issue with the same identifier already exists.
    #[error("duplicate issue identifier: {0}")]
    DuplicateIssue(IssueId),

    /// A todo with the same identifier already exists.
    #[error("duplicate todo identifier: {0}")]
    DuplicateTodo(TodoId),

    /// The issue was not found.
    #[error("issue not found: {0}")]
    IssueNotFound(IssueId),

    /// The todo was not found.
    #[error("todo not found: {0}")]
    TodoNotFound(TodoId),

    /// Persisted data could not be reconstructed into domain types.
    #[error("invalid persisted data: {0}")]
    InvalidPersistedData(Arc<dyn std::error::Error + Send + Sync>),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TrackerRepositoryError {
    /// Wraps persisted-data decoding failures.
    pub fn invalid_persisted_data(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::InvalidPersistedData(Arc::new(err))
    }

    /// Wraps a persistence-layer failure.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
