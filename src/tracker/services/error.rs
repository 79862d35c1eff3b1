//! Service-level errors for tracker operations.

use crate::tracker::{
    domain::{IssueId, Todo, TodoId, ValidationError},
    ports::TrackerRepositoryError,
};
use thiserror::Error;

/// Errors returned by [`super::TrackerService`].
#[derive(Debug, Error)]
pub enum TrackerError {
    /// One or more fields violate their constraints.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The referenced issue does not exist.
    #[error("issue not found: {0}")]
    IssueNotFound(IssueId),

    /// The referenced todo does not exist.
    #[error("todo not found: {0}")]
    TodoNotFound(TodoId),

    /// The backing store failed.
    #[error(transparent)]
    Persistence(TrackerRepositoryError),

    /// Conversion stored the todo but could not resolve the issue. The todo
    /// is kept.
    #[error("todo {} was created but issue {issue_id} could not be resolved: {source}", .todo.id())]
    PartialWorkflow {
        /// The todo that was stored.
        todo: Box<Todo>,
        /// The issue that is still unresolved.
        issue_id: IssueId,
        /// Why the issue update failed.
        source: TrackerRepositoryError,
    },
}

impl From<TrackerRepositoryError> for TrackerError {
    fn from(err: TrackerRepositoryError) -> Self {
        match err {
            TrackerRepositoryError::IssueNotFound(id) => Self::IssueNotFound(id),
            TrackerRepositoryError::TodoNotFound(id) => Self::TodoNotFound(id),
            other => Self::Persistence(other),
        }
    }
}

/// Result type for tracker service operations.
pub type TrackerResult<T> = Result<T, TrackerError>;
