//! Shared world state for issue conversion BDD scenarios.

use std::sync::Arc;

use eos::tracker::{
    adapters::memory::{InMemoryIssueRepository, InMemoryTodoRepository},
    domain::{IssueId, TodoId, TodoView},
    services::{TrackerError, TrackerService},
};
use mockable::DefaultClock;
use rstest::fixture;

/// Service type used by the BDD world.
pub type TestTrackerService =
    TrackerService<InMemoryIssueRepository, InMemoryTodoRepository, DefaultClock>;

/// Scenario world for issue conversion behaviour tests.
pub struct ConversionWorld {
    pub service: TestTrackerService,
    pub issue_id: Option<IssueId>,
    pub todo_id: Option<TodoId>,
    pub last_conversion: Option<Result<TodoView, TrackerError>>,
}

impl ConversionWorld {
    /// Creates a world with empty repositories.
    #[must_use]
    pub fn new() -> Self {
        let service = TrackerService::new(
            Arc::new(InMemoryIssueRepository::new()),
            Arc::new(InMemoryTodoRepository::new()),
            Arc::new(DefaultClock),
        );
        Self {
            service,
            issue_id: None,
            todo_id: None,
            last_conversion: None,
        }
    }

    /// Returns the issue created by a Given step.
    ///
    /// # Errors
    ///
    /// Returns an error when no issue has been created yet.
    pub fn issue_id(&self) -> Result<IssueId, eyre::Report> {
        self.issue_id
            .ok_or_else(|| eyre::eyre!("missing issue in scenario world"))
    }
}

impl Default for ConversionWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> ConversionWorld {
    ConversionWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
