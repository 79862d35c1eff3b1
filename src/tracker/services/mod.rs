//! Application services for issue and todo lifecycle orchestration.

mod error;
mod lifecycle;
mod requests;

pub use error::{TrackerError, TrackerResult};
pub use lifecycle::{DynTrackerService, TrackerService};
pub use requests::{ConvertIssueRequest, IssueListQuery, TodoListQuery};
