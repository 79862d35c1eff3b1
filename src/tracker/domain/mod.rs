//! Domain model for the issue and todo lifecycles.
//!
//! Lifecycle rules take the current instant as an argument so they stay
//! deterministic; callers obtain it from an injected clock.

mod error;
mod ids;
mod issue;
mod todo;
pub mod validation;
mod view;

pub use error::{FieldViolation, ParseLifecycleValueError, ValidationError};
pub use ids::{IssueId, TodoId};
pub use issue::{Issue, IssuePatch, IssuePriority, IssueStatus, IssueType, PersistedIssueData};
pub use todo::{PersistedTodoData, Todo, TodoPatch, TodoStatus, effective_status};
pub use validation::{SYSTEM_ACTOR, Violations, WireValue};
pub use view::{IssueSummary, TodoView};
