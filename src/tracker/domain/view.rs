//! Read models pairing a todo with a summary of its originating issue.

use super::{Issue, IssueId, IssuePriority, IssueType, Todo};
use serde::Serialize;

/// Summary of the issue a todo originated from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueSummary {
    id: IssueId,
    title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(rename = "type")]
    issue_type: IssueType,
    priority: IssuePriority,
}

impl IssueSummary {
    /// Summary used in todo listings: title, type and priority.
    #[must_use]
    pub fn brief(issue: &Issue) -> Self {
        Self {
            id: issue.id(),
            title: issue.title().to_owned(),
            description: None,
            issue_type: issue.issue_type(),
            priority: issue.priority(),
        }
    }

    /// Summary used for single-todo reads, which also carries the
    /// description.
    #[must_use]
    pub fn detailed(issue: &Issue) -> Self {
        Self {
            description: issue.description().map(ToOwned::to_owned),
            ..Self::brief(issue)
        }
    }

    /// Returns the issue identifier.
    #[must_use]
    pub const fn id(&self) -> IssueId {
        self.id
    }

    /// Returns the issue title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the issue description, when included.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the issue type.
    #[must_use]
    pub const fn issue_type(&self) -> IssueType {
        self.issue_type
    }

    /// Returns the issue priority.
    #[must_use]
    pub const fn priority(&self) -> IssuePriority {
        self.priority
    }
}

/// A todo together with its resolved originating issue.
///
/// `originating_issue` is `None` when the referenced issue no longer exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoView {
    todo: Todo,
    originating_issue: Option<IssueSummary>,
}

impl TodoView {
    /// Pairs a todo with an optional issue summary.
    #[must_use]
    pub const fn new(todo: Todo, originating_issue: Option<IssueSummary>) -> Self {
        Self {
            todo,
            originating_issue,
        }
    }

    /// Returns the todo.
    #[must_use]
    pub const fn todo(&self) -> &Todo {
        &self.todo
    }

    /// Returns the originating issue summary, if resolved.
    #[must_use]
    pub const fn originating_issue(&self) -> Option<&IssueSummary> {
        self.originating_issue.as_ref()
    }

    /// Splits the view into its parts.
    #[must_use]
    pub fn into_parts(self) -> (Todo, Option<IssueSummary>) {
        (self.todo, self.originating_issue)
    }
}
