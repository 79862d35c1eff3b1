//! Request payloads accepted by [`super::TrackerService`].

use crate::tracker::{
    domain::{Issue, SYSTEM_ACTOR, TodoPatch, ValidationError, Violations, validation::normalize_text},
    ports::{IssueFilter, PageRequest, TodoFilter},
};
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Overrides supplied when converting an issue into a todo.
///
/// Title and description fall back to the issue's own values when absent
/// or blank; `assignedBy` falls back to `system`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvertIssueRequest {
    assigned_to: Option<String>,
    assigned_by: Option<String>,
    due_date: Option<String>,
    title: Option<String>,
    description: Option<String>,
}

impl ConvertIssueRequest {
    /// Creates a request with the assignee and due date.
    #[must_use]
    pub fn new(assigned_to: impl Into<String>, due_date: impl Into<String>) -> Self {
        Self {
            assigned_to: Some(assigned_to.into()),
            due_date: Some(due_date.into()),
            ..Self::default()
        }
    }

    /// Sets the assigner.
    #[must_use]
    pub fn with_assigned_by(mut self, assigned_by: impl Into<String>) -> Self {
        self.assigned_by = Some(assigned_by.into());
        self
    }

    /// Overrides the inherited title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Overrides the inherited description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Builds the todo patch for `issue`.
    #[must_use]
    pub fn into_todo_patch(self, issue: &Issue) -> TodoPatch {
        let title = normalize_text(self.title).unwrap_or_else(|| issue.title().to_owned());
        let mut patch = TodoPatch::new()
            .with_title(title)
            .with_originating_issue(issue.id());
        if let Some(description) =
            normalize_text(self.description).or_else(|| issue.description().map(ToOwned::to_owned))
        {
            patch = patch.with_description(description);
        }
        if let Some(assigned_to) = self.assigned_to {
            patch = patch.with_assigned_to(assigned_to);
        }
        if let Some(assigned_by) = self.assigned_by {
            patch = patch.with_assigned_by(assigned_by);
        }
        if let Some(due_date) = self.due_date {
            patch = patch.with_due_date(due_date);
        }
        patch.or_assigned_by(SYSTEM_ACTOR)
    }
}

/// Raw issue listing query. Blank values are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueListQuery {
    /// Planning horizon filter.
    #[serde(rename = "type")]
    pub issue_type: Option<String>,
    /// Status filter.
    pub status: Option<String>,
    /// Priority filter.
    pub priority: Option<String>,
    /// One-based page number.
    pub page: Option<String>,
    /// Page size.
    pub limit: Option<String>,
}

impl IssueListQuery {
    /// Validates the query into a filter and page request.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] naming every malformed parameter.
    pub fn resolve(
        &self,
        default_limit: u32,
        max_limit: u32,
    ) -> Result<(IssueFilter, PageRequest), ValidationError> {
        let mut violations = Violations::new();
        let filter = IssueFilter {
            issue_type: violations.wire_value("type", present(self.issue_type.as_deref())),
            status: violations.wire_value("status", present(self.status.as_deref())),
            priority: violations.wire_value("priority", present(self.priority.as_deref())),
        };
        let page = page_request(
            &mut violations,
            self.page.as_deref(),
            self.limit.as_deref(),
            default_limit,
            max_limit,
        );
        violations.finish()?;
        Ok((filter, page.unwrap_or_default()))
    }
}

/// Raw todo listing query. Blank values are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoListQuery {
    /// Assignee filter.
    pub assigned_to: Option<String>,
    /// Assigner filter.
    pub assigned_by: Option<String>,
    /// Effective status filter.
    pub status: Option<String>,
    /// One-based page number.
    pub page: Option<String>,
    /// Page size.
    pub limit: Option<String>,
}

impl TodoListQuery {
    /// Validates the query into a filter evaluated at `as_of` and a page
    /// request.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] naming every malformed parameter.
    pub fn resolve(
        &self,
        as_of: DateTime<Utc>,
        default_limit: u32,
        max_limit: u32,
    ) -> Result<(TodoFilter, PageRequest), ValidationError> {
        let mut violations = Violations::new();
        let filter = TodoFilter {
            assigned_to: present(self.assigned_to.as_deref()).map(ToOwned::to_owned),
            assigned_by: present(self.assigned_by.as_deref()).map(ToOwned::to_owned),
            status: violations.wire_value("status", present(self.status.as_deref())),
            as_of,
        };
        let page = page_request(
            &mut violations,
            self.page.as_deref(),
            self.limit.as_deref(),
            default_limit,
            max_limit,
        );
        violations.finish()?;
        Ok((filter, page.unwrap_or_default()))
    }
}

fn present(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|value| !value.is_empty())
}

fn page_request(
    violations: &mut Violations,
    page: Option<&str>,
    limit: Option<&str>,
    default_limit: u32,
    max_limit: u32,
) -> Option<PageRequest> {
    // Unparseable numbers fall through as zero so the range message applies.
    let page_number = present(page).map_or(1, |raw| raw.parse::<u32>().unwrap_or(0));
    let page_size = present(limit).map_or(default_limit, |raw| raw.parse::<u32>().unwrap_or(0));
    match PageRequest::new(page_number, page_size, max_limit) {
        Ok(request) => Some(request),
        Err(err) => {
            for violation in err.violations() {
                violations.push(violation.field(), violation.message());
            }
            None
        }
    }
}
