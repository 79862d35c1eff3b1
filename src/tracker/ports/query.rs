//! Filters and pagination shared by repository listings.

use crate::tracker::domain::{
    Issue, IssuePriority, IssueStatus, IssueType, Todo, TodoStatus, ValidationError, Violations,
    effective_status,
};
use chrono::{DateTime, Utc};

/// Default number of items per page.
pub const DEFAULT_PAGE_LIMIT: u32 = 50;
/// Largest page size a caller may request.
pub const MAX_PAGE_LIMIT: u32 = 100;

/// Validated one-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl PageRequest {
    /// Creates a page request.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] when `page` is zero or `limit` falls
    /// outside `1..=max_limit`.
    pub fn new(page: u32, limit: u32, max_limit: u32) -> Result<Self, ValidationError> {
        let mut violations = Violations::new();
        if page == 0 {
            violations.push("page", "page must be at least 1");
        }
        if limit == 0 || limit > max_limit {
            violations.push("limit", format!("limit must be between 1 and {max_limit}"));
        }
        violations.finish()?;
        Ok(Self { page, limit })
    }

    /// Returns the one-based page number.
    #[must_use]
    pub const fn page(self) -> u32 {
        self.page
    }

    /// Returns the page size.
    #[must_use]
    pub const fn limit(self) -> u32 {
        self.limit
    }

    /// Returns how many items precede this page.
    #[must_use]
    pub const fn offset(self) -> u64 {
        (self.page as u64 - 1) * self.limit as u64
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

/// One page of results plus the total number of matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    items: Vec<T>,
    total: u64,
    request: PageRequest,
}

impl<T> Page<T> {
    /// Creates a page.
    #[must_use]
    pub const fn new(items: Vec<T>, total: u64, request: PageRequest) -> Self {
        Self {
            items,
            total,
            request,
        }
    }

    /// Returns the items on this page.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Consumes the page, returning its items.
    #[must_use]
    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// Returns the total number of matching items across all pages.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.total
    }

    /// Returns the request this page answers.
    #[must_use]
    pub const fn request(&self) -> PageRequest {
        self.request
    }

    /// Returns the number of pages needed for all matches.
    #[must_use]
    pub const fn pages(&self) -> u64 {
        self.total.div_ceil(self.request.limit as u64)
    }

    /// Maps every item, keeping the paging metadata.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            request: self.request,
        }
    }
}

/// Issue listing filter. Absent fields match everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IssueFilter {
    /// Restrict to one planning horizon.
    pub issue_type: Option<IssueType>,
    /// Restrict to one status.
    pub status: Option<IssueStatus>,
    /// Restrict to one priority.
    pub priority: Option<IssuePriority>,
}

impl IssueFilter {
    /// Returns `true` when `issue` satisfies every set criterion.
    #[must_use]
    pub fn matches(&self, issue: &Issue) -> bool {
        self.issue_type.is_none_or(|value| issue.issue_type() == value)
            && self.status.is_none_or(|value| issue.status() == value)
            && self.priority.is_none_or(|value| issue.priority() == value)
    }
}

/// Todo listing filter. Absent fields match everything.
///
/// The status criterion compares against the status each todo has at
/// `as_of`, so `late` also matches pending todos that are now overdue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoFilter {
    /// Restrict to one assignee.
    pub assigned_to: Option<String>,
    /// Restrict to one assigner.
    pub assigned_by: Option<String>,
    /// Restrict to one effective status.
    pub status: Option<TodoStatus>,
    /// Instant at which lateness is evaluated.
    pub as_of: DateTime<Utc>,
}

impl TodoFilter {
    /// Creates a filter matching every todo.
    #[must_use]
    pub const fn new(as_of: DateTime<Utc>) -> Self {
        Self {
            assigned_to: None,
            assigned_by: None,
            status: None,
            as_of,
        }
    }

    /// Returns `true` when `todo` satisfies every set criterion.
    #[must_use]
    pub fn matches(&self, todo: &Todo) -> bool {
        self.assigned_to
            .as_deref()
            .is_none_or(|value| todo.assigned_to() == value)
            && self
                .assigned_by
                .as_deref()
                .is_none_or(|value| todo.assigned_by() == value)
            && self.status.is_none_or(|value| {
                effective_status(todo.status(), todo.due_date(), self.as_of) == value
            })
    }
}
