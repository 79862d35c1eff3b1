//! Todo aggregate and its due-date driven lifecycle.
//!
//! `pending` becomes `late` purely as a function of the due date and the
//! current instant (see [`effective_status`]); `completed` is terminal.

use super::{
    IssueId, TodoId, ValidationError, Violations, WireValue,
    validation::{
        TODO_DESCRIPTION_MAX_CHARS, TODO_TITLE_MAX_CHARS, normalize_text, wire_conversions,
    },
};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Todo lifecycle status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TodoStatus {
    /// Awaiting completion, due date not yet passed.
    #[default]
    Pending,
    /// Done. Terminal.
    Completed,
    /// Due date passed while pending.
    Late,
}

impl TodoStatus {
    /// Returns `true` when no transition leaves this status.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed)
    }

    /// Returns `true` when an explicit request may move a todo from `self` to
    /// `target`. `overdue` reports whether the due date has already passed.
    #[must_use]
    pub const fn can_transition_to(self, target: Self, overdue: bool) -> bool {
        transition_violation(self, target, overdue).is_none()
    }
}

const fn transition_violation(
    from: TodoStatus,
    to: TodoStatus,
    overdue: bool,
) -> Option<&'static str> {
    match (from, to) {
        (TodoStatus::Pending, TodoStatus::Pending)
        | (TodoStatus::Late, TodoStatus::Late)
        | (TodoStatus::Completed, TodoStatus::Completed)
        | (TodoStatus::Pending | TodoStatus::Late, TodoStatus::Completed) => None,
        (TodoStatus::Completed, _) => Some("completed todos cannot change status"),
        (TodoStatus::Late, TodoStatus::Pending) => Some("late todos cannot return to pending"),
        (TodoStatus::Pending, TodoStatus::Late) if overdue => None,
        (TodoStatus::Pending, TodoStatus::Late) => {
            Some("status can only become late once the due date has passed")
        }
    }
}

impl WireValue for TodoStatus {
    const KIND: &'static str = "todo status";
    const VALUES: &'static [Self] = &[Self::Pending, Self::Completed, Self::Late];

    fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Late => "late",
        }
    }
}

wire_conversions!(TodoStatus);

/// Status a todo has at `now`.
///
/// A pending todo whose due date lies strictly before `now` is late; every
/// other status is returned unchanged, so late never reverts to pending and
/// completed never becomes late.
#[must_use]
pub fn effective_status(
    status: TodoStatus,
    due_date: DateTime<Utc>,
    now: DateTime<Utc>,
) -> TodoStatus {
    if status == TodoStatus::Pending && now > due_date {
        TodoStatus::Late
    } else {
        status
    }
}

/// Field changes requested for a todo.
///
/// Used both to create a todo and to edit one. Enum, date and identifier
/// values arrive as raw strings so malformed input is reported alongside
/// every other violation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoPatch {
    title: Option<String>,
    description: Option<String>,
    assigned_to: Option<String>,
    assigned_by: Option<String>,
    due_date: Option<String>,
    status: Option<String>,
    originating_issue: Option<String>,
}

impl TodoPatch {
    /// Creates an empty patch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the description; a blank value clears it.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the assignee.
    #[must_use]
    pub fn with_assigned_to(mut self, assigned_to: impl Into<String>) -> Self {
        self.assigned_to = Some(assigned_to.into());
        self
    }

    /// Sets the assigner.
    #[must_use]
    pub fn with_assigned_by(mut self, assigned_by: impl Into<String>) -> Self {
        self.assigned_by = Some(assigned_by.into());
        self
    }

    /// Sets the due date from its ISO 8601 text.
    #[must_use]
    pub fn with_due_date(mut self, due_date: impl Into<String>) -> Self {
        self.due_date = Some(due_date.into());
        self
    }

    /// Sets the due date from a timestamp.
    #[must_use]
    pub fn with_due_at(self, due_at: DateTime<Utc>) -> Self {
        self.with_due_date(due_at.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    /// Sets the status from its wire value.
    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// Sets the originating issue.
    #[must_use]
    pub fn with_originating_issue(mut self, issue_id: IssueId) -> Self {
        self.originating_issue = Some(issue_id.to_string());
        self
    }

    /// Sets the originating issue from caller-supplied text.
    #[must_use]
    pub fn with_originating_issue_text(mut self, issue_id: impl Into<String>) -> Self {
        self.originating_issue = Some(issue_id.into());
        self
    }

    /// Fills in the assigner when the caller left it out.
    #[must_use]
    pub fn or_assigned_by(mut self, actor: &str) -> Self {
        if normalize_text(self.assigned_by.clone()).is_none() {
            self.assigned_by = Some(actor.to_owned());
        }
        self
    }
}

/// Todo aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    id: TodoId,
    title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    assigned_to: String,
    assigned_by: String,
    due_date: DateTime<Utc>,
    status: TodoStatus,
    originating_issue: IssueId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    completed_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted todo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTodoData {
    /// Persisted identifier.
    pub id: TodoId,
    /// Persisted title.
    pub title: String,
    /// Persisted description, if any.
    pub description: Option<String>,
    /// Persisted assignee.
    pub assigned_to: String,
    /// Persisted assigner.
    pub assigned_by: String,
    /// Persisted due date.
    pub due_date: DateTime<Utc>,
    /// Persisted status, as last written.
    pub status: TodoStatus,
    /// Persisted originating issue reference.
    pub originating_issue: IssueId,
    /// Persisted completion timestamp, if any.
    pub completed_at: Option<DateTime<Utc>>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Todo {
    /// Builds a new todo from `patch`.
    ///
    /// The originating issue is recorded as given; its existence is not
    /// checked here.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] listing every violated constraint,
    /// including a missing due date or originating issue.
    pub fn create(patch: TodoPatch, now: DateTime<Utc>) -> Result<Self, ValidationError> {
        let mut violations = Violations::new();
        if patch.due_date.is_none() {
            violations.push("dueDate", "valid dueDate is required");
        }
        if patch.originating_issue.is_none() {
            violations.push(
                "originatingIssue",
                "valid originatingIssue id is required",
            );
        }
        let blank = Self {
            id: TodoId::new(),
            title: String::new(),
            description: None,
            assigned_to: String::new(),
            assigned_by: String::new(),
            due_date: now,
            status: TodoStatus::default(),
            originating_issue: IssueId::from_uuid(uuid::Uuid::nil()),
            completed_at: None,
            created_at: now,
            updated_at: now,
        };
        blank.merged(patch, now, violations)
    }

    /// Reconstructs a todo from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTodoData) -> Self {
        Self {
            id: data.id,
            title: data.title,
            description: data.description,
            assigned_to: data.assigned_to,
            assigned_by: data.assigned_by,
            due_date: data.due_date,
            status: data.status,
            originating_issue: data.originating_issue,
            completed_at: data.completed_at,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Merges `patch` into this todo and applies the persistence rules.
    ///
    /// The todo is left untouched when validation fails.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] listing every violated constraint.
    pub fn apply_patch(
        &mut self,
        patch: TodoPatch,
        now: DateTime<Utc>,
    ) -> Result<(), ValidationError> {
        *self = self.merged(patch, now, Violations::new())?;
        Ok(())
    }

    /// Marks the todo completed. Completing twice keeps the first
    /// `completedAt`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] when the stored todo no longer satisfies
    /// its field constraints.
    pub fn complete(&mut self, now: DateTime<Utc>) -> Result<(), ValidationError> {
        self.apply_patch(
            TodoPatch::new().with_status(TodoStatus::Completed.as_str()),
            now,
        )
    }

    /// Returns this todo as observed at `now`, with lateness recomputed and
    /// nothing else changed.
    #[must_use]
    pub fn observed_at(&self, now: DateTime<Utc>) -> Self {
        let mut observed = self.clone();
        observed.status = effective_status(self.status, self.due_date, now);
        observed
    }

    /// Returns `true` when the due date lies strictly before `now`.
    #[must_use]
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        now > self.due_date
    }

    fn merged(
        &self,
        patch: TodoPatch,
        now: DateTime<Utc>,
        mut violations: Violations,
    ) -> Result<Self, ValidationError> {
        let previous = effective_status(self.status, self.due_date, now);
        let mut next = self.clone();
        next.status = previous;

        if let Some(title) = patch.title {
            title.trim().clone_into(&mut next.title);
        }
        if patch.description.is_some() {
            next.description = normalize_text(patch.description);
        }
        if let Some(assigned_to) = patch.assigned_to {
            assigned_to.trim().clone_into(&mut next.assigned_to);
        }
        if let Some(assigned_by) = patch.assigned_by {
            assigned_by.trim().clone_into(&mut next.assigned_by);
        }
        if let Some(due_date) = violations.timestamp("dueDate", patch.due_date.as_deref()) {
            next.due_date = due_date;
        }
        if let Some(raw) = patch.originating_issue.as_deref() {
            match IssueId::parse("originatingIssue", raw) {
                Ok(issue_id) => next.originating_issue = issue_id,
                Err(_) => violations.push(
                    "originatingIssue",
                    "valid originatingIssue id is required",
                ),
            }
        }
        if let Some(requested) =
            violations.wire_value::<TodoStatus>("status", patch.status.as_deref())
        {
            match transition_violation(previous, requested, next.is_overdue(now)) {
                None => next.status = requested,
                Some(message) => violations.push("status", message),
            }
        }

        violations.required_text("title", &next.title, TODO_TITLE_MAX_CHARS);
        violations.optional_text(
            "description",
            next.description.as_deref(),
            TODO_DESCRIPTION_MAX_CHARS,
        );
        violations.required("assignedTo", &next.assigned_to);
        violations.required("assignedBy", &next.assigned_by);
        violations.finish()?;

        next.stamp(now);
        Ok(next)
    }

    /// Persistence rules, in order: refresh `updatedAt`, stamp `completedAt`
    /// once, then advance overdue pending todos to late.
    fn stamp(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
        if self.status == TodoStatus::Completed && self.completed_at.is_none() {
            self.completed_at = Some(now);
        }
        self.status = effective_status(self.status, self.due_date, now);
    }

    /// Returns the todo identifier.
    #[must_use]
    pub const fn id(&self) -> TodoId {
        self.id
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the assignee.
    #[must_use]
    pub fn assigned_to(&self) -> &str {
        &self.assigned_to
    }

    /// Returns the assigner.
    #[must_use]
    pub fn assigned_by(&self) -> &str {
        &self.assigned_by
    }

    /// Returns the due date.
    #[must_use]
    pub const fn due_date(&self) -> DateTime<Utc> {
        self.due_date
    }

    /// Returns the status as last persisted or observed.
    #[must_use]
    pub const fn status(&self) -> TodoStatus {
        self.status
    }

    /// Returns the originating issue reference.
    #[must_use]
    pub const fn originating_issue(&self) -> IssueId {
        self.originating_issue
    }

    /// Returns when the todo was first completed.
    #[must_use]
    pub const fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}
