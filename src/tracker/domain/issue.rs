//! Issue aggregate and its open → resolved lifecycle.

use super::{
    IssueId, ValidationError, Violations, WireValue,
    validation::{
        ISSUE_DESCRIPTION_MAX_CHARS, ISSUE_TITLE_MAX_CHARS, normalize_text, wire_conversions,
    },
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Issue priority.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssuePriority {
    /// Low priority.
    Low,
    /// Default priority.
    #[default]
    Medium,
    /// High priority.
    High,
    /// Needs immediate attention.
    Critical,
}

impl WireValue for IssuePriority {
    const KIND: &'static str = "issue priority";
    const VALUES: &'static [Self] = &[Self::Low, Self::Medium, Self::High, Self::Critical];

    fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

/// Planning horizon of an issue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueType {
    /// Short-term issue.
    #[default]
    Short,
    /// Long-term issue.
    Long,
}

impl WireValue for IssueType {
    const KIND: &'static str = "issue type";
    const VALUES: &'static [Self] = &[Self::Short, Self::Long];

    fn as_str(self) -> &'static str {
        match self {
            Self::Short => "short",
            Self::Long => "long",
        }
    }
}

/// Issue lifecycle status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueStatus {
    /// Issue is awaiting action.
    #[default]
    Open,
    /// Issue has been dealt with. Terminal.
    Resolved,
}

impl IssueStatus {
    /// Returns `true` when no transition leaves this status.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Resolved)
    }

    /// Returns `true` when an explicit request may move an issue from
    /// `self` to `target`.
    #[must_use]
    pub const fn can_transition_to(self, target: Self) -> bool {
        !self.is_terminal() || matches!(target, Self::Resolved)
    }
}

impl WireValue for IssueStatus {
    const KIND: &'static str = "issue status";
    const VALUES: &'static [Self] = &[Self::Open, Self::Resolved];

    fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Resolved => "resolved",
        }
    }
}

wire_conversions!(IssuePriority, IssueType, IssueStatus);

/// Field changes requested for an issue.
///
/// Used both to create an issue (absent fields take their defaults) and to
/// edit one (absent fields keep their current value). Enum values arrive as
/// raw strings so membership failures are reported alongside every other
/// violation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuePatch {
    title: Option<String>,
    description: Option<String>,
    priority: Option<String>,
    #[serde(rename = "type")]
    issue_type: Option<String>,
    status: Option<String>,
    created_by: Option<String>,
}

impl IssuePatch {
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

    /// Sets the priority from its wire value.
    #[must_use]
    pub fn with_priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = Some(priority.into());
        self
    }

    /// Sets the type from its wire value.
    #[must_use]
    pub fn with_type(mut self, issue_type: impl Into<String>) -> Self {
        self.issue_type = Some(issue_type.into());
        self
    }

    /// Sets the status from its wire value.
    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// Sets the creator attribution.
    #[must_use]
    pub fn with_created_by(mut self, created_by: impl Into<String>) -> Self {
        self.created_by = Some(created_by.into());
        self
    }

    /// Fills in the creator attribution when the caller left it out.
    #[must_use]
    pub fn or_created_by(mut self, actor: &str) -> Self {
        if normalize_text(self.created_by.clone()).is_none() {
            self.created_by = Some(actor.to_owned());
        }
        self
    }
}

/// Issue aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    id: IssueId,
    title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    priority: IssuePriority,
    #[serde(rename = "type")]
    issue_type: IssueType,
    status: IssueStatus,
    created_by: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    resolved_at: Option<DateTime<Utc>>,
}

/// Parameter object for reconstructing a persisted issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedIssueData {
    /// Persisted identifier.
    pub id: IssueId,
    /// Persisted title.
    pub title: String,
    /// Persisted description, if any.
    pub description: Option<String>,
    /// Persisted priority.
    pub priority: IssuePriority,
    /// Persisted type.
    pub issue_type: IssueType,
    /// Persisted status.
    pub status: IssueStatus,
    /// Persisted creator attribution.
    pub created_by: String,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest update timestamp.
    pub updated_at: DateTime<Utc>,
    /// Persisted resolution timestamp, if any.
    pub resolved_at: Option<DateTime<Utc>>,
}

impl Issue {
    /// Builds a new issue from `patch`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] listing every violated constraint.
    pub fn create(patch: IssuePatch, now: DateTime<Utc>) -> Result<Self, ValidationError> {
        let blank = Self {
            id: IssueId::new(),
            title: String::new(),
            description: None,
            priority: IssuePriority::default(),
            issue_type: IssueType::default(),
            status: IssueStatus::default(),
            created_by: String::new(),
            created_at: now,
            updated_at: now,
            resolved_at: None,
        };
        blank.merged(patch, now)
    }

    /// Reconstructs an issue from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedIssueData) -> Self {
        Self {
            id: data.id,
            title: data.title,
            description: data.description,
            priority: data.priority,
            issue_type: data.issue_type,
            status: data.status,
            created_by: data.created_by,
            created_at: data.created_at,
            updated_at: data.updated_at,
            resolved_at: data.resolved_at,
        }
    }

    /// Merges `patch` into this issue and stamps lifecycle timestamps.
    ///
    /// The issue is left untouched when validation fails.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] listing every violated constraint.
    pub fn apply_patch(
        &mut self,
        patch: IssuePatch,
        now: DateTime<Utc>,
    ) -> Result<(), ValidationError> {
        *self = self.merged(patch, now)?;
        Ok(())
    }

    /// Moves the issue to another planning horizon.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] when the stored issue no longer satisfies
    /// its field constraints.
    pub fn move_to(
        &mut self,
        issue_type: IssueType,
        now: DateTime<Utc>,
    ) -> Result<(), ValidationError> {
        self.apply_patch(IssuePatch::new().with_type(issue_type.as_str()), now)
    }

    /// Marks the issue as resolved.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] when the stored issue no longer satisfies
    /// its field constraints.
    pub fn resolve(&mut self, now: DateTime<Utc>) -> Result<(), ValidationError> {
        self.apply_patch(
            IssuePatch::new().with_status(IssueStatus::Resolved.as_str()),
            now,
        )
    }

    fn merged(&self, patch: IssuePatch, now: DateTime<Utc>) -> Result<Self, ValidationError> {
        let mut violations = Violations::new();
        let mut next = self.clone();

        if let Some(title) = patch.title {
            title.trim().clone_into(&mut next.title);
        }
        if patch.description.is_some() {
            next.description = normalize_text(patch.description);
        }
        if let Some(created_by) = patch.created_by {
            created_by.trim().clone_into(&mut next.created_by);
        }
        if let Some(priority) = violations.wire_value("priority", patch.priority.as_deref()) {
            next.priority = priority;
        }
        if let Some(issue_type) = violations.wire_value("type", patch.issue_type.as_deref()) {
            next.issue_type = issue_type;
        }
        if let Some(status) =
            violations.wire_value::<IssueStatus>("status", patch.status.as_deref())
        {
            if self.status.can_transition_to(status) {
                next.status = status;
            } else {
                violations.push("status", "resolved issues cannot be reopened");
            }
        }

        violations.required_text("title", &next.title, ISSUE_TITLE_MAX_CHARS);
        violations.optional_text(
            "description",
            next.description.as_deref(),
            ISSUE_DESCRIPTION_MAX_CHARS,
        );
        violations.required("createdBy", &next.created_by);
        violations.finish()?;

        next.stamp(now);
        Ok(next)
    }

    fn stamp(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
        if self.status == IssueStatus::Resolved && self.resolved_at.is_none() {
            self.resolved_at = Some(now);
        }
    }

    /// Returns the issue identifier.
    #[must_use]
    pub const fn id(&self) -> IssueId {
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

    /// Returns the priority.
    #[must_use]
    pub const fn priority(&self) -> IssuePriority {
        self.priority
    }

    /// Returns the planning horizon.
    #[must_use]
    pub const fn issue_type(&self) -> IssueType {
        self.issue_type
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> IssueStatus {
        self.status
    }

    /// Returns the creator attribution.
    #[must_use]
    pub fn created_by(&self) -> &str {
        &self.created_by
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

    /// Returns when the issue was first resolved.
    #[must_use]
    pub const fn resolved_at(&self) -> Option<DateTime<Utc>> {
        self.resolved_at
    }
}
