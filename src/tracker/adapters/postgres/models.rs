//! Diesel row models for issue and todo persistence.

use super::schema::{issues, todos};
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for issue records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = issues)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct IssueRow {
    pub id: uuid::Uuid,
    pub title: String,
    pub description: Option<String>,
    pub priority: String,
    pub issue_type: String,
    pub status: String,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
}

/// Insert and update model for issue records.
///
/// `None` values are written as `NULL` so a cleared description is persisted.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = issues)]
#[diesel(treat_none_as_null = true)]
pub struct IssueWriteRow {
    pub id: uuid::Uuid,
    pub title: String,
    pub description: Option<String>,
    pub priority: String,
    pub issue_type: String,
    pub status: String,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
}

/// Query result row for todo records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = todos)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TodoRow {
    pub id: uuid::Uuid,
    pub title: String,
    pub description: Option<String>,
    pub assigned_to: String,
    pub assigned_by: String,
    pub due_date: DateTime<Utc>,
    pub status: String,
    pub originating_issue: uuid::Uuid,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert and update model for todo records.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = todos)]
#[diesel(treat_none_as_null = true)]
pub struct TodoWriteRow {
    pub id: uuid::Uuid,
    pub title: String,
    pub description: Option<String>,
    pub assigned_to: String,
    pub assigned_by: String,
    pub due_date: DateTime<Utc>,
    pub status: String,
    pub originating_issue: uuid::Uuid,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
