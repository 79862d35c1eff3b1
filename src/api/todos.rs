//! Todo endpoints and the todo response shape.

use super::{AppState, envelope::Envelope, error::ApiError};
use crate::tracker::{
    domain::{IssueId, IssueSummary, TodoId, TodoPatch, TodoStatus, TodoView},
    services::TodoListQuery,
};
use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

type ApiResult<T> = Result<T, ApiError>;

/// Originating issue as rendered in responses: a summary when the issue
/// still exists, otherwise its bare identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum OriginatingIssue {
    /// Resolved issue summary.
    Summary(IssueSummary),
    /// Identifier of an issue that no longer exists.
    Id(IssueId),
}

/// Todo as rendered in responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoResponse {
    id: TodoId,
    title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    assigned_to: String,
    assigned_by: String,
    due_date: DateTime<Utc>,
    status: TodoStatus,
    originating_issue: OriginatingIssue,
    #[serde(skip_serializing_if = "Option::is_none")]
    completed_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<TodoView> for TodoResponse {
    fn from(view: TodoView) -> Self {
        let (todo, summary) = view.into_parts();
        let originating_issue = summary.map_or_else(
            || OriginatingIssue::Id(todo.originating_issue()),
            OriginatingIssue::Summary,
        );
        Self {
            id: todo.id(),
            title: todo.title().to_owned(),
            description: todo.description().map(ToOwned::to_owned),
            assigned_to: todo.assigned_to().to_owned(),
            assigned_by: todo.assigned_by().to_owned(),
            due_date: todo.due_date(),
            status: todo.status(),
            originating_issue,
            completed_at: todo.completed_at(),
            created_at: todo.created_at(),
            updated_at: todo.updated_at(),
        }
    }
}

pub(super) async fn list(
    State(state): State<AppState>,
    query_result: Result<Query<TodoListQuery>, QueryRejection>,
) -> ApiResult<Json<Envelope<Vec<TodoResponse>>>> {
    let Query(query) = query_result?;
    let page = state.tracker.list_todos(&query).await?;
    Ok(Json(Envelope::page(page.map(TodoResponse::from))))
}

pub(super) async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Envelope<TodoResponse>>> {
    let view = state.tracker.get_todo(TodoId::parse("id", &id)?).await?;
    Ok(Json(Envelope::data(view.into())))
}

pub(super) async fn create(
    State(state): State<AppState>,
    payload: Result<Json<TodoPatch>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Envelope<TodoResponse>>)> {
    let Json(patch) = payload?;
    let view = state.tracker.create_todo(patch).await?;
    Ok((StatusCode::CREATED, Json(Envelope::data(view.into()))))
}

pub(super) async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<TodoPatch>, JsonRejection>,
) -> ApiResult<Json<Envelope<TodoResponse>>> {
    let todo_id = TodoId::parse("id", &id)?;
    let Json(patch) = payload?;
    let view = state.tracker.update_todo(todo_id, patch).await?;
    Ok(Json(Envelope::data(view.into())))
}

pub(super) async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Envelope<()>>> {
    state.tracker.delete_todo(TodoId::parse("id", &id)?).await?;
    Ok(Json(Envelope::message("ToDo deleted successfully")))
}

pub(super) async fn complete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Envelope<TodoResponse>>> {
    let view = state.tracker.complete_todo(TodoId::parse("id", &id)?).await?;
    Ok(Json(Envelope::data(view.into())))
}
