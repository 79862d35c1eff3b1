//! Issue endpoints.

use super::{AppState, envelope::Envelope, error::ApiError, todos::TodoResponse};
use crate::tracker::{
    domain::{Issue, IssueId, IssuePatch, IssueType},
    services::{ConvertIssueRequest, IssueListQuery},
};
use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
};

type ApiResult<T> = Result<T, ApiError>;

pub(super) async fn list(
    State(state): State<AppState>,
    query_result: Result<Query<IssueListQuery>, QueryRejection>,
) -> ApiResult<Json<Envelope<Vec<Issue>>>> {
    let Query(query) = query_result?;
    let page = state.tracker.list_issues(&query).await?;
    Ok(Json(Envelope::page(page)))
}

pub(super) async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Envelope<Issue>>> {
    let issue = state.tracker.get_issue(IssueId::parse("id", &id)?).await?;
    Ok(Json(Envelope::data(issue)))
}

pub(super) async fn create(
    State(state): State<AppState>,
    payload: Result<Json<IssuePatch>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Envelope<Issue>>)> {
    let Json(patch) = payload?;
    let issue = state.tracker.create_issue(patch).await?;
    Ok((StatusCode::CREATED, Json(Envelope::data(issue))))
}

pub(super) async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<IssuePatch>, JsonRejection>,
) -> ApiResult<Json<Envelope<Issue>>> {
    let issue_id = IssueId::parse("id", &id)?;
    let Json(patch) = payload?;
    let issue = state.tracker.update_issue(issue_id, patch).await?;
    Ok(Json(Envelope::data(issue)))
}

pub(super) async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Envelope<()>>> {
    state.tracker.delete_issue(IssueId::parse("id", &id)?).await?;
    Ok(Json(Envelope::message("Issue deleted successfully")))
}

pub(super) async fn convert_to_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<ConvertIssueRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Envelope<TodoResponse>>)> {
    let issue_id = IssueId::parse("id", &id)?;
    let Json(request) = payload?;
    let view = state.tracker.convert_issue_to_todo(issue_id, request).await?;
    Ok((StatusCode::CREATED, Json(Envelope::data(view.into()))))
}

pub(super) async fn move_to_long_term(
    state: State<AppState>,
    id: Path<String>,
) -> ApiResult<Json<Envelope<Issue>>> {
    move_to(state, id, IssueType::Long).await
}

pub(super) async fn move_to_short_term(
    state: State<AppState>,
    id: Path<String>,
) -> ApiResult<Json<Envelope<Issue>>> {
    move_to(state, id, IssueType::Short).await
}

async fn move_to(
    State(state): State<AppState>,
    Path(id): Path<String>,
    issue_type: IssueType,
) -> ApiResult<Json<Envelope<Issue>>> {
    let issue = state
        .tracker
        .move_issue_type(IssueId::parse("id", &id)?, issue_type)
        .await?;
    Ok(Json(Envelope::data(issue)))
}
