//! Mapping of tracker failures onto HTTP responses.

use super::envelope::Envelope;
use crate::tracker::{
    domain::{FieldViolation, ValidationError},
    services::TrackerError,
};
use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::error;

const INTERNAL_MESSAGE: &str = "Something went wrong!";

/// Error returned by request handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    status: StatusCode,
    message: String,
    errors: Vec<FieldViolation>,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            errors: Vec::new(),
        }
    }

    /// 404 for requests that match no route.
    #[must_use]
    pub fn route_not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, "Route not found")
    }

    /// Returns the HTTP status of this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns the human-readable message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: "Validation failed".to_owned(),
            errors: err.violations().to_vec(),
        }
    }
}

impl From<TrackerError> for ApiError {
    fn from(err: TrackerError) -> Self {
        match err {
            TrackerError::Validation(validation) => validation.into(),
            TrackerError::IssueNotFound(_) => Self::new(StatusCode::NOT_FOUND, "Issue not found"),
            TrackerError::TodoNotFound(_) => Self::new(StatusCode::NOT_FOUND, "ToDo not found"),
            TrackerError::Persistence(source) => {
                error!(error = %source, "tracker store failed");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_MESSAGE)
            }
            TrackerError::PartialWorkflow {
                todo,
                issue_id,
                source,
            } => {
                error!(issue_id = %issue_id, todo_id = %todo.id(), error = %source, "partial conversion");
                Self::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!(
                        "ToDo {} was created but issue {issue_id} could not be resolved",
                        todo.id()
                    ),
                )
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::new(StatusCode::BAD_REQUEST, rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::new(StatusCode::BAD_REQUEST, rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Envelope::failure(self.message, self.errors);
        (self.status, Json(body)).into_response()
    }
}
