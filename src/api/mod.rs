//! HTTP surface of the tracker.
//!
//! Every route lives under `/api` and answers with the JSON envelope from
//! [`envelope`]. Unknown routes return a JSON 404.

mod envelope;
mod error;
mod issues;
mod server;
mod todos;

pub use envelope::{Envelope, Pagination};
pub use error::ApiError;
pub use server::{ServeError, cors_layer, serve};
pub use todos::{OriginatingIssue, TodoResponse};

use crate::tracker::services::DynTrackerService;
use axum::{
    Json, Router,
    extract::DefaultBodyLimit,
    routing::{get, put},
};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Request bodies larger than this are rejected.
pub const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    tracker: DynTrackerService,
}

impl AppState {
    /// Wraps the tracker service.
    #[must_use]
    pub const fn new(tracker: DynTrackerService) -> Self {
        Self { tracker }
    }
}

/// Builds the API router without transport middleware.
#[must_use]
pub fn router(state: AppState) -> Router {
    let issue_routes = Router::new()
        .route("/", get(issues::list).post(issues::create))
        .route(
            "/{id}",
            get(issues::get).put(issues::update).delete(issues::delete),
        )
        .route(
            "/{id}/convert-to-todo",
            axum::routing::post(issues::convert_to_todo),
        )
        .route("/{id}/move-to-longterm", put(issues::move_to_long_term))
        .route("/{id}/move-to-shortterm", put(issues::move_to_short_term));

    let todo_routes = Router::new()
        .route("/", get(todos::list).post(todos::create))
        .route(
            "/{id}",
            get(todos::get).put(todos::update).delete(todos::delete),
        )
        .route("/{id}/complete", put(todos::complete));

    let api = Router::new()
        .nest("/issues", issue_routes)
        .nest("/todos", todo_routes)
        .route("/health", get(health));

    Router::new()
        .nest("/api", api)
        .fallback(route_not_found)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}

#[derive(Serialize)]
struct Health {
    success: bool,
    message: &'static str,
    timestamp: DateTime<Utc>,
}

async fn health() -> Json<Health> {
    Json(Health {
        success: true,
        message: "EOS API is running",
        timestamp: Utc::now(),
    })
}

async fn route_not_found() -> ApiError {
    ApiError::route_not_found()
}
