//! JSON response envelope shared by every endpoint.

use crate::tracker::{domain::FieldViolation, ports::Page};
use serde::Serialize;

/// Paging metadata attached to list responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    /// Current one-based page.
    pub current: u32,
    /// Number of pages available.
    pub pages: u64,
    /// Total number of matching items.
    pub total: u64,
}

/// Response body: `success` plus data, a message, or error details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Envelope<T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pagination: Option<Pagination>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    errors: Vec<FieldViolation>,
}

impl<T> Envelope<T> {
    /// Successful response carrying `data`.
    #[must_use]
    pub const fn data(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            pagination: None,
            message: None,
            errors: Vec::new(),
        }
    }
}

impl<T> Envelope<Vec<T>> {
    /// Successful list response with paging metadata.
    #[must_use]
    pub fn page(page: Page<T>) -> Self {
        let pagination = Pagination {
            current: page.request().page(),
            pages: page.pages(),
            total: page.total(),
        };
        Self {
            pagination: Some(pagination),
            ..Self::data(page.into_items())
        }
    }
}

impl Envelope<()> {
    /// Successful response carrying only a message.
    #[must_use]
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: None,
            pagination: None,
            message: Some(message.into()),
            errors: Vec::new(),
        }
    }

    /// Failed response with a message and optional field violations.
    #[must_use]
    pub fn failure(message: impl Into<String>, errors: Vec<FieldViolation>) -> Self {
        Self {
            success: false,
            errors,
            ..Self::message(message)
        }
    }
}
