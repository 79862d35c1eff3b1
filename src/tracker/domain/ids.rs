//! Identifier newtypes for issues and todos.

use super::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for an issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IssueId(Uuid);

impl IssueId {
    /// Creates a new random issue identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates an issue identifier from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the wrapped UUID.
    #[must_use]
    pub const fn into_inner(self) -> Uuid {
        self.0
    }

    /// Parses an identifier supplied by a caller.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] naming `field` when the value is not a
    /// UUID.
    pub fn parse(field: &str, value: &str) -> Result<Self, ValidationError> {
        parse_uuid(field, value).map(Self)
    }
}

impl Default for IssueId {
    fn default() -> Self {
        Self::new()
    }
}

impl AsRef<Uuid> for IssueId {
    fn as_ref(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for IssueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a todo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(Uuid);

impl TodoId {
    /// Creates a new random todo identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a todo identifier from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the wrapped UUID.
    #[must_use]
    pub const fn into_inner(self) -> Uuid {
        self.0
    }

    /// Parses an identifier supplied by a caller.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] naming `field` when the value is not a
    /// UUID.
    pub fn parse(field: &str, value: &str) -> Result<Self, ValidationError> {
        parse_uuid(field, value).map(Self)
    }
}

impl Default for TodoId {
    fn default() -> Self {
        Self::new()
    }
}

impl AsRef<Uuid> for TodoId {
    fn as_ref(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn parse_uuid(field: &str, value: &str) -> Result<Uuid, ValidationError> {
    Uuid::parse_str(value.trim())
        .map_err(|_| ValidationError::single(field, format!("'{value}' is not a valid id")))
}
