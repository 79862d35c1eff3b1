//! Error types for lifecycle validation and enum parsing.

use serde::Serialize;
use thiserror::Error;

/// A single failed field constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    field: String,
    message: String,
}

impl FieldViolation {
    /// Creates a violation for `field`.
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Returns the wire name of the offending field.
    #[must_use]
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Returns the human-readable reason.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// One or more field constraints were violated.
///
/// Always carries the complete list of violations found in a request; a
/// request that produces this error is never partially applied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("validation failed: {}", format_violations(.violations))]
pub struct ValidationError {
    violations: Vec<FieldViolation>,
}

fn format_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(|violation| format!("{}: {}", violation.field, violation.message))
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationError {
    /// Creates an error from collected violations.
    #[must_use]
    pub const fn new(violations: Vec<FieldViolation>) -> Self {
        Self { violations }
    }

    /// Creates an error with a single violation.
    #[must_use]
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(vec![FieldViolation::new(field, message)])
    }

    /// Returns every violation.
    #[must_use]
    pub fn violations(&self) -> &[FieldViolation] {
        &self.violations
    }

    /// Returns `true` when `field` is among the violations.
    #[must_use]
    pub fn has_field(&self, field: &str) -> bool {
        self.violations.iter().any(|violation| violation.field == field)
    }
}

/// Error returned when a stored or supplied enum value is not recognised.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown {kind}: {value}")]
pub struct ParseLifecycleValueError {
    /// Name of the enum being parsed.
    pub kind: &'static str,
    /// Rejected raw value.
    pub value: String,
}
