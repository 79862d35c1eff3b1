//! Field constraint checks shared by the issue and todo lifecycles.
//!
//! Checks accumulate into [`Violations`] instead of failing fast, so a caller
//! always learns about every offending field in one response.

use super::{FieldViolation, ParseLifecycleValueError, ValidationError};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Maximum issue title length in characters.
pub const ISSUE_TITLE_MAX_CHARS: usize = 200;
/// Maximum issue description length in characters.
pub const ISSUE_DESCRIPTION_MAX_CHARS: usize = 2000;
/// Maximum todo title length in characters.
pub const TODO_TITLE_MAX_CHARS: usize = 200;
/// Maximum todo description length in characters.
pub const TODO_DESCRIPTION_MAX_CHARS: usize = 1000;

/// Attribution used when a caller does not name who created or assigned a
/// record.
pub const SYSTEM_ACTOR: &str = "system";

/// Closed set of lowercase wire values backing a lifecycle enum.
pub trait WireValue: Sized + Copy + 'static {
    /// Human-readable name used in error messages.
    const KIND: &'static str;
    /// Every variant, in declaration order.
    const VALUES: &'static [Self];

    /// Returns the canonical wire representation.
    fn as_str(self) -> &'static str;

    /// Parses an exact wire value.
    ///
    /// # Errors
    ///
    /// Returns [`ParseLifecycleValueError`] when `value` is not one of
    /// [`Self::VALUES`]. Matching is case-sensitive.
    fn parse_wire(value: &str) -> Result<Self, ParseLifecycleValueError> {
        Self::VALUES
            .iter()
            .copied()
            .find(|candidate| candidate.as_str() == value)
            .ok_or_else(|| ParseLifecycleValueError {
                kind: Self::KIND,
                value: value.to_owned(),
            })
    }

    /// Returns the allowed values joined for error messages.
    #[must_use]
    fn allowed() -> String {
        Self::VALUES
            .iter()
            .map(|value| value.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Implements `TryFrom<&str>` and `Display` for [`WireValue`] enums.
macro_rules! wire_conversions {
    ($($ty:ty),+ $(,)?) => {$(
        impl TryFrom<&str> for $ty {
            type Error = $crate::tracker::domain::ParseLifecycleValueError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                <Self as $crate::tracker::domain::WireValue>::parse_wire(value)
            }
        }

        impl ::std::fmt::Display for $ty {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str($crate::tracker::domain::WireValue::as_str(*self))
            }
        }
    )+};
}

pub(super) use wire_conversions;

/// Accumulator for field violations.
#[derive(Debug, Default)]
pub struct Violations {
    found: Vec<FieldViolation>,
}

impl Violations {
    /// Creates an empty accumulator.
    #[must_use]
    pub const fn new() -> Self {
        Self { found: Vec::new() }
    }

    /// Records a violation.
    pub fn push(&mut self, field: &str, message: impl Into<String>) {
        self.found.push(FieldViolation::new(field, message));
    }

    /// Returns `true` when nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.found.is_empty()
    }

    /// Checks that an already-trimmed value is present.
    ///
    /// Returns `true` when the value is non-empty.
    pub fn required(&mut self, field: &str, value: &str) -> bool {
        if value.is_empty() {
            self.push(field, format!("{field} is required"));
            return false;
        }
        true
    }

    /// Checks a required, already-trimmed text value with a length limit.
    pub fn required_text(&mut self, field: &str, value: &str, max_chars: usize) {
        if self.required(field, value) {
            self.max_chars(field, value, max_chars);
        }
    }

    /// Checks an optional, already-trimmed text value.
    pub fn optional_text(&mut self, field: &str, value: Option<&str>, max_chars: usize) {
        if let Some(text) = value {
            self.max_chars(field, text, max_chars);
        }
    }

    fn max_chars(&mut self, field: &str, value: &str, max_chars: usize) {
        if value.chars().count() > max_chars {
            self.push(
                field,
                format!("{field} must be at most {max_chars} characters"),
            );
        }
    }

    /// Parses an optional enum value, recording a violation when it is not a
    /// member of the enum.
    pub fn wire_value<T: WireValue>(&mut self, field: &str, raw: Option<&str>) -> Option<T> {
        let parsed = T::parse_wire(raw?).ok();
        if parsed.is_none() {
            self.push(field, format!("{field} must be one of: {}", T::allowed()));
        }
        parsed
    }

    /// Parses an optional timestamp, recording a violation when malformed.
    pub fn timestamp(&mut self, field: &str, raw: Option<&str>) -> Option<DateTime<Utc>> {
        let value = raw?;
        let parsed = parse_timestamp(value);
        if parsed.is_none() {
            self.push(field, format!("valid {field} is required"));
        }
        parsed
    }

    /// Converts the accumulator into a result.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] carrying every recorded violation.
    pub fn finish(self) -> Result<(), ValidationError> {
        if self.found.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::new(self.found))
        }
    }
}

/// Trims text input; blank values become `None`.
#[must_use]
pub fn normalize_text(value: Option<String>) -> Option<String> {
    value.and_then(|raw| {
        let trimmed = raw.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_owned())
    })
}

/// Parses an ISO 8601 timestamp.
///
/// Accepts RFC 3339 timestamps with an offset, naive date-times (read as UTC)
/// and calendar dates (midnight UTC).
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let value = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
