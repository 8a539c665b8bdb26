//! Activity domain model.
//!
//! # Responsibility
//! - Define the canonical activity record exchanged with the remote API.
//! - Provide date helpers used by list normalization and date grouping.
//!
//! # Invariants
//! - `id` is non-blank and never reused for another activity.
//! - `date` keeps the API's local ISO-8601 shape (`YYYY-MM-DDTHH:MM:SS`).
//!
//! # See also
//! - `store::grouping` for the calendar-day projection.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier of an activity.
///
/// The remote API treats ids as opaque strings; the client generates UUIDv4
/// text for new records.
pub type ActivityId = String;

const DATE_TIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"];
const DATE_ONLY_FORMAT: &str = "%Y-%m-%d";

/// Validation errors for activity records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivityValidationError {
    /// `id` is empty or whitespace only.
    EmptyId,
}

impl Display for ActivityValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyId => write!(f, "activity id must not be empty"),
        }
    }
}

impl Error for ActivityValidationError {}

/// Canonical activity record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub id: ActivityId,
    pub title: String,
    pub description: String,
    pub category: String,
    /// Local date/time text, e.g. `2020-01-02T10:00:00`.
    pub date: String,
    pub city: String,
    pub venue: String,
}

impl Activity {
    /// Creates an activity with a generated UUIDv4 id.
    ///
    /// Descriptive fields start empty; callers fill them before submitting.
    pub fn new(title: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            description: String::new(),
            category: String::new(),
            date: date.into(),
            city: String::new(),
            venue: String::new(),
        }
    }

    /// Creates an activity with a caller-provided id.
    ///
    /// # Errors
    /// - Returns `ActivityValidationError::EmptyId` for blank ids.
    pub fn with_id(
        id: impl Into<ActivityId>,
        title: impl Into<String>,
        date: impl Into<String>,
    ) -> Result<Self, ActivityValidationError> {
        let activity = Self {
            id: id.into(),
            ..Self::new(title, date)
        };
        activity.validate()?;
        Ok(activity)
    }

    /// Checks record-level invariants before the record leaves the client.
    pub fn validate(&self) -> Result<(), ActivityValidationError> {
        if self.id.trim().is_empty() {
            return Err(ActivityValidationError::EmptyId);
        }
        Ok(())
    }

    /// Drops any fractional-second or zone suffix from `date` in place.
    pub fn normalize_date(&mut self) {
        let normalized = normalize_date(&self.date).len();
        self.date.truncate(normalized);
    }

    /// Calendar-day key: the portion of `date` before the time separator.
    pub fn date_key(&self) -> &str {
        date_key(&self.date)
    }

    /// Parses `date` into a naive date/time.
    ///
    /// RFC 3339 input keeps its local wall-clock time and drops the offset,
    /// so the result always falls on the same day as `date_key()`. Returns
    /// `None` when the value matches none of the accepted shapes.
    pub fn parsed_date(&self) -> Option<NaiveDateTime> {
        parse_date(&self.date)
    }
}

/// Returns `value` up to (excluding) the first `.`.
///
/// The API emits values such as `2020-01-02T10:00:00.1234567`; everything
/// after the dot is discarded.
pub fn normalize_date(value: &str) -> &str {
    match value.find('.') {
        Some(index) => &value[..index],
        None => value,
    }
}

/// Returns `value` up to (excluding) the first `T`.
pub fn date_key(value: &str) -> &str {
    match value.find('T') {
        Some(index) => &value[..index],
        None => value,
    }
}

/// Parses the date shapes produced by the API and by the edit form.
pub fn parse_date(value: &str) -> Option<NaiveDateTime> {
    let trimmed = value.trim();
    for format in DATE_TIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(parsed);
        }
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(parsed.naive_local());
    }
    NaiveDate::parse_from_str(trimmed, DATE_ONLY_FORMAT)
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}
