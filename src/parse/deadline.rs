use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveDateTime};
use regex::Regex;

use crate::model::task::Deadline;

/// Marker stored for "no deadline"
pub const UNSET_MARKER: &str = "=";
pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

// chrono alone accepts unpadded fields like `2024-1-5`, so the shape is pinned first.
static DATE_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("date shape regex"));
static DATE_TIME_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2} \d{2}:\d{2}$").expect("date-time shape regex")
});

/// Rejected deadline input
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid deadline '{input}': use YYYY-MM-DD, YYYY-MM-DD HH:MM, or =")]
pub struct DeadlineError {
    pub input: String,
}

/// Parse user input into a deadline. Accepts exactly `=`, `YYYY-MM-DD`,
/// or `YYYY-MM-DD HH:MM`; calendar-invalid dates are rejected too.
pub fn parse_deadline(input: &str) -> Result<Deadline, DeadlineError> {
    let err = || DeadlineError {
        input: input.to_string(),
    };

    if input == UNSET_MARKER {
        return Ok(Deadline::Unset);
    }
    if DATE_SHAPE.is_match(input) {
        return NaiveDate::parse_from_str(input, DATE_FORMAT)
            .map(Deadline::Date)
            .map_err(|_| err());
    }
    if DATE_TIME_SHAPE.is_match(input) {
        return NaiveDateTime::parse_from_str(input, DATE_TIME_FORMAT)
            .map(Deadline::DateTime)
            .map_err(|_| err());
    }
    Err(err())
}

/// Read a deadline field from the task file. Never fails: anything that
/// does not parse is kept as `Unparsed`.
pub fn deadline_from_stored(raw: &str) -> Deadline {
    parse_deadline(raw).unwrap_or_else(|_| Deadline::Unparsed(raw.to_string()))
}

/// Sort key for deadline ordering. Unset and unparseable deadlines map to
/// the latest representable instant.
pub fn sort_key(deadline: &Deadline) -> NaiveDateTime {
    match deadline {
        Deadline::Date(d) => d.and_time(chrono::NaiveTime::MIN),
        Deadline::DateTime(dt) => *dt,
        Deadline::Unset | Deadline::Unparsed(_) => NaiveDateTime::MAX,
    }
}
