use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Task completion status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    #[default]
    Empty,
    Tick,
    Cross,
}

impl TaskStatus {
    /// The word stored in the task file
    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Empty => "empty",
            TaskStatus::Tick => "tick",
            TaskStatus::Cross => "cross",
        }
    }

    /// Parse a stored status word
    pub fn parse_status(s: &str) -> Option<TaskStatus> {
        match s {
            "empty" => Some(TaskStatus::Empty),
            "tick" => Some(TaskStatus::Tick),
            "cross" => Some(TaskStatus::Cross),
            _ => None,
        }
    }

    /// Checkbox symbol shown in lists
    pub fn symbol(self) -> &'static str {
        match self {
            TaskStatus::Empty => "[ ]",
            TaskStatus::Tick => "[✔]",
            TaskStatus::Cross => "[✖]",
        }
    }

    /// Next status in the cycle: empty → tick → cross → empty
    pub fn next(self) -> TaskStatus {
        match self {
            TaskStatus::Empty => TaskStatus::Tick,
            TaskStatus::Tick => TaskStatus::Cross,
            TaskStatus::Cross => TaskStatus::Empty,
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A task deadline.
///
/// `Unparsed` only ever comes from a damaged task file; it is kept verbatim
/// so saving the list does not destroy what the user wrote.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Deadline {
    /// `=`: no deadline, sorts last
    #[default]
    Unset,
    /// `YYYY-MM-DD`
    Date(NaiveDate),
    /// `YYYY-MM-DD HH:MM`
    DateTime(NaiveDateTime),
    /// Anything else found on disk
    Unparsed(String),
}

impl Deadline {
    pub fn is_unset(&self) -> bool {
        matches!(self, Deadline::Unset)
    }
}

impl fmt::Display for Deadline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Deadline::Unset => f.write_str(crate::parse::deadline::UNSET_MARKER),
            Deadline::Date(d) => write!(f, "{}", d.format(crate::parse::deadline::DATE_FORMAT)),
            Deadline::DateTime(dt) => {
                write!(f, "{}", dt.format(crate::parse::deadline::DATE_TIME_FORMAT))
            }
            Deadline::Unparsed(raw) => f.write_str(raw),
        }
    }
}

impl Serialize for Deadline {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A single to-do entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Task {
    /// Task description
    pub text: String,
    pub status: TaskStatus,
    pub deadline: Deadline,
}

impl Task {
    /// Create a new task with `empty` status
    pub fn new(text: impl Into<String>, deadline: Deadline) -> Self {
        Task {
            text: text.into(),
            status: TaskStatus::Empty,
            deadline,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_cycles_through_three_states() {
        for start in [TaskStatus::Empty, TaskStatus::Tick, TaskStatus::Cross] {
            assert_eq!(start.next().next().next(), start);
            assert_ne!(start.next(), start);
        }
        assert_eq!(TaskStatus::Empty.next(), TaskStatus::Tick);
        assert_eq!(TaskStatus::Tick.next(), TaskStatus::Cross);
        assert_eq!(TaskStatus::Cross.next(), TaskStatus::Empty);
    }

    #[test]
    fn status_words_round_trip() {
        for s in [TaskStatus::Empty, TaskStatus::Tick, TaskStatus::Cross] {
            assert_eq!(TaskStatus::parse_status(s.as_str()), Some(s));
        }
        assert_eq!(TaskStatus::parse_status("done"), None);
        assert_eq!(TaskStatus::parse_status("Tick"), None);
    }

    #[test]
    fn deadline_display() {
        let d = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        assert_eq!(Deadline::Date(d).to_string(), "2024-01-05");
        let dt = d.and_hms_opt(9, 30, 0).unwrap();
        assert_eq!(Deadline::DateTime(dt).to_string(), "2024-01-05 09:30");
        assert_eq!(Deadline::Unset.to_string(), "=");
        assert_eq!(Deadline::Unparsed("soon".into()).to_string(), "soon");
    }

    #[test]
    fn task_serializes_deadline_as_string() {
        let task = Task::new("Buy milk", Deadline::Unset);
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["text"], "Buy milk");
        assert_eq!(json["status"], "empty");
        assert_eq!(json["deadline"], "=");
    }
}
