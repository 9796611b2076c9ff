use serde::Serialize;

use crate::model::task::{Deadline, TaskStatus};
use crate::parse::task_parser::{FIELD_DELIMITER, parse_task_line};

/// Structured result from `tick check`, suitable for --json output.
#[derive(Debug, Default, Serialize)]
pub struct CheckResult {
    pub valid: bool,
    pub errors: Vec<CheckError>,
    pub warnings: Vec<CheckWarning>,
}

/// Data that would be lost on the next load/save cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum CheckError {
    /// Line does not split into exactly three fields
    #[serde(rename = "malformed_line")]
    MalformedLine {
        line: usize,
        fields: usize,
        content: String,
    },
}

/// Data that loads but is not well-formed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum CheckWarning {
    /// Deadline is neither `=` nor a valid date; it sorts last
    #[serde(rename = "unparsed_deadline")]
    UnparsedDeadline {
        line: usize,
        text: String,
        deadline: String,
    },
    /// Status word is not empty/tick/cross; it reads as empty
    #[serde(rename = "unknown_status")]
    UnknownStatus {
        line: usize,
        text: String,
        status: String,
    },
}

/// Validate raw task-file contents. Line numbers are 1-based.
///
/// Read-only; mirrors exactly what loading would keep and drop.
pub fn check_source(source: &str) -> CheckResult {
    let mut result = CheckResult::default();

    for (idx, raw) in source.lines().enumerate() {
        let line = idx + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            continue;
        }

        let Some(task) = parse_task_line(trimmed) else {
            result.errors.push(CheckError::MalformedLine {
                line,
                fields: trimmed.split(FIELD_DELIMITER).count(),
                content: raw.to_string(),
            });
            continue;
        };

        let status_field = trimmed.split(FIELD_DELIMITER).nth(1).unwrap_or_default();
        if TaskStatus::parse_status(status_field).is_none() {
            result.warnings.push(CheckWarning::UnknownStatus {
                line,
                text: task.text.clone(),
                status: status_field.to_string(),
            });
        }

        if let Deadline::Unparsed(raw_deadline) = &task.deadline {
            result.warnings.push(CheckWarning::UnparsedDeadline {
                line,
                text: task.text.clone(),
                deadline: raw_deadline.clone(),
            });
        }
    }

    result.valid = result.errors.is_empty();
    result
}
