use crate::model::task::{Task, TaskStatus};
use crate::parse::deadline::deadline_from_stored;

/// Field delimiter in the task file
pub const FIELD_DELIMITER: char = '|';

/// Parse the task file.
///
/// Each line is trimmed and split on `|`; only lines with exactly three
/// fields (`text|status|deadline`) become tasks. Returns the tasks plus the
/// non-blank lines that were dropped. An unknown status word reads as
/// `empty`, and an unparseable deadline is kept verbatim.
pub fn parse_tasks(source: &str) -> (Vec<Task>, Vec<String>) {
    let mut tasks = Vec::new();
    let mut dropped = Vec::new();

    for line in source.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        match parse_task_line(trimmed) {
            Some(task) => tasks.push(task),
            None => dropped.push(line.to_string()),
        }
    }

    (tasks, dropped)
}

/// Parse a single trimmed line, or `None` if it does not have three fields
pub fn parse_task_line(line: &str) -> Option<Task> {
    let fields: Vec<&str> = line.split(FIELD_DELIMITER).collect();
    let [text, status, deadline] = fields.as_slice() else {
        return None;
    };
    Some(Task {
        text: text.to_string(),
        status: TaskStatus::parse_status(status).unwrap_or_default(),
        deadline: deadline_from_stored(deadline),
    })
}
