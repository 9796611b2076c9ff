use serde::Serialize;

use crate::model::task::{Deadline, Task, TaskStatus};

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct TaskJson {
    /// 1-based position, as accepted by the write commands
    pub position: usize,
    pub text: String,
    pub status: TaskStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline: Option<String>,
    /// Set when a stored deadline does not parse (sorts last)
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub invalid_deadline: bool,
}

pub fn task_to_json(index: usize, task: &Task) -> TaskJson {
    TaskJson {
        position: index + 1,
        text: task.text.clone(),
        status: task.status,
        deadline: (!task.deadline.is_unset()).then(|| task.deadline.to_string()),
        invalid_deadline: matches!(task.deadline, Deadline::Unparsed(_)),
    }
}

// ---------------------------------------------------------------------------
// Human-readable formatting
// ---------------------------------------------------------------------------

/// One task per line: `  2  [✔] Call Bob  2024-01-01`
pub fn format_task_line(index: usize, task: &Task, pos_width: usize) -> String {
    let mut line = format!(
        "{:>w$}  {} {}",
        index + 1,
        task.status.symbol(),
        task.text,
        w = pos_width
    );
    match &task.deadline {
        Deadline::Unset => {}
        Deadline::Unparsed(raw) => line.push_str(&format!("  {} (invalid)", raw)),
        d => line.push_str(&format!("  {}", d)),
    }
    line
}

/// Format a whole list; positions are right-aligned to the widest number.
pub fn format_task_list<'a>(tasks: impl IntoIterator<Item = (usize, &'a Task)>) -> Vec<String> {
    let tasks: Vec<(usize, &Task)> = tasks.into_iter().collect();
    let max_pos = tasks.iter().map(|(i, _)| i + 1).max().unwrap_or(1);
    let width = max_pos.to_string().len();
    tasks
        .into_iter()
        .map(|(i, t)| format_task_line(i, t, width))
        .collect()
}
