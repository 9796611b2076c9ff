use crate::model::list::TaskList;
use crate::model::task::{Deadline, Task, TaskStatus};
use crate::parse::deadline::sort_key;
use crate::parse::task_parser::FIELD_DELIMITER;

/// Error type for task operations
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum TaskError {
    /// Holds the 0-based index; displayed 1-based
    #[error("no task at position {}", .0 + 1)]
    PositionOutOfRange(usize),
    #[error("task text cannot be empty")]
    EmptyText,
    #[error("task text cannot contain '|' or line breaks: {0:?}")]
    InvalidText(String),
}

/// Check that `text` can be stored in the task file
pub fn check_text(text: &str) -> Result<(), TaskError> {
    if text.contains(FIELD_DELIMITER) || text.contains('\n') || text.contains('\r') {
        return Err(TaskError::InvalidText(text.to_string()));
    }
    Ok(())
}

fn check_position(list: &TaskList, position: usize) -> Result<(), TaskError> {
    if position >= list.len() {
        return Err(TaskError::PositionOutOfRange(position));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// CRUD
// ---------------------------------------------------------------------------

/// Append a new `empty` task and re-sort. Returns the task's position after
/// sorting.
///
/// Text is trimmed: the task file loader trims each line, so leading
/// whitespace would not survive a reload.
pub fn add_task(list: &mut TaskList, text: String, deadline: Deadline) -> Result<usize, TaskError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(TaskError::EmptyText);
    }
    check_text(text)?;
    list.tasks.push(Task::new(text, deadline));
    let last = list.len() - 1;
    Ok(sort_tracking(list, last))
}

/// Remove the task at `position`. No-op (returns `None`) when nothing is
/// selected or the position is past the end.
pub fn remove_task(list: &mut TaskList, position: Option<usize>) -> Option<Task> {
    let position = position?;
    if position >= list.len() {
        return None;
    }
    Some(list.tasks.remove(position))
}

/// Edit a task in place and re-sort. New text is trimmed, and an empty or
/// whitespace-only `new_text` leaves the text alone; `None` for either
/// field keeps the current value. Returns the
/// task's position after sorting.
pub fn edit_task(
    list: &mut TaskList,
    position: usize,
    new_text: Option<String>,
    new_deadline: Option<Deadline>,
) -> Result<usize, TaskError> {
    check_position(list, position)?;
    let new_text = new_text
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty());
    if let Some(text) = &new_text {
        check_text(text)?;
    }

    let task = &mut list.tasks[position];
    if let Some(text) = new_text {
        task.text = text;
    }
    if let Some(deadline) = new_deadline {
        task.deadline = deadline;
    }
    Ok(sort_tracking(list, position))
}

/// Advance a task's status: empty → tick → cross → empty.
pub fn toggle_status(list: &mut TaskList, position: usize) -> Result<TaskStatus, TaskError> {
    check_position(list, position)?;
    let task = &mut list.tasks[position];
    task.status = task.status.next();
    Ok(task.status)
}

// ---------------------------------------------------------------------------
// Ordering
// ---------------------------------------------------------------------------

/// Relocate the task at `from` to `to`, shifting the tasks in between.
/// Does not re-sort: a manual move overrides deadline order.
pub fn move_task(list: &mut TaskList, from: usize, to: usize) -> Result<(), TaskError> {
    check_position(list, from)?;
    check_position(list, to)?;
    if from != to {
        let task = list.tasks.remove(from);
        list.tasks.insert(to, task);
    }
    Ok(())
}

/// Stable sort by deadline, earliest first. Unset and unparseable deadlines
/// go last in their existing order.
pub fn sort_by_deadline(list: &mut TaskList) {
    list.tasks.sort_by_key(|t| sort_key(&t.deadline));
}

/// Sort, following the task that started at `tracked` to its new position.
fn sort_tracking(list: &mut TaskList, tracked: usize) -> usize {
    let mut indexed: Vec<(usize, Task)> = list.tasks.drain(..).enumerate().collect();
    indexed.sort_by_key(|(_, t)| sort_key(&t.deadline));
    let new_pos = indexed
        .iter()
        .position(|(i, _)| *i == tracked)
        .unwrap_or(tracked);
    list.tasks = indexed.into_iter().map(|(_, t)| t).collect();
    new_pos
}
