use crate::model::task::Task;
use crate::parse::task_parser::FIELD_DELIMITER;

/// Serialize one task as `text|status|deadline` (no newline)
pub fn serialize_task(task: &Task) -> String {
    format!(
        "{}{d}{}{d}{}",
        task.text,
        task.status,
        task.deadline,
        d = FIELD_DELIMITER
    )
}

/// Serialize the whole list, one line per task, each newline-terminated
pub fn serialize_tasks(tasks: &[Task]) -> String {
    let mut out = String::new();
    for task in tasks {
        out.push_str(&serialize_task(task));
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::task::{Deadline, TaskStatus};
    use crate::parse::task_parser::parse_tasks;
    use crate::parse::deadline::parse_deadline;

    #[test]
    fn field_order_is_text_status_deadline() {
        let mut task = Task::new("Call Bob", parse_deadline("2024-01-01 09:00").unwrap());
        task.status = TaskStatus::Cross;
        assert_eq!(serialize_task(&task), "Call Bob|cross|2024-01-01 09:00");
    }

    #[test]
    fn empty_list_is_empty_file() {
        assert_eq!(serialize_tasks(&[]), "");
    }

    #[test]
    fn load_of_save_is_identity() {
        let mut tick = Task::new("B", Deadline::Unset);
        tick.status = TaskStatus::Tick;
        let tasks = vec![
            Task::new("A", parse_deadline("2024-01-05").unwrap()),
            tick,
            Task::new("C with spaces", parse_deadline("2030-06-01 18:30").unwrap()),
        ];
        let (loaded, dropped) = parse_tasks(&serialize_tasks(&tasks));
        assert!(dropped.is_empty());
        assert_eq!(loaded, tasks);
    }

    #[test]
    fn unparsed_deadline_survives_save() {
        let (tasks, _) = parse_tasks("A|empty|someday\n");
        assert_eq!(serialize_tasks(&tasks), "A|empty|someday\n");
    }
}
