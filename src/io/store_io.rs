use std::fs;
use std::path::{Path, PathBuf};

use crate::io::config_io::{self, ConfigError};
use crate::io::recovery::{self, RecoveryCategory, RecoveryEntry};
use crate::model::config::Config;
use crate::model::list::TaskList;
use crate::model::workspace::Workspace;
use crate::parse::{parse_tasks, serialize_tasks};

/// Error type for task file I/O
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not write {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Resolve the task file: an explicit override wins, then `[store] file`
/// from config. Relative paths are taken from `root`.
pub fn resolve_task_file(root: &Path, config: &Config, file_override: Option<&Path>) -> PathBuf {
    let file = file_override
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(&config.store.file));
    if file.is_absolute() {
        file
    } else {
        root.join(file)
    }
}

/// Raw task file contents. A missing file reads as empty.
pub fn read_source(path: &Path) -> Result<String, StoreError> {
    match fs::read_to_string(path) {
        Ok(t) => Ok(t),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(String::new()),
        Err(e) => Err(StoreError::ReadError {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Read the task file. A missing file is an empty list. Returns the tasks
/// and any non-blank lines that did not have three fields.
pub fn load_tasks(path: &Path) -> Result<(TaskList, Vec<String>), StoreError> {
    let (tasks, dropped) = parse_tasks(&read_source(path)?);
    Ok((TaskList::new(tasks), dropped))
}

/// Overwrite the task file with the whole list. A failed write is logged to
/// the recovery log with the content that could not be saved.
pub fn save_tasks(path: &Path, list: &TaskList) -> Result<(), StoreError> {
    let content = serialize_tasks(&list.tasks);
    if let Err(e) = recovery::atomic_write(path, content.as_bytes()) {
        let data_dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        recovery::log_recovery(
            data_dir,
            RecoveryEntry::new(RecoveryCategory::Write, "task file write failed")
                .field("Target", path.display().to_string())
                .field("Error", e.to_string())
                .body(content),
        );
        return Err(StoreError::WriteError {
            path: path.to_path_buf(),
            source: e,
        });
    }
    Ok(())
}

/// Load config and tasks for the working directory `root`.
pub fn open_workspace(root: &Path, file_override: Option<&Path>) -> Result<Workspace, StoreError> {
    let config = config_io::read_config(root)?;
    let task_file = resolve_task_file(root, &config, file_override);
    let on_disk = read_source(&task_file)?;
    let (tasks, dropped) = parse_tasks(&on_disk);
    Ok(Workspace {
        root: root.to_path_buf(),
        task_file,
        config,
        list: TaskList::new(tasks),
        dropped,
        on_disk,
    })
}

/// Re-read the task file into an open workspace (after an outside change).
pub fn reload_workspace(ws: &mut Workspace) -> Result<(), StoreError> {
    let on_disk = read_source(&ws.task_file)?;
    let (tasks, dropped) = parse_tasks(&on_disk);
    ws.list = TaskList::new(tasks);
    ws.dropped = dropped;
    ws.on_disk = on_disk;
    Ok(())
}

/// True when the task file no longer holds what this workspace last read
/// or wrote, i.e. another process has written it since.
pub fn changed_on_disk(ws: &Workspace) -> Result<bool, StoreError> {
    Ok(read_source(&ws.task_file)? != ws.on_disk)
}

/// Write the workspace's list to disk. Lines dropped at load time are lost
/// from the task file here, so they go to the recovery log first.
pub fn save_workspace(ws: &mut Workspace) -> Result<(), StoreError> {
    if !ws.dropped.is_empty() {
        let source_name = ws
            .task_file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        recovery::log_dropped_lines(&ws.data_dir(), &source_name, &ws.dropped);
        ws.dropped.clear();
    }
    save_tasks(&ws.task_file, &ws.list)?;
    ws.on_disk = serialize_tasks(&ws.list.tasks);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::task::{Deadline, Task, TaskStatus};
    use crate::parse::parse_deadline;
    use tempfile::TempDir;

    #[test]
    fn missing_file_is_empty_list() {
        let tmp = TempDir::new().unwrap();
        let (list, dropped) = load_tasks(&tmp.path().join("tasks.txt")).unwrap();
        assert!(list.is_empty());
        assert!(dropped.is_empty());
    }

    #[test]
    fn save_then_load() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("tasks.txt");
        let mut done = Task::new("Pay rent", parse_deadline("2024-02-01").unwrap());
        done.status = TaskStatus::Tick;
        let list = TaskList::new(vec![done, Task::new("Read", Deadline::Unset)]);

        save_tasks(&path, &list).unwrap();
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "Pay rent|tick|2024-02-01\nRead|empty|=\n"
        );
        let (loaded, _) = load_tasks(&path).unwrap();
        assert_eq!(loaded, list);
    }

    #[test]
    fn write_into_missing_dir_fails_and_is_logged() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nope").join("tasks.txt");
        let err = save_tasks(&path, &TaskList::default()).unwrap_err();
        assert!(matches!(err, StoreError::WriteError { .. }));
    }

    #[test]
    fn resolve_prefers_override() {
        let root = Path::new("/work");
        let mut config = Config::default();
        assert_eq!(
            resolve_task_file(root, &config, None),
            PathBuf::from("/work/tasks.txt")
        );
        config.store.file = "lists/home.txt".into();
        assert_eq!(
            resolve_task_file(root, &config, None),
            PathBuf::from("/work/lists/home.txt")
        );
        assert_eq!(
            resolve_task_file(root, &config, Some(Path::new("/tmp/x.txt"))),
            PathBuf::from("/tmp/x.txt")
        );
    }

    #[test]
    fn dropped_lines_are_logged_on_first_save() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("tasks.txt"),
            "A|empty|2024-01-01\nBROKEN_LINE\nB|tick|=\n",
        )
        .unwrap();

        let mut ws = open_workspace(tmp.path(), None).unwrap();
        assert_eq!(ws.list.len(), 2);
        assert_eq!(ws.dropped, vec!["BROKEN_LINE"]);
        assert!(!recovery::recovery_log_path(tmp.path()).exists());

        save_workspace(&mut ws).unwrap();
        assert!(ws.dropped.is_empty());
        let entries = recovery::read_recovery_entries(tmp.path(), None, None);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].body, "BROKEN_LINE");
        assert_eq!(
            fs::read_to_string(tmp.path().join("tasks.txt")).unwrap(),
            "A|empty|2024-01-01\nB|tick|=\n"
        );

        // second save has nothing more to log
        save_workspace(&mut ws).unwrap();
        assert_eq!(recovery::read_recovery_entries(tmp.path(), None, None).len(), 1);
    }

    #[test]
    fn reload_picks_up_outside_changes() {
        let tmp = TempDir::new().unwrap();
        let mut ws = open_workspace(tmp.path(), None).unwrap();
        assert!(ws.list.is_empty());
        fs::write(&ws.task_file, "Outside|cross|=\n").unwrap();
        reload_workspace(&mut ws).unwrap();
        assert_eq!(ws.list.tasks[0].text, "Outside");
        assert_eq!(ws.list.tasks[0].status, TaskStatus::Cross);
    }

    #[test]
    fn outside_write_is_detected_until_reload() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("tasks.txt");
        fs::write(&path, "A|empty|=\n").unwrap();

        let mut ws = open_workspace(tmp.path(), None).unwrap();
        assert!(!changed_on_disk(&ws).unwrap());

        fs::write(&path, "A|empty|=\nB|tick|=\n").unwrap();
        assert!(changed_on_disk(&ws).unwrap());

        reload_workspace(&mut ws).unwrap();
        assert!(!changed_on_disk(&ws).unwrap());
        assert_eq!(ws.list.len(), 2);

        // Our own save is not an outside change
        ws.list.tasks.pop();
        save_workspace(&mut ws).unwrap();
        assert!(!changed_on_disk(&ws).unwrap());
    }

    #[test]
    fn missing_file_matches_empty_snapshot() {
        let tmp = TempDir::new().unwrap();
        let ws = open_workspace(tmp.path(), None).unwrap();
        assert_eq!(ws.on_disk, "");
        assert!(!changed_on_disk(&ws).unwrap());
    }
}
