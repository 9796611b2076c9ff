use std::path::PathBuf;

use super::config::Config;
use super::list::TaskList;

/// A loaded working directory: config plus the task list read from disk
#[derive(Debug)]
pub struct Workspace {
    /// Directory the task file and config live in
    pub root: PathBuf,
    /// Resolved path of the task file
    pub task_file: PathBuf,
    /// Parsed tickoff.toml (defaults if absent)
    pub config: Config,
    pub list: TaskList,
    /// Non-blank lines dropped while loading
    pub dropped: Vec<String>,
    /// Task file contents as last read or written by this process
    pub on_disk: String,
}

impl Workspace {
    /// Directory holding the task file (home of the lock, state and recovery files)
    pub fn data_dir(&self) -> PathBuf {
        self.task_file
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| self.root.clone())
    }
}
