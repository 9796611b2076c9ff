use std::io;
use std::path::PathBuf;
use std::time::Duration;

use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;

use crate::io::lock::FileLock;
use crate::io::recovery::{self, RecoveryCategory, RecoveryEntry};
use crate::io::store_io;
use crate::io::watcher::TaskFileWatcher;
use crate::model::task::Task;
use crate::model::workspace::Workspace;
use crate::parse::serialize_tasks;

use super::input;
use super::render;
use super::theme::Theme;

/// How long a save waits for another `tick` process to release the lock
const SAVE_LOCK_TIMEOUT: Duration = Duration::from_millis(200);

/// Current interaction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Navigate,
    /// A text prompt is open (see `App::prompt`)
    Prompt,
    /// Waiting for y/n (see `App::confirm`)
    Confirm,
    /// Keyboard reordering of the selected task
    Move,
}

/// What a prompt is collecting, and what has been collected so far
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptKind {
    AddText,
    AddDeadline {
        text: String,
    },
    EditText {
        index: usize,
    },
    /// `text` is the replacement collected by the previous step, if any
    EditDeadline {
        index: usize,
        text: Option<String>,
    },
}

/// A single-line text prompt
#[derive(Debug, Clone)]
pub struct PromptState {
    pub kind: PromptKind,
    pub buffer: String,
    /// Byte offset into `buffer`
    pub cursor: usize,
    /// Shown under the input until the next submit
    pub error: Option<String>,
}

impl PromptState {
    pub fn new(kind: PromptKind, initial: impl Into<String>) -> Self {
        let buffer = initial.into();
        let cursor = buffer.len();
        PromptState {
            kind,
            buffer,
            cursor,
            error: None,
        }
    }

    pub fn title(&self) -> &'static str {
        match self.kind {
            PromptKind::AddText => "Add task",
            PromptKind::AddDeadline { .. } => "Deadline",
            PromptKind::EditText { .. } => "Edit task",
            PromptKind::EditDeadline { .. } => "Edit deadline",
        }
    }

    pub fn is_deadline(&self) -> bool {
        matches!(
            self.kind,
            PromptKind::AddDeadline { .. } | PromptKind::EditDeadline { .. }
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmAction {
    DeleteTask { index: usize },
}

#[derive(Debug, Clone)]
pub struct ConfirmState {
    pub message: String,
    pub action: ConfirmAction,
}

/// A left-button press that may turn into a drag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragState {
    /// Current index of the pressed task (follows it while dragging)
    pub index: usize,
    /// Set once the task has changed position
    pub moved: bool,
}

/// Main application state
pub struct App {
    pub workspace: Workspace,
    pub mode: Mode,
    pub should_quit: bool,
    pub theme: Theme,
    /// Selected row
    pub cursor: usize,
    /// First visible row
    pub scroll_offset: usize,
    pub prompt: Option<PromptState>,
    pub confirm: Option<ConfirmState>,
    /// Index the task had when move mode started
    pub move_origin: Option<usize>,
    pub drag: Option<DragState>,
    pub show_help: bool,
    pub status_message: Option<String>,
    pub status_is_error: bool,
    /// Screen area of the task rows, recorded on each render for mouse hit-testing
    pub list_area: Rect,
    /// The task file changed on disk while a reload was not safe
    pub pending_reload: bool,
}

impl App {
    pub fn new(workspace: Workspace) -> Self {
        let theme = Theme::from_config(&workspace.config.ui);
        let mut app = App {
            workspace,
            mode: Mode::Navigate,
            should_quit: false,
            theme,
            cursor: 0,
            scroll_offset: 0,
            prompt: None,
            confirm: None,
            move_origin: None,
            drag: None,
            show_help: false,
            status_message: None,
            status_is_error: false,
            list_area: Rect::default(),
            pending_reload: false,
        };
        app.report_dropped();
        app
    }

    pub fn task_count(&self) -> usize {
        self.workspace.list.len()
    }

    pub fn task(&self, index: usize) -> Option<&Task> {
        self.workspace.list.get(index)
    }

    /// The selected task's index, or None when the list is empty
    pub fn selected(&self) -> Option<usize> {
        (self.cursor < self.task_count()).then_some(self.cursor)
    }

    pub fn clamp_cursor(&mut self) {
        self.cursor = self.cursor.min(self.task_count().saturating_sub(1));
    }

    pub fn set_message(&mut self, msg: impl Into<String>) {
        self.status_message = Some(msg.into());
        self.status_is_error = false;
    }

    pub fn set_error(&mut self, msg: impl Into<String>) {
        self.status_message = Some(msg.into());
        self.status_is_error = true;
    }

    fn report_dropped(&mut self) {
        let n = self.workspace.dropped.len();
        if n > 0 {
            self.set_error(format!(
                "{} malformed line(s) ignored; they go to the recovery log on next save",
                n
            ));
        }
    }

    /// Write the list to disk. Failures are shown in the status row.
    ///
    /// Nothing is written when the file changed since it was last read:
    /// the in-memory list goes to the recovery log and the file is reloaded.
    pub fn save(&mut self) -> bool {
        let _lock = match FileLock::acquire(&self.workspace.data_dir(), SAVE_LOCK_TIMEOUT) {
            Ok(lock) => lock,
            Err(e) => {
                self.set_error(format!("not saved: {}", e));
                return false;
            }
        };

        match store_io::changed_on_disk(&self.workspace) {
            Ok(false) => {}
            Ok(true) => {
                self.discard_for_outside_change();
                return false;
            }
            Err(e) => {
                self.set_error(format!("save failed: {}", e));
                return false;
            }
        }

        let dropped = self.workspace.dropped.len();
        match store_io::save_workspace(&mut self.workspace) {
            Ok(()) => {
                if dropped > 0 {
                    self.set_error(format!(
                        "dropped {} malformed line(s); copied to the recovery log",
                        dropped
                    ));
                }
                true
            }
            Err(e) => {
                self.set_error(format!("save failed: {}", e));
                false
            }
        }
    }

    /// Another process wrote the task file: keep its version and record ours.
    fn discard_for_outside_change(&mut self) {
        recovery::log_recovery(
            &self.workspace.data_dir(),
            RecoveryEntry::new(
                RecoveryCategory::Write,
                "unsaved change: task file was changed by another process",
            )
            .field("Target", self.workspace.task_file.display().to_string())
            .body(serialize_tasks(&self.workspace.list.tasks)),
        );
        self.reload();
        self.set_error("task file changed on disk; reloaded, your change is in the recovery log");
    }

    /// Re-read the task file after an outside change
    pub fn reload(&mut self) {
        match store_io::reload_workspace(&mut self.workspace) {
            Ok(()) => {
                self.clamp_cursor();
                self.report_dropped();
            }
            Err(e) => self.set_error(format!("reload failed: {}", e)),
        }
        self.pending_reload = false;
    }

    /// Reloading is only safe when nothing holds an index into the list
    pub fn can_reload(&self) -> bool {
        self.mode == Mode::Navigate && self.drag.is_none()
    }

    /// Task index under a screen cell, if any
    pub fn row_at(&self, column: u16, row: u16) -> Option<usize> {
        let area = self.list_area;
        if column < area.x
            || column >= area.x + area.width
            || row < area.y
            || row >= area.y + area.height
        {
            return None;
        }
        let index = self.scroll_offset + (row - area.y) as usize;
        (index < self.task_count()).then_some(index)
    }
}

/// Restore cursor and scroll from .tickoff-state.json
pub fn restore_ui_state(app: &mut App) {
    use crate::io::state::read_ui_state;

    if let Some(state) = read_ui_state(&app.workspace.data_dir()) {
        app.cursor = state.cursor;
        app.scroll_offset = state.scroll_offset;
        app.clamp_cursor();
    }
}

/// Save cursor and scroll to .tickoff-state.json
pub fn save_ui_state(app: &App) {
    use crate::io::state::{UiState, write_ui_state};

    let state = UiState {
        cursor: app.cursor,
        scroll_offset: app.scroll_offset,
    };
    let _ = write_ui_state(&app.workspace.data_dir(), &state);
}

/// Run the TUI application
pub fn run(dir: Option<&str>, file: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let root = match dir {
        Some(dir) => std::fs::canonicalize(dir)
            .map_err(|e| format!("cannot resolve -C path '{}': {}", dir, e))?,
        None => std::env::current_dir()?,
    };
    let file = file.map(PathBuf::from);
    let workspace = store_io::open_workspace(&root, file.as_deref())?;
    let mouse = workspace.config.ui.mouse;

    let mut app = App::new(workspace);
    restore_ui_state(&mut app);

    let watcher = match TaskFileWatcher::start(&app.workspace.task_file) {
        Ok(w) => Some(w),
        Err(e) => {
            app.set_error(format!("not watching for outside changes: {}", e));
            None
        }
    };

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    if mouse {
        execute!(stdout, EnableMouseCapture)?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), DisableMouseCapture, LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, &mut app, watcher.as_ref());

    save_ui_state(&app);

    // Restore terminal
    disable_raw_mode()?;
    if mouse {
        execute!(terminal.backend_mut(), DisableMouseCapture)?;
    }
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    watcher: Option<&TaskFileWatcher>,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|frame| render::render(frame, app))?;

        if event::poll(Duration::from_millis(250))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    input::handle_key(app, key);
                }
                Event::Mouse(mouse) => input::handle_mouse(app, mouse),
                _ => {}
            }
        }

        if watcher.is_some_and(|w| w.poll_changed()) {
            app.pending_reload = true;
        }
        if app.pending_reload && app.can_reload() {
            app.reload();
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::render::test_helpers::*;

    #[test]
    fn dropped_lines_are_reported_on_open_and_save() {
        let (tmp, mut app) = app_on_disk("A|empty|=\nBROKEN_LINE\n");
        assert!(app.status_is_error);
        assert!(
            app.status_message
                .as_deref()
                .is_some_and(|m| m.starts_with("1 malformed line(s) ignored"))
        );

        assert!(app.save());
        assert_eq!(
            app.status_message.as_deref(),
            Some("dropped 1 malformed line(s); copied to the recovery log")
        );
        assert_eq!(read_task_file(&tmp), "A|empty|=\n");
        assert!(app.workspace.dropped.is_empty());
    }

    #[test]
    fn selected_is_none_on_empty_list() {
        let mut app = app_with_tasks("");
        assert_eq!(app.selected(), None);
        app.cursor = 5;
        app.clamp_cursor();
        assert_eq!(app.cursor, 0);
    }

    #[test]
    fn reload_waits_for_navigate_mode() {
        let (tmp, mut app) = app_on_disk(SAMPLE_TASKS);
        assert!(app.can_reload());

        app.mode = Mode::Move;
        assert!(!app.can_reload());
        app.mode = Mode::Navigate;
        app.drag = Some(DragState {
            index: 0,
            moved: false,
        });
        assert!(!app.can_reload());
        app.drag = None;

        std::fs::write(tmp.path().join("tasks.txt"), "Only one|empty|=\n").unwrap();
        app.cursor = 2;
        app.pending_reload = true;
        app.reload();
        assert!(!app.pending_reload);
        assert_eq!(app.task_count(), 1);
        assert_eq!(app.cursor, 0);
    }

    #[test]
    fn row_at_maps_screen_rows_to_tasks() {
        let mut app = app_with_tasks(SAMPLE_TASKS);
        app.list_area = Rect::new(0, 1, 40, 2);
        assert_eq!(app.row_at(3, 0), None); // title row
        assert_eq!(app.row_at(3, 1), Some(0));
        assert_eq!(app.row_at(3, 2), Some(1));
        assert_eq!(app.row_at(3, 3), None); // below the list
        assert_eq!(app.row_at(40, 1), None);

        app.scroll_offset = 1;
        assert_eq!(app.row_at(0, 2), Some(2));
    }

    #[test]
    fn ui_state_survives_restart() {
        let (tmp, mut app) = app_on_disk(SAMPLE_TASKS);
        app.cursor = 2;
        app.scroll_offset = 1;
        save_ui_state(&app);

        let workspace = store_io::open_workspace(tmp.path(), None).unwrap();
        let mut restored = App::new(workspace);
        restore_ui_state(&mut restored);
        assert_eq!(restored.cursor, 2);
        assert_eq!(restored.scroll_offset, 1);
    }

    #[test]
    fn save_keeps_outside_change_and_logs_ours() {
        let (tmp, mut app) = app_on_disk(SAMPLE_TASKS);
        let outside = format!("{}From CLI|empty|=\n", SAMPLE_TASKS);
        std::fs::write(tmp.path().join("tasks.txt"), &outside).unwrap();

        app.workspace.list.tasks[1].text = "Buy oat milk".into();
        assert!(!app.save());

        assert_eq!(read_task_file(&tmp), outside);
        assert_eq!(app.task_count(), 4);
        assert!(app.status_is_error);
        let entries = recovery::read_recovery_entries(tmp.path(), None, None);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].category, RecoveryCategory::Write);
        assert!(entries[0].body.contains("Buy oat milk|empty|2024-01-05"));

        // After the reload the next save goes through
        app.workspace.list.tasks[0].text = "Call Bob again".into();
        assert!(app.save());
        assert!(read_task_file(&tmp).starts_with("Call Bob again|tick|2024-01-01\n"));
        assert!(read_task_file(&tmp).contains("From CLI|empty|=\n"));
    }

    #[test]
    fn save_gives_up_quickly_when_locked() {
        let (tmp, mut app) = app_on_disk(SAMPLE_TASKS);
        let _held = FileLock::acquire_default(tmp.path()).unwrap();

        app.workspace.list.tasks[0].text = "Changed".into();
        let start = std::time::Instant::now();
        assert!(!app.save());
        assert!(start.elapsed() < Duration::from_secs(2));

        assert_eq!(read_task_file(&tmp), SAMPLE_TASKS);
        assert!(app.status_is_error);
        assert!(
            app.status_message
                .as_deref()
                .is_some_and(|m| m.starts_with("not saved:"))
        );
    }
}
