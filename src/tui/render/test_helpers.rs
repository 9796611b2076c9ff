use std::path::PathBuf;

use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;
use tempfile::TempDir;

use crate::io::store_io;
use crate::model::config::Config;
use crate::model::list::TaskList;
use crate::model::workspace::Workspace;
use crate::parse::parse_tasks;
use crate::tui::app::App;

pub const TERM_W: u16 = 80;
pub const TERM_H: u16 = 24;

/// Three tasks already in deadline order, the first one ticked.
pub const SAMPLE_TASKS: &str = "\
Call Bob|tick|2024-01-01
Buy milk|empty|2024-01-05
Read a book|empty|=
";

/// Render into an in-memory buffer and return plain text (no styles).
pub fn render_to_string<F>(w: u16, h: u16, f: F) -> String
where
    F: FnOnce(&mut ratatui::Frame, Rect),
{
    let backend = TestBackend::new(w, h);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| {
            let area = frame.area();
            f(frame, area);
        })
        .unwrap();

    let buf = terminal.backend().buffer().clone();
    let w = buf.area.width as usize;
    let lines: Vec<String> = buf
        .content
        .chunks(w)
        .map(|row| {
            let s: String = row.iter().map(|cell| cell.symbol()).collect();
            s.trim_end().to_string()
        })
        .collect();

    // Trim trailing blank lines
    let end = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(0, |i| i + 1);
    lines[..end].join("\n")
}

/// An App over an in-memory list. Nothing is written unless a test saves.
pub fn app_with_tasks(source: &str) -> App {
    let (tasks, dropped) = parse_tasks(source);
    let root = PathBuf::from("/tmp/tickoff-test");
    App::new(Workspace {
        task_file: root.join("tasks.txt"),
        root,
        config: Config::default(),
        list: TaskList::new(tasks),
        dropped,
        on_disk: source.to_string(),
    })
}

/// An App over a real tasks.txt in a temp dir, for tests that save.
pub fn app_on_disk(source: &str) -> (TempDir, App) {
    let tmp = TempDir::new().unwrap();
    if !source.is_empty() {
        std::fs::write(tmp.path().join("tasks.txt"), source).unwrap();
    }
    let workspace = store_io::open_workspace(tmp.path(), None).unwrap();
    (tmp, App::new(workspace))
}

pub fn read_task_file(tmp: &TempDir) -> String {
    std::fs::read_to_string(tmp.path().join("tasks.txt")).unwrap_or_default()
}
