use crossterm::event::{KeyCode, KeyEvent};

use crate::ops::task_ops;
use crate::tui::app::{App, Mode};

/// Enter MOVE mode for the task under the cursor.
pub(super) fn enter_move_mode(app: &mut App) {
    if let Some(index) = app.selected() {
        app.move_origin = Some(index);
        app.mode = Mode::Move;
    }
}

pub(super) fn handle_move(app: &mut App, key: KeyEvent) {
    match key.code {
        // Confirm
        KeyCode::Enter | KeyCode::Char('m') => {
            let origin = app.move_origin.take();
            app.mode = Mode::Navigate;
            if origin.is_some_and(|o| o != app.cursor) {
                app.save();
            }
        }
        // Cancel: put the task back
        KeyCode::Esc => {
            if let Some(origin) = app.move_origin.take() {
                let _ = task_ops::move_task(&mut app.workspace.list, app.cursor, origin);
                app.cursor = origin;
            }
            app.mode = Mode::Navigate;
        }
        KeyCode::Char('j') | KeyCode::Down => {
            let to = app.cursor + 1;
            shift_selected(app, to);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            if let Some(to) = app.cursor.checked_sub(1) {
                shift_selected(app, to);
            }
        }
        KeyCode::Char('g') | KeyCode::Home => shift_selected(app, 0),
        KeyCode::Char('G') | KeyCode::End => {
            let last = app.task_count().saturating_sub(1);
            shift_selected(app, last);
        }
        _ => {}
    }
}

/// Move the selected task to `to`, in memory only. Saved on confirm.
fn shift_selected(app: &mut App, to: usize) {
    if task_ops::move_task(&mut app.workspace.list, app.cursor, to).is_ok() {
        app.cursor = to;
    }
}
