use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::ops::task_ops;
use crate::tui::app::{App, ConfirmAction, ConfirmState, Mode, PromptKind, PromptState};

use super::*;

pub(super) fn handle_navigate(app: &mut App, key: KeyEvent) {
    // Help overlay intercepts everything; ?, Esc or q close it
    if app.show_help {
        if matches!(
            key.code,
            KeyCode::Char('?') | KeyCode::Esc | KeyCode::Char('q')
        ) {
            app.show_help = false;
        }
        return;
    }

    // Clear any transient status message on keypress
    app.status_message = None;
    app.status_is_error = false;

    match (key.modifiers, key.code) {
        (KeyModifiers::CONTROL, KeyCode::Char('c')) | (_, KeyCode::Char('q')) => {
            app.should_quit = true;
        }
        (_, KeyCode::Char('j')) | (_, KeyCode::Down) => move_cursor(app, 1),
        (_, KeyCode::Char('k')) | (_, KeyCode::Up) => move_cursor(app, -1),
        (_, KeyCode::PageDown) => {
            let page = page_size(app);
            move_cursor(app, page);
        }
        (_, KeyCode::PageUp) => {
            let page = page_size(app);
            move_cursor(app, -page);
        }
        (_, KeyCode::Char('g')) | (_, KeyCode::Home) => app.cursor = 0,
        (_, KeyCode::Char('G')) | (_, KeyCode::End) => {
            app.cursor = app.task_count().saturating_sub(1);
        }
        (_, KeyCode::Char('a')) => begin_add(app),
        (_, KeyCode::Char('e')) | (_, KeyCode::Enter) => {
            if let Some(index) = app.selected() {
                begin_edit(app, index);
            }
        }
        (_, KeyCode::Char(' ')) | (_, KeyCode::Char('x')) => {
            if let Some(index) = app.selected() {
                toggle_at(app, index);
            }
        }
        (_, KeyCode::Char('d')) | (_, KeyCode::Delete) => request_delete(app),
        (_, KeyCode::Char('s')) | (_, KeyCode::Char('r')) => sort_list(app),
        (_, KeyCode::Char('m')) => enter_move_mode(app),
        (_, KeyCode::Char('?')) => app.show_help = true,
        _ => {}
    }
}

pub(super) fn move_cursor(app: &mut App, delta: isize) {
    let count = app.task_count();
    if count == 0 {
        return;
    }
    let target = (app.cursor as isize + delta).clamp(0, count as isize - 1);
    app.cursor = target as usize;
}

fn page_size(app: &App) -> isize {
    (app.list_area.height as isize).max(1)
}

pub(super) fn begin_add(app: &mut App) {
    app.prompt = Some(PromptState::new(PromptKind::AddText, ""));
    app.mode = Mode::Prompt;
}

/// Open the edit prompt for a task, starting from its current text.
pub(super) fn begin_edit(app: &mut App, index: usize) {
    let Some(task) = app.task(index) else {
        return;
    };
    let text = task.text.clone();
    app.cursor = index;
    app.prompt = Some(PromptState::new(PromptKind::EditText { index }, text));
    app.mode = Mode::Prompt;
}

pub(super) fn toggle_at(app: &mut App, index: usize) {
    app.cursor = index;
    match task_ops::toggle_status(&mut app.workspace.list, index) {
        Ok(_) => {
            app.save();
        }
        Err(e) => app.set_error(e.to_string()),
    }
}

fn request_delete(app: &mut App) {
    let Some(index) = app.selected() else {
        return;
    };
    let Some(task) = app.task(index) else {
        return;
    };
    app.confirm = Some(ConfirmState {
        message: format!("delete \"{}\"?", task.text),
        action: ConfirmAction::DeleteTask { index },
    });
    app.mode = Mode::Confirm;
}

pub(super) fn sort_list(app: &mut App) {
    task_ops::sort_by_deadline(&mut app.workspace.list);
    if app.save() {
        app.set_message("sorted by deadline");
    }
}
