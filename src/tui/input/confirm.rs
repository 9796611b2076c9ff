use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::io::recovery;
use crate::ops::task_ops;
use crate::parse::task_serializer::serialize_task;
use crate::tui::app::{App, ConfirmAction, Mode};

pub(super) fn handle_confirm(app: &mut App, key: KeyEvent) {
    match (key.modifiers, key.code) {
        // Confirm: y
        (KeyModifiers::NONE, KeyCode::Char('y')) => {
            let state = app.confirm.take();
            app.mode = Mode::Navigate;
            if let Some(state) = state {
                match state.action {
                    ConfirmAction::DeleteTask { index } => confirm_delete_task(app, index),
                }
            }
        }
        // Cancel: n or Esc
        (KeyModifiers::NONE, KeyCode::Char('n')) | (_, KeyCode::Esc) => {
            app.confirm = None;
            app.mode = Mode::Navigate;
        }
        _ => {}
    }
}

fn confirm_delete_task(app: &mut App, index: usize) {
    let Some(task) = task_ops::remove_task(&mut app.workspace.list, Some(index)) else {
        return;
    };
    app.clamp_cursor();
    if app.save() {
        recovery::log_task_removal(&app.workspace.data_dir(), index, &serialize_task(&task));
        app.set_message(format!("removed \"{}\"", task.text));
    }
}
