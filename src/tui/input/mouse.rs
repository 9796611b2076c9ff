use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};

use crate::ops::task_ops;
use crate::tui::app::{App, DragState};

use super::*;

pub(super) fn handle_mouse_event(app: &mut App, mouse: MouseEvent) {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if let Some(index) = app.row_at(mouse.column, mouse.row) {
                app.cursor = index;
                app.drag = Some(DragState {
                    index,
                    moved: false,
                });
            }
        }
        MouseEventKind::Drag(MouseButton::Left) => drag_to(app, mouse.row),
        MouseEventKind::Up(MouseButton::Left) => finish_drag(app),
        MouseEventKind::Down(MouseButton::Right) => {
            if let Some(index) = app.row_at(mouse.column, mouse.row) {
                begin_edit(app, index);
            }
        }
        MouseEventKind::ScrollDown => move_cursor(app, 1),
        MouseEventKind::ScrollUp => move_cursor(app, -1),
        _ => {}
    }
}

/// Row under the pointer, clamped to the list like a listbox's nearest
/// item: above the first row is the first, below the last is the last.
fn nearest_row(app: &App, row: u16) -> Option<usize> {
    let count = app.task_count();
    if count == 0 {
        return None;
    }
    let offset = row.saturating_sub(app.list_area.y) as usize;
    Some((app.scroll_offset + offset).min(count - 1))
}

/// Pointer motion with the button held: move the pressed task under the
/// pointer. The list is not re-sorted.
fn drag_to(app: &mut App, row: u16) {
    let Some(mut drag) = app.drag else {
        return;
    };
    let Some(target) = nearest_row(app, row) else {
        return;
    };
    if target == drag.index {
        return;
    }
    if task_ops::move_task(&mut app.workspace.list, drag.index, target).is_ok() {
        drag.index = target;
        drag.moved = true;
        app.cursor = target;
        app.drag = Some(drag);
    }
}

/// Button released: save a completed drag once, or treat a press without
/// motion as a click that advances the task's status.
fn finish_drag(app: &mut App) {
    let Some(drag) = app.drag.take() else {
        return;
    };
    if drag.moved {
        if app.save() {
            app.set_message(format!("moved to position {}", drag.index + 1));
        }
    } else {
        toggle_at(app, drag.index);
    }
}
