mod confirm;
mod mouse;
mod move_mode;
mod navigate;
mod prompt;

use crossterm::event::{KeyCode, KeyEvent, MouseEvent, MouseEventKind};

use super::app::{App, Mode};

// Import all submodule functions into this module's namespace
// so that submodules can access cross-module functions via `use super::*;`
#[allow(unused_imports)]
use confirm::*;
#[allow(unused_imports)]
use mouse::*;
#[allow(unused_imports)]
use move_mode::*;
#[allow(unused_imports)]
use navigate::*;
#[allow(unused_imports)]
use prompt::*;

/// Handle a key event in the current mode
pub fn handle_key(app: &mut App, key: KeyEvent) {
    // Ignore bare modifier key presses (Shift, Ctrl, Alt, etc.)
    if matches!(key.code, KeyCode::Modifier(_)) {
        return;
    }

    // A key press ends any drag in progress
    if let Some(drag) = app.drag.take()
        && drag.moved
    {
        app.save();
    }

    match app.mode {
        Mode::Navigate => handle_navigate(app, key),
        Mode::Prompt => handle_prompt(app, key),
        Mode::Confirm => handle_confirm(app, key),
        Mode::Move => handle_move(app, key),
    }
}

/// Handle a mouse event. Only Navigate mode reacts to clicks, but a button
/// release always ends a drag.
pub fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    let is_release = matches!(mouse.kind, MouseEventKind::Up(_));
    if !is_release && (app.mode != Mode::Navigate || app.show_help) {
        return;
    }
    handle_mouse_event(app, mouse);
}

#[cfg(test)]
pub(crate) mod test_keys {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    pub fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    pub fn ch(c: char) -> KeyEvent {
        key(KeyCode::Char(c))
    }

    pub fn type_str(app: &mut crate::tui::app::App, s: &str) {
        for c in s.chars() {
            super::handle_key(app, ch(c));
        }
    }
}
