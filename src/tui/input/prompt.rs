use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::model::task::Deadline;
use crate::ops::task_ops;
use crate::parse::parse_deadline;
use crate::tui::app::{App, Mode, PromptKind, PromptState};
use crate::util::unicode;

pub(super) fn handle_prompt(app: &mut App, key: KeyEvent) {
    let Some(prompt) = app.prompt.as_mut() else {
        app.mode = Mode::Navigate;
        return;
    };

    match (key.modifiers, key.code) {
        (_, KeyCode::Esc) => cancel_prompt(app),
        (_, KeyCode::Enter) => submit_prompt(app),
        (_, KeyCode::Backspace) => delete_back(prompt),
        (_, KeyCode::Delete) => delete_forward(prompt),
        (_, KeyCode::Left) => {
            if let Some(i) = unicode::prev_grapheme_boundary(&prompt.buffer, prompt.cursor) {
                prompt.cursor = i;
            }
        }
        (_, KeyCode::Right) => {
            if let Some(i) = unicode::next_grapheme_boundary(&prompt.buffer, prompt.cursor) {
                prompt.cursor = i;
            }
        }
        (KeyModifiers::CONTROL, KeyCode::Char('a')) | (_, KeyCode::Home) => prompt.cursor = 0,
        (KeyModifiers::CONTROL, KeyCode::Char('e')) | (_, KeyCode::End) => {
            prompt.cursor = prompt.buffer.len();
        }
        (KeyModifiers::CONTROL, KeyCode::Char('u')) => {
            prompt.buffer.replace_range(..prompt.cursor, "");
            prompt.cursor = 0;
        }
        (mods, KeyCode::Char(c)) if !mods.contains(KeyModifiers::CONTROL) => {
            prompt.buffer.insert(prompt.cursor, c);
            prompt.cursor += c.len_utf8();
        }
        _ => {}
    }
}

fn delete_back(prompt: &mut PromptState) {
    if let Some(start) = unicode::prev_grapheme_boundary(&prompt.buffer, prompt.cursor) {
        prompt.buffer.replace_range(start..prompt.cursor, "");
        prompt.cursor = start;
    }
}

fn delete_forward(prompt: &mut PromptState) {
    if let Some(end) = unicode::next_grapheme_boundary(&prompt.buffer, prompt.cursor) {
        prompt.buffer.replace_range(prompt.cursor..end, "");
    }
}

/// Put a prompt back on screen with an error under the input.
fn reprompt(app: &mut App, mut prompt: PromptState, error: String) {
    prompt.error = Some(error);
    app.prompt = Some(prompt);
}

fn next_prompt(app: &mut App, kind: PromptKind, initial: String) {
    app.prompt = Some(PromptState::new(kind, initial));
}

fn close_prompt(app: &mut App) {
    app.prompt = None;
    app.mode = Mode::Navigate;
}

/// Current deadline of a task as it would be typed
fn deadline_initial(app: &App, index: usize) -> String {
    app.task(index)
        .map(|t| t.deadline.to_string())
        .unwrap_or_default()
}

fn submit_prompt(app: &mut App) {
    let Some(prompt) = app.prompt.take() else {
        return;
    };

    match prompt.kind.clone() {
        PromptKind::AddText => {
            let text = prompt.buffer.trim().to_string();
            if text.is_empty() {
                close_prompt(app);
                return;
            }
            match task_ops::check_text(&text) {
                Ok(()) => next_prompt(app, PromptKind::AddDeadline { text }, String::new()),
                Err(e) => reprompt(app, prompt, e.to_string()),
            }
        }
        PromptKind::AddDeadline { text } => match parse_deadline(&prompt.buffer) {
            Ok(deadline) => finish_add(app, text, deadline),
            Err(e) => reprompt(app, prompt, e.to_string()),
        },
        PromptKind::EditText { index } => {
            let text = prompt.buffer.trim().to_string();
            if let Err(e) = task_ops::check_text(&text) {
                reprompt(app, prompt, e.to_string());
                return;
            }
            let initial = deadline_initial(app, index);
            next_prompt(
                app,
                PromptKind::EditDeadline {
                    index,
                    text: Some(text),
                },
                initial,
            );
        }
        PromptKind::EditDeadline { index, text } => match parse_deadline(&prompt.buffer) {
            Ok(deadline) => finish_edit(app, index, text, deadline),
            Err(e) => reprompt(app, prompt, e.to_string()),
        },
    }
}

/// Esc: a cancelled text prompt adds nothing (add) or keeps the old text
/// (edit); a cancelled deadline prompt means no deadline.
fn cancel_prompt(app: &mut App) {
    let Some(prompt) = app.prompt.take() else {
        close_prompt(app);
        return;
    };

    match prompt.kind {
        PromptKind::AddText => close_prompt(app),
        PromptKind::AddDeadline { text } => finish_add(app, text, Deadline::Unset),
        PromptKind::EditText { index } => {
            let initial = deadline_initial(app, index);
            next_prompt(app, PromptKind::EditDeadline { index, text: None }, initial);
        }
        PromptKind::EditDeadline { index, text } => {
            finish_edit(app, index, text, Deadline::Unset)
        }
    }
}

fn finish_add(app: &mut App, text: String, deadline: Deadline) {
    close_prompt(app);
    match task_ops::add_task(&mut app.workspace.list, text, deadline) {
        Ok(index) => {
            app.cursor = index;
            if app.save() {
                app.set_message(format!("added at position {}", index + 1));
            }
        }
        Err(e) => app.set_error(e.to_string()),
    }
}

fn finish_edit(app: &mut App, index: usize, text: Option<String>, deadline: Deadline) {
    close_prompt(app);
    match task_ops::edit_task(&mut app.workspace.list, index, text, Some(deadline)) {
        Ok(new_index) => {
            app.cursor = new_index;
            app.save();
        }
        Err(e) => app.set_error(e.to_string()),
    }
}
