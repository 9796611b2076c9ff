use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use unicode_segmentation::UnicodeSegmentation;

use crate::tui::app::{App, PromptKind, PromptState};
use crate::util::unicode;

use super::helpers::centered_rect_fixed;

const DEADLINE_HINT: &str = "YYYY-MM-DD or YYYY-MM-DD HH:MM, = for none";

fn hint(prompt: &PromptState) -> &'static str {
    match prompt.kind {
        PromptKind::AddText => "Enter next, Esc cancel",
        PromptKind::EditText { .. } => "Enter next, Esc keep text",
        PromptKind::AddDeadline { .. } | PromptKind::EditDeadline { .. } => DEADLINE_HINT,
    }
}

/// Render the text prompt popup and place the terminal cursor in it
pub fn render_prompt_popup(frame: &mut Frame, app: &App, area: Rect) {
    let Some(prompt) = &app.prompt else {
        return;
    };

    let bg = app.theme.background;
    let popup_w: u16 = 60.min(area.width.saturating_sub(4)).max(10);
    let popup_h: u16 = 5;
    let popup = centered_rect_fixed(popup_w, popup_h, area);
    frame.render_widget(Clear, popup);

    // One cell of padding on each side inside the border
    let avail = (popup.width as usize).saturating_sub(4);
    let (visible, cursor_col) = visible_input(&prompt.buffer, prompt.cursor, avail);

    let footer = match &prompt.error {
        Some(err) => Span::styled(format!(" {}", err), Style::default().fg(app.theme.red).bg(bg)),
        None => Span::styled(
            format!(" {}", hint(prompt)),
            Style::default().fg(app.theme.dim).bg(bg),
        ),
    };

    let lines = vec![
        Line::from(Span::styled(
            format!(" {}", visible),
            Style::default().fg(app.theme.text_bright).bg(bg),
        )),
        Line::from(""),
        Line::from(footer),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(
            format!(" {} ", prompt.title()),
            Style::default()
                .fg(app.theme.highlight)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ))
        .border_style(Style::default().fg(app.theme.highlight).bg(bg))
        .style(Style::default().bg(bg));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .style(Style::default().bg(bg));
    frame.render_widget(paragraph, popup);

    frame.set_cursor_position((popup.x + 2 + cursor_col as u16, popup.y + 1));
}

/// The part of `buffer` that fits in `avail` cells with the cursor in view,
/// and the cursor's column within it.
pub(super) fn visible_input(buffer: &str, cursor: usize, avail: usize) -> (String, usize) {
    if avail == 0 {
        return (String::new(), 0);
    }
    let cursor_col = unicode::byte_offset_to_display_col(buffer, cursor);
    // Keep the last cell free for the cursor
    let skip = (cursor_col + 1).saturating_sub(avail);

    let mut skipped = 0;
    let mut visible = String::new();
    let mut width = 0;
    for g in buffer.graphemes(true) {
        let gw = unicode::display_width(g);
        if skipped < skip {
            skipped += gw;
            continue;
        }
        if width + gw > avail {
            break;
        }
        width += gw;
        visible.push_str(g);
    }
    (visible, cursor_col - skipped.min(cursor_col))
}
