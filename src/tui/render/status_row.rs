use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::{App, Mode};

use super::helpers::spans_width;

const NAVIGATE_HINTS: &str = "a add  e edit  space toggle  d delete  s sort  m move  ? help";

/// Render the status row (bottom of screen)
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;
    let dim = Style::default().fg(app.theme.dim).bg(bg);

    let (mut spans, hint): (Vec<Span>, &str) = match app.mode {
        Mode::Navigate => {
            let spans = match &app.status_message {
                Some(msg) => {
                    let color = if app.status_is_error {
                        app.theme.red
                    } else {
                        app.theme.text
                    };
                    vec![Span::styled(
                        format!(" {}", msg),
                        Style::default().fg(color).bg(bg),
                    )]
                }
                None => Vec::new(),
            };
            let hint = if app.workspace.config.ui.show_key_hints {
                NAVIGATE_HINTS
            } else {
                ""
            };
            (spans, hint)
        }
        Mode::Prompt => (Vec::new(), "Enter ok  Esc cancel"),
        Mode::Confirm => {
            let msg = app
                .confirm
                .as_ref()
                .map(|c| c.message.as_str())
                .unwrap_or_default();
            (
                vec![
                    Span::styled(
                        format!(" {}", msg),
                        Style::default().fg(app.theme.yellow).bg(bg),
                    ),
                    Span::styled(
                        " y/n",
                        Style::default()
                            .fg(app.theme.text_bright)
                            .bg(bg)
                            .add_modifier(Modifier::BOLD),
                    ),
                ],
                "",
            )
        }
        Mode::Move => (
            vec![Span::styled(
                " MOVE",
                Style::default()
                    .fg(app.theme.highlight)
                    .bg(bg)
                    .add_modifier(Modifier::BOLD),
            )],
            "j/k move  Enter keep  Esc cancel",
        ),
    };

    // Right-aligned hint, dropped when it does not fit
    let content_width = spans_width(&spans);
    let hint_width = hint.chars().count();
    if !hint.is_empty() && content_width + hint_width + 1 < width {
        let padding = width - content_width - hint_width - 1;
        spans.push(Span::styled(" ".repeat(padding), Style::default().bg(bg)));
        spans.push(Span::styled(hint, dim));
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}
