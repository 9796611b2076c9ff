use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::tui::app::App;

use super::helpers::centered_rect;

/// Render the help overlay (toggled with ?)
pub fn render_help_overlay(frame: &mut Frame, app: &App, area: Rect) {
    let overlay_area = centered_rect(60, 80, area);
    frame.render_widget(Clear, overlay_area);

    let bg = app.theme.background;
    let key_style = Style::default()
        .fg(app.theme.highlight)
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    let desc_style = Style::default().fg(app.theme.text).bg(bg);
    let header_style = Style::default()
        .fg(app.theme.text_bright)
        .bg(bg)
        .add_modifier(Modifier::BOLD);

    let mut lines: Vec<Line> = Vec::new();

    lines.push(Line::from(Span::styled(" Tasks", header_style)));
    add_binding(&mut lines, " \u{2191}\u{2193}/jk", "Move cursor", key_style, desc_style);
    add_binding(&mut lines, " g/G", "Jump to top/bottom", key_style, desc_style);
    add_binding(&mut lines, " a", "Add task", key_style, desc_style);
    add_binding(&mut lines, " e/Enter", "Edit text, then deadline", key_style, desc_style);
    add_binding(&mut lines, " Space/x", "Toggle [ ] \u{2192} [\u{2714}] \u{2192} [\u{2716}]", key_style, desc_style);
    add_binding(&mut lines, " d/Del", "Delete task", key_style, desc_style);
    add_binding(&mut lines, " s/r", "Sort by deadline", key_style, desc_style);
    add_binding(&mut lines, " m", "Move mode (j/k, Enter, Esc)", key_style, desc_style);
    add_binding(&mut lines, " q", "Quit", key_style, desc_style);
    lines.push(Line::from(""));

    lines.push(Line::from(Span::styled(" Mouse", header_style)));
    add_binding(&mut lines, " click", "Toggle status", key_style, desc_style);
    add_binding(&mut lines, " right-click", "Edit task", key_style, desc_style);
    add_binding(&mut lines, " drag", "Reorder (no sort)", key_style, desc_style);
    lines.push(Line::from(""));

    lines.push(Line::from(Span::styled(" Deadlines", header_style)));
    lines.push(Line::from(Span::styled(
        " YYYY-MM-DD, YYYY-MM-DD HH:MM, or = for none",
        desc_style,
    )));

    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(" Help ", header_style))
        .border_style(Style::default().fg(app.theme.dim).bg(bg))
        .style(Style::default().bg(bg));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .style(Style::default().bg(bg));
    frame.render_widget(paragraph, overlay_area);
}

fn add_binding<'a>(
    lines: &mut Vec<Line<'a>>,
    key: &'a str,
    desc: &'a str,
    key_style: Style,
    desc_style: Style,
) {
    let key_width = 14;
    let padded_key = format!("{:<width$}", key, width = key_width);
    lines.push(Line::from(vec![
        Span::styled(padded_key, key_style),
        Span::styled(desc, desc_style),
    ]));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::render::test_helpers::*;

    #[test]
    fn lists_keys_and_mouse() {
        let app = app_with_tasks(SAMPLE_TASKS);
        let output = render_to_string(TERM_W, TERM_H, |frame, area| {
            render_help_overlay(frame, &app, area);
        });
        assert!(output.contains(" Help "));
        assert!(output.contains("Add task"));
        assert!(output.contains("right-click"));
        assert!(output.contains("Reorder (no sort)"));
    }
}
