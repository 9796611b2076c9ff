use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::model::task::TaskStatus;
use crate::tui::app::App;

use super::helpers::spans_width;

/// Render the title row: app name and task file on the left, progress on the right
pub fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;

    let file_name = app
        .workspace
        .task_file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut spans = vec![
        Span::styled(
            " tickoff",
            Style::default()
                .fg(app.theme.highlight)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  {}", file_name),
            Style::default().fg(app.theme.dim).bg(bg),
        ),
    ];

    let total = app.task_count();
    let done = app
        .workspace
        .list
        .iter()
        .filter(|t| t.status == TaskStatus::Tick)
        .count();
    let progress = format!("{}/{} done ", done, total);
    let left_w = spans_width(&spans);
    if left_w + progress.len() < width {
        spans.push(Span::styled(
            " ".repeat(width - left_w - progress.len()),
            Style::default().bg(bg),
        ));
        spans.push(Span::styled(
            progress,
            Style::default().fg(app.theme.text).bg(bg),
        ));
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}
