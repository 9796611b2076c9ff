use chrono::{Local, NaiveDateTime};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::model::task::{Deadline, Task, TaskStatus};
use crate::parse::sort_key;
use crate::tui::app::{App, Mode};
use crate::util::unicode;

/// Render the task list content area
pub fn render_list_view(frame: &mut Frame, app: &mut App, area: Rect) {
    app.list_area = area;

    let count = app.task_count();
    if count == 0 {
        let empty = Paragraph::new(" No tasks. Press a to add one.")
            .style(Style::default().fg(app.theme.dim).bg(app.theme.background));
        frame.render_widget(empty, area);
        return;
    }

    // Keep the cursor on screen
    let visible_height = (area.height as usize).max(1);
    app.clamp_cursor();
    let cursor = app.cursor;
    if cursor < app.scroll_offset {
        app.scroll_offset = cursor;
    } else if cursor >= app.scroll_offset + visible_height {
        app.scroll_offset = cursor.saturating_sub(visible_height - 1);
    }
    let scroll = app.scroll_offset;

    let now = Local::now().naive_local();
    let end = count.min(scroll + visible_height);
    let mut lines: Vec<Line> = Vec::with_capacity(visible_height);

    for (task, row) in app.workspace.list.tasks[scroll..end].iter().zip(scroll..end) {
        let is_cursor = row == cursor;
        let is_moving = match app.drag {
            Some(drag) => drag.moved && drag.index == row,
            None => app.mode == Mode::Move && is_cursor,
        };
        lines.push(render_task_line(
            app,
            task,
            is_cursor,
            is_moving,
            area.width as usize,
            now,
        ));
    }

    let paragraph = Paragraph::new(lines).style(Style::default().bg(app.theme.background));
    frame.render_widget(paragraph, area);
}

/// Right-hand deadline label; empty when there is no deadline
pub(super) fn deadline_label(deadline: &Deadline) -> String {
    match deadline {
        Deadline::Unset => String::new(),
        Deadline::Unparsed(raw) => format!("{} (invalid)", raw),
        d => d.to_string(),
    }
}

/// One row: `▎[✔] text ......... 2024-01-05 `
fn render_task_line<'a>(
    app: &'a App,
    task: &Task,
    is_cursor: bool,
    is_moving: bool,
    width: usize,
    now: NaiveDateTime,
) -> Line<'a> {
    let theme = &app.theme;
    let row_bg = if is_moving {
        theme.moving_bg
    } else if is_cursor {
        theme.selection_bg
    } else {
        theme.background
    };

    let mut spans: Vec<Span> = Vec::new();

    // Column 0: cursor bar
    if is_cursor {
        spans.push(Span::styled(
            "\u{258E}",
            Style::default().fg(theme.selection_border).bg(row_bg),
        ));
    } else {
        spans.push(Span::styled(" ", Style::default().bg(row_bg)));
    }

    let mut symbol_style = Style::default()
        .fg(theme.status_color(task.status))
        .bg(row_bg);
    if task.status != TaskStatus::Empty {
        symbol_style = symbol_style.add_modifier(Modifier::BOLD);
    }
    spans.push(Span::styled(task.status.symbol(), symbol_style));
    spans.push(Span::styled(" ", Style::default().bg(row_bg)));

    let label = deadline_label(&task.deadline);
    let label_w = unicode::display_width(&label);
    // label plus one cell of right margin, and at least two cells before it
    let right_w = if label_w > 0 { label_w + 1 } else { 0 };
    let gap = if label_w > 0 { 2 } else { 0 };
    let used = unicode::display_width(task.status.symbol()) + 2;
    let text_budget = width.saturating_sub(used + right_w + gap);
    let text = unicode::truncate_to_width(&task.text, text_budget);

    let text_style = match task.status {
        TaskStatus::Empty if is_cursor => Style::default().fg(theme.text_bright),
        TaskStatus::Empty => Style::default().fg(theme.text),
        TaskStatus::Tick => Style::default().fg(theme.dim),
        TaskStatus::Cross => Style::default()
            .fg(theme.dim)
            .add_modifier(Modifier::CROSSED_OUT),
    }
    .bg(row_bg);
    let text_w = unicode::display_width(&text);
    spans.push(Span::styled(text, text_style));

    if label_w > 0 {
        let pad = width.saturating_sub(used + text_w + right_w);
        spans.push(Span::styled(" ".repeat(pad), Style::default().bg(row_bg)));

        let overdue = task.status == TaskStatus::Empty && sort_key(&task.deadline) < now;
        let label_color = match task.deadline {
            Deadline::Unparsed(_) => theme.red,
            _ if overdue => theme.yellow,
            _ => theme.dim,
        };
        spans.push(Span::styled(label, Style::default().fg(label_color).bg(row_bg)));
        spans.push(Span::styled(" ", Style::default().bg(row_bg)));
    } else {
        let pad = width.saturating_sub(used + text_w);
        spans.push(Span::styled(" ".repeat(pad), Style::default().bg(row_bg)));
    }

    Line::from(spans)
}
