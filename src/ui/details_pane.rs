use crate::app::AppState;
use crate::ui::styles::{border_style, default_style, link_style, status_style, title_style};
use chrono::Local;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Render the details pane for the selected task
pub fn render_details_pane(f: &mut Frame, app: &AppState, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style())
        .title(Span::styled(" Details ", title_style()));

    let Some(task) = app.selected_task() else {
        let empty = Paragraph::new("No task selected").block(block);
        f.render_widget(empty, area);
        return;
    };

    let mut lines = Vec::new();

    // Title
    lines.push(Line::from(vec![
        Span::styled("Title: ", title_style()),
        Span::raw(task.text.clone()),
    ]));
    lines.push(Line::raw(""));

    lines.push(Line::from(vec![
        Span::styled("Status:    ", title_style()),
        Span::styled(task.status.label(), status_style(task.status)),
    ]));

    let done = match (task.completed, task.completed_at) {
        (true, Some(at)) => format!("yes, {}", at.with_timezone(&Local).format("%b %d %H:%M")),
        (true, None) => "yes".to_string(),
        (false, _) => "no".to_string(),
    };
    lines.push(Line::from(vec![
        Span::styled("Completed: ", title_style()),
        Span::raw(done),
    ]));
    if task.is_locked() {
        lines.push(Line::raw("           locked until the next reset"));
    }

    lines.push(Line::from(vec![
        Span::styled("Created:   ", title_style()),
        Span::raw(
            task.created_at
                .with_timezone(&Local)
                .format("%Y-%m-%d %H:%M")
                .to_string(),
        ),
    ]));

    if let Some(href) = task.link_href() {
        lines.push(Line::from(vec![
            Span::styled("Link:      ", title_style()),
            Span::styled(href, link_style()),
        ]));
    }
    lines.push(Line::raw(""));

    // Description
    match task.description.as_deref() {
        Some(description) => {
            lines.push(Line::from(Span::styled("Description:", title_style())));
            for text_line in description.lines() {
                lines.push(Line::raw(format!("  {}", text_line)));
            }
        }
        None => lines.push(Line::from(Span::styled(
            "Description: (empty)",
            default_style(),
        ))),
    }

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });

    f.render_widget(paragraph, area);
}
