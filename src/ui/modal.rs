use crate::app::AppState;
use crate::domain::UiMode;
use crate::ui::{
    layout::create_modal_area,
    styles::{error_style, modal_bg_style, modal_title_style},
};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// Draw a bordered modal with the given lines
fn render_modal_box(f: &mut Frame, area: Rect, title: &str, lines: Vec<Line>) {
    let height = (lines.len() as u16).saturating_add(2);
    let modal_area = create_modal_area(area, height);

    // Clear the area behind the modal
    f.render_widget(Clear, modal_area);

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(Span::styled(format!(" {} ", title), modal_title_style()))
                .style(modal_bg_style()),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(paragraph, modal_area);
}

fn confirm_options(confirm: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled("  [y]", modal_title_style()),
        Span::raw(format!(" {}  ", confirm)),
        Span::styled("[n]", modal_title_style()),
        Span::raw(" Cancel"),
    ])
}

/// Render the completion confirmation modal
pub fn render_confirm_complete_modal(f: &mut Frame, app: &AppState, area: Rect) {
    let text = app
        .pending_task()
        .map(|t| t.text.clone())
        .unwrap_or_default();

    let lines = vec![
        Line::raw(""),
        Line::raw(format!("  Mark '{}' as done?", text)),
        Line::raw(""),
        Line::raw("  Daily tasks stay completed until the next reset."),
        Line::raw(format!("  Next reset at {}.", app.engine.reset_time())),
        Line::raw(""),
        confirm_options("Complete"),
    ];
    render_modal_box(f, area, "Complete Daily Task", lines);
}

/// Render the delete confirmation modal
pub fn render_confirm_delete_modal(f: &mut Frame, app: &AppState, area: Rect) {
    let text = app
        .pending_task()
        .map(|t| t.text.clone())
        .unwrap_or_default();

    let lines = vec![
        Line::raw(""),
        Line::raw(format!("  Delete '{}'?", text)),
        Line::raw("  This cannot be undone."),
        Line::raw(""),
        confirm_options("Delete"),
    ];
    render_modal_box(f, area, "Delete Task", lines);
}

/// Render a single-line text prompt (reset time, import path)
fn render_prompt_modal(f: &mut Frame, app: &AppState, area: Rect, title: &str, label: &str, value: &str) {
    let mut lines = vec![
        Line::raw(""),
        Line::raw(format!("  {}", label)),
        Line::from(vec![
            Span::raw("  > "),
            Span::styled(value.to_string(), modal_title_style()),
            Span::styled("█", modal_title_style()), // Cursor
        ]),
        Line::raw(""),
    ];

    if let Some(status) = app.status.as_ref().filter(|s| s.is_error) {
        lines.push(Line::from(Span::styled(
            format!("  {}", status.text),
            error_style(),
        )));
        lines.push(Line::raw(""));
    }

    lines.push(Line::raw("  Enter to confirm  ·  Esc to cancel"));
    render_modal_box(f, area, title, lines);
}

pub fn render_reset_time_modal(f: &mut Frame, app: &AppState, area: Rect) {
    render_prompt_modal(
        f,
        app,
        area,
        "Daily Reset Time",
        "Reset time (HH:MM, 24h):",
        &app.reset_time_input,
    );
}

pub fn render_import_modal(f: &mut Frame, app: &AppState, area: Rect) {
    render_prompt_modal(
        f,
        app,
        area,
        "Import Tasks",
        "Path to export file (replaces all tasks):",
        &app.import_path_input,
    );
}

/// Render whichever modal the current mode calls for
pub fn render_active_modal(f: &mut Frame, app: &AppState, area: Rect) {
    match app.ui_mode {
        UiMode::ConfirmComplete => render_confirm_complete_modal(f, app, area),
        UiMode::ConfirmDelete => render_confirm_delete_modal(f, app, area),
        UiMode::ResetTimeEditor => render_reset_time_modal(f, app, area),
        UiMode::ImportPrompt => render_import_modal(f, app, area),
        _ => {}
    }
}
