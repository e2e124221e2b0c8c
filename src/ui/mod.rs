pub mod details_pane;
pub mod input_form;
pub mod keybindings;
pub mod layout;
pub mod list_pane;
pub mod modal;
pub mod stats_pane;
pub mod styles;
pub mod tabs_pane;

use crate::app::AppState;
use crate::domain::UiMode;
use details_pane::render_details_pane;
use input_form::render_input_form;
use keybindings::render_keybindings;
use layout::create_layout;
use list_pane::render_list_pane;
use modal::render_active_modal;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use stats_pane::render_stats_pane;
use styles::{error_style, hint_style, title_style};
use tabs_pane::render_tabs_pane;

/// Main render function - draws the entire UI
pub fn render(f: &mut Frame, app: &AppState) {
    let size = f.size();
    let layout = create_layout(size);

    render_keybindings(f, app.ui_mode, layout.keybindings_area);
    render_tabs_pane(f, app, layout.tabs_area);
    render_stats_pane(f, app, layout.stats_area);
    render_list_pane(f, app, layout.list_area);
    render_details_pane(f, app, layout.details_area);
    render_status_line(f, app, layout.status_area);

    if app.ui_mode == UiMode::TaskForm {
        render_input_form(f, app, size);
    } else {
        render_active_modal(f, app, size);
    }
}

/// Search prompt while searching, otherwise the last status message
fn render_status_line(f: &mut Frame, app: &AppState, area: Rect) {
    let line = if app.ui_mode == UiMode::Searching {
        Line::from(vec![
            Span::styled(" / ", title_style()),
            Span::raw(app.search_query.clone()),
            Span::styled("█", title_style()),
        ])
    } else {
        match &app.status {
            Some(status) if status.is_error => {
                Line::from(Span::styled(format!(" {}", status.text), error_style()))
            }
            Some(status) => Line::from(Span::raw(format!(" {}", status.text))),
            None => Line::from(Span::styled(" Ready", hint_style())),
        }
    };
    f.render_widget(Paragraph::new(line), area);
}
