use crate::app::AppState;
use crate::domain::{check_glyph, Task};
use crate::ui::styles::{
    border_style, default_style, done_style, selected_style, status_style, title_style,
};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

/// Render the task list for the active category
pub fn render_list_pane(f: &mut Frame, app: &AppState, area: Rect) {
    let rows = app.visible_tasks();

    let items: Vec<ListItem> = if rows.is_empty() {
        let hint = if app.search_query.is_empty() {
            "No tasks yet. Press 'a' to add one."
        } else {
            "No tasks match the search."
        };
        vec![ListItem::new(Line::raw(hint)).style(default_style())]
    } else {
        rows.iter()
            .map(|task| ListItem::new(create_task_line(task, app.use_emoji)).style(default_style()))
            .collect()
    };

    let mut title = format!(" {} · {} ", app.active_category.label(), app.sort.label());
    if !app.search_query.is_empty() {
        title.push_str(&format!("· /{} ", app.search_query));
    }

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style())
                .title(Span::styled(title, title_style())),
        )
        .highlight_style(selected_style());

    // Stateful rendering keeps the selected row scrolled into view
    let mut state = ListState::default();
    if !rows.is_empty() {
        state.select(Some(app.selected_index));
    }
    f.render_stateful_widget(list, area, &mut state);
}

/// Create a single line for a task
/// Format: ✅ Mint NFT  [Ongoing] 🔗
fn create_task_line(task: &Task, use_emoji: bool) -> Line<'static> {
    let mut spans = Vec::new();

    spans.push(Span::raw(format!("{} ", check_glyph(task, use_emoji))));

    if task.completed {
        spans.push(Span::styled(task.text.clone(), done_style()));
    } else {
        spans.push(Span::raw(task.text.clone()));
    }

    spans.push(Span::raw("  ".to_string()));
    spans.push(Span::styled(
        format!("[{}]", task.status.label()),
        status_style(task.status),
    ));

    if task.link.is_some() {
        spans.push(Span::raw(if use_emoji { " 🔗" } else { " (link)" }.to_string()));
    }

    Line::from(spans)
}
