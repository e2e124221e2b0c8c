use crate::app::AppState;
use crate::domain::{Category, CategoryStats};
use crate::ui::styles::{active_tab_style, border_style, default_style};
use ratatui::{
    layout::Rect,
    text::Line,
    widgets::{Block, Borders, Tabs},
    Frame,
};

/// Tab title: "1 Daily (2/5)"
fn tab_title(position: usize, stats: &CategoryStats) -> String {
    format!(
        "{} {} ({}/{})",
        position + 1,
        stats.category.label(),
        stats.completed,
        stats.total
    )
}

/// Render the category tab bar with per-category counts
pub fn render_tabs_pane(f: &mut Frame, app: &AppState, area: Rect) {
    let stats = app.tab_stats();
    let titles: Vec<Line> = stats
        .iter()
        .enumerate()
        .map(|(idx, s)| Line::raw(tab_title(idx, s)))
        .collect();

    let selected = Category::all()
        .iter()
        .position(|c| *c == app.active_category)
        .unwrap_or(0);

    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style()),
        )
        .style(default_style())
        .highlight_style(active_tab_style(app.active_category))
        .select(selected)
        .divider("│");

    f.render_widget(tabs, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tab_title() {
        let stats = CategoryStats {
            category: Category::Testnet,
            total: 5,
            completed: 2,
            completion_rate: 40,
            streak: 2,
        };
        assert_eq!(tab_title(3, &stats), "4 Testnet (2/5)");
    }
}
