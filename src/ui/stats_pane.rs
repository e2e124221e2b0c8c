use crate::app::AppState;
use crate::domain::{format_countdown, Category, CategoryStats};
use crate::ui::styles::{border_style, gauge_style, title_style};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

/// Summary line: "2/5 completed  🔥 2"
fn summary_line(stats: &CategoryStats, use_emoji: bool) -> Line<'static> {
    let streak_icon = if use_emoji { "🔥" } else { "streak" };
    Line::from(vec![
        Span::styled("Done: ", title_style()),
        Span::raw(format!("{}/{}   ", stats.completed, stats.total)),
        Span::raw(format!("{} {}", streak_icon, stats.streak)),
    ])
}

/// Render the completion stats header for the active category
///
/// The daily tab also shows the countdown to the next reset.
pub fn render_stats_pane(f: &mut Frame, app: &AppState, area: Rect) {
    let stats = app.active_stats();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style())
        .title(Span::styled(
            format!(" {} ", stats.category.label()),
            title_style(),
        ));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(inner);

    let mut line = summary_line(&stats, app.use_emoji);
    if app.active_category == Category::Daily {
        line.spans.push(Span::styled("   Reset in: ", title_style()));
        line.spans.push(Span::raw(format!(
            "{} ({})",
            format_countdown(app.time_remaining()),
            app.engine.reset_time()
        )));
    }
    f.render_widget(Paragraph::new(line), rows[0]);

    let gauge = Gauge::default()
        .gauge_style(gauge_style())
        .percent(stats.completion_rate.min(100) as u16)
        .label(format!("{}%", stats.completion_rate));
    f.render_widget(gauge, rows[1]);
}
