use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Main layout structure
pub struct MainLayout {
    pub keybindings_area: Rect,
    pub tabs_area: Rect,
    pub stats_area: Rect,
    pub list_area: Rect,
    pub details_area: Rect,
    pub status_area: Rect,
}

/// Create the main layout
/// - Top bar: keybindings (1 row)
/// - Category tabs (3 rows) and stats header (4 rows)
/// - Main area: List (65%) | Details (35%)
/// - Bottom: status line (1 row)
pub fn create_layout(area: Rect) -> MainLayout {
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Keybindings bar
            Constraint::Length(3), // Tabs
            Constraint::Length(4), // Stats
            Constraint::Min(0),    // List + details
            Constraint::Length(1), // Status line
        ])
        .split(area);

    let horizontal_split = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(65), // List pane
            Constraint::Percentage(35), // Details pane
        ])
        .split(main_chunks[3]);

    MainLayout {
        keybindings_area: main_chunks[0],
        tabs_area: main_chunks[1],
        stats_area: main_chunks[2],
        list_area: horizontal_split[0],
        details_area: horizontal_split[1],
        status_area: main_chunks[4],
    }
}

/// Create centered modal area of the given height
pub fn create_modal_area(area: Rect, height: u16) -> Rect {
    let vertical_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Length(height),
            Constraint::Percentage(25),
        ])
        .split(area);

    let horizontal_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(20),
            Constraint::Percentage(60),
            Constraint::Percentage(20),
        ])
        .split(vertical_chunks[1]);

    horizontal_chunks[1]
}
