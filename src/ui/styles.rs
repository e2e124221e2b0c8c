use crate::domain::{Category, TaskStatus};
use ratatui::style::{Color, Modifier, Style};

/// Default text style
pub fn default_style() -> Style {
    Style::default().fg(Color::White)
}

/// Selected row highlight style
pub fn selected_style() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(Color::LightCyan)
        .add_modifier(Modifier::BOLD)
}

/// Accent color per category tab
pub fn category_color(category: Category) -> Color {
    match category {
        Category::Daily => Color::LightBlue,
        Category::NoteOnly => Color::Yellow,
        Category::Waitlist => Color::Magenta,
        Category::Testnet => Color::Green,
        Category::SocialLinks => Color::Cyan,
    }
}

/// Active tab style
pub fn active_tab_style(category: Category) -> Style {
    Style::default()
        .fg(category_color(category))
        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
}

/// Status badge style
pub fn status_style(status: TaskStatus) -> Style {
    match status {
        TaskStatus::Early => Style::default().fg(Color::Yellow),
        TaskStatus::Ongoing => Style::default()
            .fg(Color::Magenta)
            .add_modifier(Modifier::BOLD),
        TaskStatus::Ended => Style::default().fg(Color::Gray),
    }
}

/// Title style for panes
pub fn title_style() -> Style {
    Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
}

/// Border style
pub fn border_style() -> Style {
    Style::default().fg(Color::Gray)
}

/// Modal background style
pub fn modal_bg_style() -> Style {
    Style::default().bg(Color::DarkGray).fg(Color::White)
}

/// Modal title style
pub fn modal_title_style() -> Style {
    Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD)
}

/// Keybinding hint style
pub fn hint_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

/// Completion gauge style
pub fn gauge_style() -> Style {
    Style::default().fg(Color::Green).bg(Color::DarkGray)
}

/// Error message style
pub fn error_style() -> Style {
    Style::default()
        .fg(Color::Red)
        .add_modifier(Modifier::BOLD)
}

/// Done/completed task style
pub fn done_style() -> Style {
    Style::default()
        .fg(Color::Green)
        .add_modifier(Modifier::CROSSED_OUT)
}

/// Link style
pub fn link_style() -> Style {
    Style::default()
        .fg(Color::Blue)
        .add_modifier(Modifier::UNDERLINED)
}
