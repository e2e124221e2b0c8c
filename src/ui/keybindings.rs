use crate::domain::UiMode;
use crate::ui::styles::hint_style;
use ratatui::{layout::Rect, text::{Line, Span}, widgets::Paragraph, Frame};

/// Hints for the current mode
pub fn hints(mode: UiMode) -> Vec<&'static str> {
    match mode {
        UiMode::Normal => vec![
            " Tab/1-5 category   ",
            "↑/↓ select   ",
            "Space toggle   ",
            "a add   ",
            "e edit   ",
            "d delete   ",
            "/ search   ",
            "s sort   ",
            "t reset time   ",
            "x export   ",
            "i import   ",
            "q quit",
        ],
        UiMode::Searching => vec![" Type to filter   ", "Enter keep   ", "Esc clear"],
        UiMode::TaskForm => vec![
            " Tab next field   ",
            "←/→ status   ",
            "Enter save   ",
            "Esc cancel",
        ],
        UiMode::ConfirmComplete | UiMode::ConfirmDelete => vec![" y confirm   ", "n/Esc cancel"],
        UiMode::ResetTimeEditor => vec![" HH:MM   ", "Enter save   ", "Esc cancel"],
        UiMode::ImportPrompt => vec![" File path   ", "Enter import   ", "Esc cancel"],
    }
}

/// Render the keybindings hint bar
pub fn render_keybindings(f: &mut Frame, mode: UiMode, area: Rect) {
    let spans: Vec<Span> = hints(mode).into_iter().map(Span::raw).collect();
    let paragraph = Paragraph::new(Line::from(spans)).style(hint_style());
    f.render_widget(paragraph, area);
}
