use crate::app::{AppState, TaskFormState};
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

const FORM_HEIGHT: u16 = 20;

/// Label and value line for one text field
fn field_lines(form: &TaskFormState, index: usize, label: &str, value: &str) -> Vec<Line<'static>> {
    let editing = form.editing_field == index;
    let label = if editing {
        format!("{}: (editing)", label)
    } else {
        format!("{}:", label)
    };

    vec![
        Line::raw(label),
        Line::from(vec![
            Span::raw("> "),
            Span::styled(value.to_string(), modal_title_style()),
            if editing {
                Span::styled("█", modal_title_style()) // Cursor
            } else {
                Span::raw("")
            },
        ]),
        Line::raw(""),
    ]
}

/// Render the add/edit task form
pub fn render_input_form(f: &mut Frame, app: &AppState, area: Rect) {
    if let Some(form) = &app.task_form {
        let modal_area = create_modal_area(area, FORM_HEIGHT);

        // Clear the area behind the form
        f.render_widget(Clear, modal_area);

        let title_text = match form.editing_id {
            Some(_) => format!(" Edit {} Task ", form.category.label()),
            None => format!(" Add {} Task ", form.category.label()),
        };

        let mut lines = vec![Line::raw("")];
        lines.extend(field_lines(form, 0, "Title", &form.title));
        lines.extend(field_lines(form, 1, "Description", &form.description));
        lines.extend(field_lines(form, 2, "Link (optional)", &form.link));

        // Status is chosen, not typed
        let status_label = if form.editing_field == 3 {
            "Status: (←/→ to change)"
        } else {
            "Status:"
        };
        lines.push(Line::from(vec![
            Span::raw(format!("{} ", status_label)),
            Span::styled(form.status.label(), modal_title_style()),
        ]));
        lines.push(Line::raw(""));

        if let Some(error) = &form.error {
            lines.push(Line::from(Span::styled(error.clone(), error_style())));
            lines.push(Line::raw(""));
        }

        // Instructions
        lines.push(Line::raw("Tab to switch fields  ·  Enter to save  ·  Esc to cancel"));

        let paragraph = Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(Span::styled(title_text, modal_title_style()))
                    .style(modal_bg_style()),
            )
            .wrap(Wrap { trim: false });

        f.render_widget(paragraph, modal_area);
    }
}
