use crate::app::AppState;
use crate::domain::UiMode;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Handle keyboard input events. Returns true when the app should quit.
pub fn handle_key(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match app.ui_mode {
        UiMode::Normal => handle_normal_mode(app, key),
        UiMode::Searching => handle_search_mode(app, key),
        UiMode::TaskForm => handle_task_form_mode(app, key),
        UiMode::ConfirmComplete | UiMode::ConfirmDelete => handle_confirm_mode(app, key),
        UiMode::ResetTimeEditor => handle_reset_time_mode(app, key),
        UiMode::ImportPrompt => handle_import_mode(app, key),
    }
}

/// Handle keys in normal mode
fn handle_normal_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    // Ctrl+C quits from anywhere in normal mode
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Ok(true);
    }

    match key.code {
        // Category tabs
        KeyCode::Tab => app.next_category(),
        KeyCode::BackTab => app.previous_category(),
        KeyCode::Char(c @ '1'..='5') => {
            app.select_category_number(c as usize - '0' as usize);
        }

        // Navigation
        KeyCode::Up | KeyCode::Char('k') => app.move_selection_up(),
        KeyCode::Down | KeyCode::Char('j') => app.move_selection_down(),

        // Toggle completion (daily tasks ask for confirmation)
        KeyCode::Char(' ') | KeyCode::Enter => app.toggle_selected(),

        KeyCode::Char('a') | KeyCode::Char('A') => app.start_add_task(),
        KeyCode::Char('e') | KeyCode::Char('E') => app.start_edit_task(),
        KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Delete => {
            app.request_delete_selected()
        }

        KeyCode::Char('/') => app.start_search(),
        KeyCode::Char('s') | KeyCode::Char('S') => app.cycle_sort(),
        KeyCode::Char('t') | KeyCode::Char('T') => app.open_reset_time_editor(),
        KeyCode::Char('x') | KeyCode::Char('X') => app.export_now(),
        KeyCode::Char('i') | KeyCode::Char('I') => app.start_import(),

        // Escape clears an active search
        KeyCode::Esc => {
            if !app.search_query.is_empty() {
                app.clear_search();
            }
        }

        // Quit
        KeyCode::Char('q') | KeyCode::Char('Q') => return Ok(true),

        _ => {}
    }
    Ok(false)
}

/// Handle keys while typing a search query
fn handle_search_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Enter => app.finish_search(),
        KeyCode::Esc => app.clear_search(),
        KeyCode::Backspace => app.search_backspace(),
        // Arrow keys move through the filtered list without leaving search
        KeyCode::Up => app.move_selection_up(),
        KeyCode::Down => app.move_selection_down(),
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.search_add_char(c)
        }
        _ => {}
    }
    Ok(false)
}

/// Handle keys in the add/edit form
fn handle_task_form_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    let on_status = app
        .task_form
        .as_ref()
        .map(|f| f.editing_field == 3)
        .unwrap_or(false);

    match key.code {
        KeyCode::Enter => app.submit_task_form(),
        KeyCode::Esc => app.cancel_task_form(),
        KeyCode::Tab | KeyCode::Down => app.form_next_field(),
        KeyCode::BackTab | KeyCode::Up => app.form_previous_field(),
        KeyCode::Left | KeyCode::Right if on_status => app.form_cycle_status(),
        KeyCode::Backspace => app.form_backspace(),
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.form_add_char(c)
        }
        _ => {}
    }
    Ok(false)
}

/// Handle keys in the completion/delete confirmation modals
fn handle_confirm_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    let completing = app.ui_mode == UiMode::ConfirmComplete;

    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
            if completing {
                app.confirm_completion();
            } else {
                app.confirm_delete();
            }
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            if completing {
                app.cancel_completion();
            } else {
                app.cancel_delete();
            }
        }
        _ => {}
    }
    Ok(false)
}

fn handle_reset_time_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Enter => app.submit_reset_time(),
        KeyCode::Esc => app.cancel_reset_time(),
        KeyCode::Backspace => app.reset_time_backspace(),
        KeyCode::Char(c) => app.reset_time_add_char(c),
        _ => {}
    }
    Ok(false)
}

fn handle_import_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Enter => app.submit_import(),
        KeyCode::Esc => app.cancel_import(),
        KeyCode::Backspace => app.import_backspace(),
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.import_add_char(c)
        }
        _ => {}
    }
    Ok(false)
}
