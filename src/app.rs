use crate::domain::{
    all_category_stats, category_stats, visible_tasks, Category, CategoryStats, NewTask,
    ResetTime, SortOption, Task, TaskPatch, TaskStatus, UiMode,
};
use crate::engine::{Engine, ResetReport, ToggleOutcome};
use crate::error::EngineError;
use crate::notifications;
use crate::persistence::default_export_file;
use chrono::{DateTime, Duration, Local, TimeZone, Utc};
use std::path::PathBuf;

/// Number of editable fields in the task form
const FORM_FIELDS: usize = 4;

/// Add/edit form state
#[derive(Debug, Clone)]
pub struct TaskFormState {
    /// `None` when adding, the task ID when editing
    pub editing_id: Option<String>,
    pub category: Category,
    pub title: String,
    pub description: String,
    pub link: String,
    pub status: TaskStatus,
    pub editing_field: usize, // 0 = title, 1 = description, 2 = link, 3 = status
    /// Last validation failure, shown inside the form
    pub error: Option<String>,
}

impl TaskFormState {
    fn empty(category: Category) -> Self {
        Self {
            editing_id: None,
            category,
            title: String::new(),
            description: String::new(),
            link: String::new(),
            status: TaskStatus::default(),
            editing_field: 0,
            error: None,
        }
    }

    fn from_task(task: &Task) -> Self {
        Self {
            editing_id: Some(task.id.clone()),
            category: task.category,
            title: task.text.clone(),
            description: task.description.clone().unwrap_or_default(),
            link: task.link.clone().unwrap_or_default(),
            status: task.status,
            editing_field: 0,
            error: None,
        }
    }

    fn current_field_mut(&mut self) -> Option<&mut String> {
        match self.editing_field {
            0 => Some(&mut self.title),
            1 => Some(&mut self.description),
            2 => Some(&mut self.link),
            _ => None,
        }
    }
}

/// One-line message under the task list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub is_error: bool,
}

/// Main application state for the terminal UI
pub struct AppState {
    pub engine: Engine,
    pub data_dir: PathBuf,
    pub active_category: Category,
    pub search_query: String,
    pub sort: SortOption,
    pub selected_index: usize, // Index into the visible list
    pub ui_mode: UiMode,
    pub task_form: Option<TaskFormState>,
    pub reset_time_input: String,
    pub import_path_input: String,
    pub status: Option<StatusMessage>,
    pub use_emoji: bool,
}

impl AppState {
    pub fn new(engine: Engine, data_dir: PathBuf) -> Self {
        let mut app = Self {
            engine,
            data_dir,
            active_category: Category::Daily,
            search_query: String::new(),
            sort: SortOption::None,
            selected_index: 0,
            ui_mode: UiMode::Normal,
            task_form: None,
            reset_time_input: String::new(),
            import_path_input: String::new(),
            status: None,
            use_emoji: true,
        };
        // Load failures surface on the first frame
        app.report_persistence_error();
        app
    }

    // ---- derived view state ----

    /// Tasks of the active tab after search and sort
    pub fn visible_tasks(&self) -> Vec<&Task> {
        visible_tasks(
            self.engine.tasks(),
            self.active_category,
            &self.search_query,
            self.sort,
        )
    }

    pub fn selected_task(&self) -> Option<&Task> {
        self.visible_tasks().get(self.selected_index).copied()
    }

    fn selected_id(&self) -> Option<String> {
        self.selected_task().map(|t| t.id.clone())
    }

    pub fn active_stats(&self) -> CategoryStats {
        category_stats(self.engine.tasks(), self.active_category)
    }

    /// Stats per tab, in tab order
    pub fn tab_stats(&self) -> Vec<CategoryStats> {
        all_category_stats(self.engine.tasks())
    }

    pub fn time_remaining(&self) -> Duration {
        self.engine.time_remaining(&Local::now())
    }

    // ---- category / search / sort ----

    pub fn set_category(&mut self, category: Category) {
        if self.active_category != category {
            self.active_category = category;
            self.selected_index = 0;
        }
    }

    pub fn next_category(&mut self) {
        self.set_category(self.active_category.next());
    }

    pub fn previous_category(&mut self) {
        self.set_category(self.active_category.previous());
    }

    /// Select a tab by its 1-based position
    pub fn select_category_number(&mut self, number: usize) {
        if let Some(category) = number
            .checked_sub(1)
            .and_then(|idx| Category::all().get(idx))
        {
            self.set_category(*category);
        }
    }

    pub fn set_search_query(&mut self, query: String) {
        self.search_query = query;
        self.clamp_selection();
    }

    pub fn start_search(&mut self) {
        self.ui_mode = UiMode::Searching;
    }

    pub fn search_add_char(&mut self, c: char) {
        let mut query = std::mem::take(&mut self.search_query);
        query.push(c);
        self.set_search_query(query);
    }

    pub fn search_backspace(&mut self) {
        let mut query = std::mem::take(&mut self.search_query);
        query.pop();
        self.set_search_query(query);
    }

    /// Leave search mode, keeping the query
    pub fn finish_search(&mut self) {
        self.ui_mode = UiMode::Normal;
    }

    /// Leave search mode and drop the query
    pub fn clear_search(&mut self) {
        self.set_search_query(String::new());
        self.ui_mode = UiMode::Normal;
    }

    pub fn set_sort_option(&mut self, sort: SortOption) {
        self.sort = sort;
        self.clamp_selection();
    }

    pub fn cycle_sort(&mut self) {
        self.set_sort_option(self.sort.next());
        self.set_status(format!("Sort: {}", self.sort.label()));
    }

    // ---- selection ----

    pub fn move_selection_up(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
        }
    }

    pub fn move_selection_down(&mut self) {
        if self.selected_index + 1 < self.visible_tasks().len() {
            self.selected_index += 1;
        }
    }

    fn clamp_selection(&mut self) {
        let len = self.visible_tasks().len();
        if self.selected_index >= len {
            self.selected_index = len.saturating_sub(1);
        }
    }

    // ---- completion ----

    /// Space/Enter on the selected row
    pub fn toggle_selected(&mut self) {
        let Some(id) = self.selected_id() else {
            return;
        };

        match self.engine.request_toggle(&id) {
            Ok(ToggleOutcome::Staged(_)) => self.ui_mode = UiMode::ConfirmComplete,
            Ok(ToggleOutcome::Toggled(task)) => {
                if task.completed {
                    notifications::notify_task_completed(&task.text);
                    self.set_status(format!("Completed '{}'", task.text));
                } else {
                    self.set_status(format!("Reopened '{}'", task.text));
                }
            }
            Err(err) => self.set_error(&err),
        }
        self.clamp_selection();
        self.report_persistence_error();
    }

    pub fn confirm_completion(&mut self) {
        match self.engine.confirm_completion() {
            Ok(task) => {
                notifications::notify_task_completed(&task.text);
                self.set_status(format!("Completed '{}' until the next reset", task.text));
            }
            Err(err) => self.set_error(&err),
        }
        self.ui_mode = UiMode::Normal;
        self.clamp_selection();
        self.report_persistence_error();
    }

    pub fn cancel_completion(&mut self) {
        // Nothing pending is fine here: the modal just closes
        let _ = self.engine.cancel_completion();
        self.ui_mode = UiMode::Normal;
    }

    // ---- deletion ----

    pub fn request_delete_selected(&mut self) {
        let Some(id) = self.selected_id() else {
            return;
        };
        match self.engine.request_delete(&id) {
            Ok(_) => self.ui_mode = UiMode::ConfirmDelete,
            Err(err) => self.set_error(&err),
        }
    }

    pub fn confirm_delete(&mut self) {
        match self.engine.confirm_delete() {
            Ok(task) => self.set_status(format!("Deleted '{}'", task.text)),
            Err(err) => self.set_error(&err),
        }
        self.ui_mode = UiMode::Normal;
        self.clamp_selection();
        self.report_persistence_error();
    }

    pub fn cancel_delete(&mut self) {
        let _ = self.engine.cancel_delete();
        self.ui_mode = UiMode::Normal;
    }

    /// Task named by the pending confirmation, for the modal text
    pub fn pending_task(&self) -> Option<&Task> {
        let action = self.engine.confirmation().pending()?;
        self.engine.get(action.task_id())
    }

    // ---- add / edit form ----

    pub fn start_add_task(&mut self) {
        self.task_form = Some(TaskFormState::empty(self.active_category));
        self.ui_mode = UiMode::TaskForm;
    }

    pub fn start_edit_task(&mut self) {
        if let Some(task) = self.selected_task() {
            self.task_form = Some(TaskFormState::from_task(task));
            self.ui_mode = UiMode::TaskForm;
        }
    }

    /// Move to the next field (title -> description -> link -> status)
    pub fn form_next_field(&mut self) {
        if let Some(form) = &mut self.task_form {
            form.editing_field = (form.editing_field + 1) % FORM_FIELDS;
        }
    }

    pub fn form_previous_field(&mut self) {
        if let Some(form) = &mut self.task_form {
            form.editing_field = (form.editing_field + FORM_FIELDS - 1) % FORM_FIELDS;
        }
    }

    /// Type into the current field; on the status field any key cycles the status
    pub fn form_add_char(&mut self, c: char) {
        if let Some(form) = &mut self.task_form {
            match form.current_field_mut() {
                Some(field) => field.push(c),
                None => form.status = form.status.next(),
            }
        }
    }

    pub fn form_backspace(&mut self) {
        if let Some(field) = self.task_form.as_mut().and_then(|f| f.current_field_mut()) {
            field.pop();
        }
    }

    pub fn form_cycle_status(&mut self) {
        if let Some(form) = &mut self.task_form {
            form.status = form.status.next();
        }
    }

    /// Create or update from the form. On a validation error the form stays open.
    pub fn submit_task_form(&mut self) {
        let Some(form) = self.task_form.take() else {
            return;
        };

        let result = match &form.editing_id {
            None => {
                let input = NewTask::new(form.title.clone(), form.category)
                    .with_status(form.status)
                    .with_link(form.link.clone())
                    .with_description(form.description.clone());
                self.engine.create(input)
            }
            Some(id) => {
                let patch = TaskPatch {
                    text: Some(form.title.clone()),
                    status: Some(form.status),
                    link: Some(form.link.clone()),
                    description: Some(form.description.clone()),
                };
                self.engine.update(id, patch)
            }
        };

        match result {
            Ok(task) => {
                let verb = if form.editing_id.is_some() { "Updated" } else { "Added" };
                self.set_status(format!("{} '{}'", verb, task.text));
                self.ui_mode = UiMode::Normal;
                if form.editing_id.is_none() {
                    self.select_task(&task.id);
                }
            }
            Err(err) => {
                self.task_form = Some(TaskFormState {
                    error: Some(err.to_string()),
                    ..form
                });
            }
        }
        self.report_persistence_error();
    }

    pub fn cancel_task_form(&mut self) {
        self.task_form = None;
        self.ui_mode = UiMode::Normal;
    }

    /// Point the selection at a task if it is visible in the active tab
    fn select_task(&mut self, id: &str) {
        if let Some(idx) = self.visible_tasks().iter().position(|t| t.id == id) {
            self.selected_index = idx;
        }
    }

    // ---- reset time ----

    pub fn open_reset_time_editor(&mut self) {
        self.reset_time_input = self.engine.reset_time().to_string();
        self.status = None;
        self.ui_mode = UiMode::ResetTimeEditor;
    }

    pub fn reset_time_add_char(&mut self, c: char) {
        if c.is_ascii_digit() || c == ':' {
            self.reset_time_input.push(c);
        }
    }

    pub fn reset_time_backspace(&mut self) {
        self.reset_time_input.pop();
    }

    pub fn submit_reset_time(&mut self) {
        self.submit_reset_time_at(&Local::now());
    }

    pub fn submit_reset_time_at<Tz: TimeZone>(&mut self, now: &DateTime<Tz>) {
        let saved = self
            .reset_time_input
            .parse::<ResetTime>()
            .and_then(|reset_time| self.engine.save_reset_time(reset_time, now));

        match saved {
            Ok(report) => {
                self.set_status(format!("Daily reset at {}", self.engine.reset_time()));
                self.ui_mode = UiMode::Normal;
                if let Some(report) = report {
                    self.after_reset(&report);
                }
            }
            // Keep the editor open so the value can be fixed
            Err(err) => self.set_error(&err),
        }
        self.report_persistence_error();
    }

    pub fn cancel_reset_time(&mut self) {
        self.ui_mode = UiMode::Normal;
    }

    // ---- export / import ----

    /// Write an export file into the data directory
    pub fn export_now(&mut self) {
        let path = default_export_file(&self.data_dir, Local::now().date_naive());
        match self.engine.export_to_file(&path, Utc::now()) {
            Ok(()) => self.set_status(format!("Exported to {}", path.display())),
            Err(err) => self.set_error(&err),
        }
    }

    pub fn start_import(&mut self) {
        self.import_path_input.clear();
        self.status = None;
        self.ui_mode = UiMode::ImportPrompt;
    }

    pub fn import_add_char(&mut self, c: char) {
        self.import_path_input.push(c);
    }

    pub fn import_backspace(&mut self) {
        self.import_path_input.pop();
    }

    pub fn submit_import(&mut self) {
        self.submit_import_at(&Local::now());
    }

    pub fn submit_import_at<Tz: TimeZone>(&mut self, now: &DateTime<Tz>) {
        let path = PathBuf::from(self.import_path_input.trim());
        match self.engine.import_file(&path, now) {
            Ok(summary) => {
                self.selected_index = 0;
                self.set_status(format!("Imported {} tasks", summary.imported));
            }
            Err(err) => self.set_error(&err),
        }
        self.ui_mode = UiMode::Normal;
        self.report_persistence_error();
    }

    pub fn cancel_import(&mut self) {
        self.ui_mode = UiMode::Normal;
    }

    // ---- periodic work ----

    /// Called once per loop iteration: runs the reset check
    pub fn tick(&mut self) {
        self.tick_at(&Local::now());
    }

    pub fn tick_at<Tz: TimeZone>(&mut self, now: &DateTime<Tz>) {
        if let Some(report) = self.engine.apply_reset_if_due(now) {
            self.after_reset(&report);
        }
        self.report_persistence_error();
    }

    fn after_reset(&mut self, report: &ResetReport) {
        if report.cleared > 0 {
            notifications::notify_daily_reset(report.cleared);
            self.set_status(format!(
                "New day: {} daily task(s) ready again",
                report.cleared
            ));
        }
        self.clamp_selection();
    }

    // ---- status line ----

    pub fn set_status(&mut self, text: String) {
        self.status = Some(StatusMessage {
            text,
            is_error: false,
        });
    }

    fn set_error(&mut self, err: &EngineError) {
        self.status = Some(StatusMessage {
            text: err.to_string(),
            is_error: true,
        });
    }

    /// Surface a write failure the engine recorded; state stays as is
    fn report_persistence_error(&mut self) {
        if let Some(err) = self.engine.take_persistence_error() {
            self.set_error(&err);
        }
    }
}
