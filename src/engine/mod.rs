//! Task state engine: the owned collection, its settings and the single pending
//! confirmation, with write-through persistence on every mutation.
//!
//! Operations are split by concern: `store` (create/update/delete/toggle),
//! `reset` (daily boundary handling and the reset time), `confirm` (the command
//! boundary: completion lock and two-phase completion/deletion) and `gateway`
//! (import/export).

pub mod confirm;
pub mod gateway;
pub mod reset;
pub mod store;

pub use confirm::{Confirmation, PendingAction, ToggleOutcome};
pub use gateway::ImportSummary;
pub use reset::{ResetReport, ResetState};

use crate::domain::{ResetTime, Task};
use crate::error::EngineError;
use crate::persistence::{Settings, Storage};
use chrono::{DateTime, TimeZone};
use std::collections::HashSet;

/// Authoritative in-memory state plus the storage it writes through to
pub struct Engine {
    tasks: Vec<Task>,
    settings: Settings,
    confirmation: Confirmation,
    storage: Box<dyn Storage>,
    /// Most recent write/read failure not yet reported to the caller
    persistence_error: Option<EngineError>,
}

impl Engine {
    /// Load both records from storage, then run the reset check for `now`
    ///
    /// Unreadable records are reported through `take_persistence_error` and replaced
    /// by empty defaults; the engine is always usable.
    pub fn load<Tz: TimeZone>(storage: Box<dyn Storage>, now: &DateTime<Tz>) -> Self {
        let mut errors = Vec::new();

        let tasks = storage.load_tasks().unwrap_or_else(|err| {
            let message = format!("{:#}", err);
            tracing::warn!(error = %message, "failed to load tasks");
            errors.push(message);
            Vec::new()
        });
        let settings = storage.load_settings().unwrap_or_else(|err| {
            let message = format!("{:#}", err);
            tracing::warn!(error = %message, "failed to load settings");
            errors.push(message);
            Settings::default()
        });

        let mut engine = Self::with_state(storage, tasks, settings);
        if !errors.is_empty() {
            engine.persistence_error = Some(EngineError::Persistence(errors.join("; ")));
        }
        engine.apply_reset_if_due(now);
        engine
    }

    /// Build an engine from already loaded state (no reset check)
    pub fn with_state(storage: Box<dyn Storage>, tasks: Vec<Task>, settings: Settings) -> Self {
        let mut engine = Self {
            tasks,
            settings,
            confirmation: Confirmation::Idle,
            storage,
            persistence_error: None,
        };
        engine.ensure_unique_ids();
        tracing::debug!(tasks = engine.tasks.len(), "engine ready");
        engine
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn reset_time(&self) -> ResetTime {
        self.settings.reset_time
    }

    pub fn confirmation(&self) -> &Confirmation {
        &self.confirmation
    }

    /// Hand the last persistence failure to the caller (clears it)
    pub fn take_persistence_error(&mut self) -> Option<EngineError> {
        self.persistence_error.take()
    }

    fn index_of(&self, id: &str) -> Option<usize> {
        self.tasks.iter().position(|t| t.id == id)
    }

    /// Regenerate IDs that collide with an earlier task (hand-edited data files)
    fn ensure_unique_ids(&mut self) {
        let mut seen = HashSet::new();
        for task in &mut self.tasks {
            if !seen.insert(task.id.clone()) {
                let fresh = Task::generate_id();
                tracing::warn!(old = %task.id, new = %fresh, "duplicate task id regenerated");
                task.id = fresh.clone();
                seen.insert(fresh);
            }
        }
    }

    /// Write-through of the task record; failures are kept, never rolled back
    fn persist_tasks(&mut self) {
        if let Err(err) = self.storage.save_tasks(&self.tasks) {
            tracing::warn!(error = %format!("{:#}", err), "failed to save tasks");
            self.persistence_error = Some(EngineError::persistence(err));
        }
    }

    fn persist_settings(&mut self) {
        if let Err(err) = self.storage.save_settings(&self.settings) {
            tracing::warn!(error = %format!("{:#}", err), "failed to save settings");
            self.persistence_error = Some(EngineError::persistence(err));
        }
    }

    /// Both records, written before control returns to the caller
    fn persist_all(&mut self) {
        if let Err(err) = self.storage.save_all(&self.tasks, &self.settings) {
            tracing::warn!(error = %format!("{:#}", err), "failed to save tasks and settings");
            self.persistence_error = Some(EngineError::persistence(err));
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::domain::{Category, NewTask};
    use crate::persistence::storage::MemoryStorage;
    use chrono::{FixedOffset, Utc};

    pub fn engine() -> Engine {
        Engine::with_state(Box::new(MemoryStorage::default()), Vec::new(), Settings::default())
    }

    pub fn failing_engine() -> Engine {
        let storage = MemoryStorage {
            fail_writes: true,
            ..MemoryStorage::default()
        };
        Engine::with_state(Box::new(storage), Vec::new(), Settings::default())
    }

    pub fn add(engine: &mut Engine, text: &str, category: Category) -> Task {
        engine
            .create(NewTask::new(text, category).with_description("details"))
            .unwrap()
    }

    /// Local time in a fixed +02:00 zone
    pub fn local(day: u32, hour: u32, minute: u32, second: u32) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(2 * 3600)
            .unwrap()
            .with_ymd_and_hms(2024, 3, day, hour, minute, second)
            .unwrap()
    }

    pub fn utc_now() -> DateTime<Utc> {
        Utc::now()
    }
}
