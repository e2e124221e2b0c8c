use super::files::{atomic_write, backup_file, read_file, settings_file, tasks_file};
use super::settings::{load_settings, save_settings, Settings};
use crate::domain::Task;
use anyhow::{Context, Result};
use std::path::PathBuf;

/// Durable store for the two records: the task collection and the settings.
/// Each record is read and written as a whole document.
pub trait Storage {
    fn load_tasks(&self) -> Result<Vec<Task>>;
    fn save_tasks(&mut self, tasks: &[Task]) -> Result<()>;
    fn load_settings(&self) -> Result<Settings>;
    fn save_settings(&mut self, settings: &Settings) -> Result<()>;

    /// Write both records before returning (used when a reset or import touches both)
    fn save_all(&mut self, tasks: &[Task], settings: &Settings) -> Result<()> {
        self.save_tasks(tasks)?;
        self.save_settings(settings)
    }
}

/// JSON files in the data directory
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    dir: PathBuf,
}

impl JsonFileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl Storage for JsonFileStorage {
    fn load_tasks(&self) -> Result<Vec<Task>> {
        let path = tasks_file(&self.dir);
        let loaded = read_file(&path).and_then(|content| {
            if content.trim().is_empty() {
                return Ok(Vec::new());
            }
            serde_json::from_str::<Vec<Task>>(&content).context("Invalid task JSON")
        });

        loaded.or_else(|err| {
            // Keep a copy before the next write replaces the unreadable file
            let backup = backup_file(&path)?;
            tracing::warn!(backup = %backup.display(), "tasks file unreadable, backed up");
            Err(err.context(format!(
                "Failed to load {} (backup saved to {})",
                path.display(),
                backup.display()
            )))
        })
    }

    fn save_tasks(&mut self, tasks: &[Task]) -> Result<()> {
        let json = serde_json::to_string_pretty(tasks)?;
        atomic_write(tasks_file(&self.dir), &json)
    }

    fn load_settings(&self) -> Result<Settings> {
        let path = settings_file(&self.dir);
        match load_settings(&path) {
            Ok(settings) => Ok(settings),
            Err(err) => {
                let backup = backup_file(&path)?;
                tracing::warn!(backup = %backup.display(), "settings file unreadable, backed up");
                Err(err)
            }
        }
    }

    fn save_settings(&mut self, settings: &Settings) -> Result<()> {
        save_settings(settings_file(&self.dir), settings)
    }
}

/// In-memory storage for engine tests; can be told to fail writes
#[cfg(test)]
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    pub tasks: Vec<Task>,
    pub settings: Settings,
    pub fail_writes: bool,
    pub task_writes: usize,
    pub settings_writes: usize,
}

#[cfg(test)]
impl Storage for MemoryStorage {
    fn load_tasks(&self) -> Result<Vec<Task>> {
        Ok(self.tasks.clone())
    }

    fn save_tasks(&mut self, tasks: &[Task]) -> Result<()> {
        if self.fail_writes {
            anyhow::bail!("simulated write failure");
        }
        self.tasks = tasks.to_vec();
        self.task_writes += 1;
        Ok(())
    }

    fn load_settings(&self) -> Result<Settings> {
        Ok(self.settings.clone())
    }

    fn save_settings(&mut self, settings: &Settings) -> Result<()> {
        if self.fail_writes {
            anyhow::bail!("simulated write failure");
        }
        self.settings = settings.clone();
        self.settings_writes += 1;
        Ok(())
    }
}
