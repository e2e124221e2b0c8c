use super::Engine;
use crate::domain::{NewTask, Task, TaskPatch};
use crate::error::{EngineError, EngineResult};
use chrono::{DateTime, Utc};

impl Engine {
    /// Create a task and append it to the collection
    pub fn create(&mut self, input: NewTask) -> EngineResult<Task> {
        self.create_at(input, Utc::now())
    }

    pub fn create_at(&mut self, input: NewTask, now: DateTime<Utc>) -> EngineResult<Task> {
        input.validate()?;

        let mut id = Task::generate_id();
        while self.index_of(&id).is_some() {
            id = Task::generate_id();
        }

        let task = Task::new(id, input, now);
        tracing::info!(id = %task.id, category = %task.category, "task created");
        self.tasks.push(task.clone());
        self.persist_tasks();
        Ok(task)
    }

    /// Edit text, status, link or description. Category and ID never change.
    pub fn update(&mut self, id: &str, patch: TaskPatch) -> EngineResult<Task> {
        let idx = self
            .index_of(id)
            .ok_or_else(|| EngineError::NotFound(id.to_string()))?;
        patch.validate()?;

        if patch.is_empty() {
            return Ok(self.tasks[idx].clone());
        }

        self.tasks[idx].apply_patch(patch);
        let task = self.tasks[idx].clone();
        tracing::info!(id = %task.id, "task updated");
        self.persist_tasks();
        Ok(task)
    }

    /// Remove a task immediately (callers gate this behind confirmation)
    pub fn delete(&mut self, id: &str) -> EngineResult<Task> {
        let idx = self
            .index_of(id)
            .ok_or_else(|| EngineError::NotFound(id.to_string()))?;

        let task = self.tasks.remove(idx);
        tracing::info!(id = %task.id, "task deleted");
        self.persist_tasks();
        Ok(task)
    }

    /// Flip completion without any category policy. The completion lock lives in
    /// `request_toggle`; this is the primitive it and the confirmation step call.
    pub fn toggle_completion(&mut self, id: &str) -> EngineResult<Task> {
        self.toggle_completion_at(id, Utc::now())
    }

    pub fn toggle_completion_at(&mut self, id: &str, now: DateTime<Utc>) -> EngineResult<Task> {
        let idx = self
            .index_of(id)
            .ok_or_else(|| EngineError::NotFound(id.to_string()))?;

        self.tasks[idx].toggle(now);
        let task = self.tasks[idx].clone();
        tracing::info!(id = %task.id, completed = task.completed, "task toggled");
        self.persist_tasks();
        Ok(task)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use crate::domain::{Category, NewTask, TaskPatch, TaskStatus};
    use crate::error::EngineError;
    use std::collections::HashSet;

    #[test]
    fn test_create_assigns_unique_ids() {
        let mut engine = engine();
        let mut ids = HashSet::new();
        for i in 0..50 {
            let task = add(&mut engine, &format!("Task {}", i), Category::NoteOnly);
            assert!(ids.insert(task.id));
        }
        assert_eq!(engine.tasks().len(), 50);
    }

    #[test]
    fn test_create_validation_leaves_store_untouched() {
        let mut engine = engine();
        let err = engine
            .create(NewTask::new("", Category::Daily).with_description("x"))
            .unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));

        let err = engine
            .create(
                NewTask::new("Swap", Category::Daily)
                    .with_description("x")
                    .with_link("bad link"),
            )
            .unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));
        assert!(engine.tasks().is_empty());
    }

    #[test]
    fn test_create_fields() {
        let mut engine = engine();
        let task = engine
            .create(
                NewTask::new("  Join waitlist ", Category::Waitlist)
                    .with_status(TaskStatus::Ongoing)
                    .with_link("example.com")
                    .with_description("priority list"),
            )
            .unwrap();
        assert_eq!(task.text, "Join waitlist");
        assert_eq!(task.status, TaskStatus::Ongoing);
        assert!(!task.completed);
        assert!(task.completed_at.is_none());
        assert_eq!(engine.tasks()[0], task);
    }

    #[test]
    fn test_update() {
        let mut engine = engine();
        let task = add(&mut engine, "Old", Category::Testnet);

        let updated = engine
            .update(
                &task.id,
                TaskPatch {
                    text: Some("New".to_string()),
                    status: Some(TaskStatus::Ended),
                    ..TaskPatch::default()
                },
            )
            .unwrap();
        assert_eq!(updated.text, "New");
        assert_eq!(updated.status, TaskStatus::Ended);
        assert_eq!(updated.category, Category::Testnet);
        assert_eq!(updated.id, task.id);
        assert_eq!(updated.created_at, task.created_at);
    }

    #[test]
    fn test_update_errors() {
        let mut engine = engine();
        let task = add(&mut engine, "Keep", Category::Testnet);

        assert!(matches!(
            engine.update("missing", TaskPatch::default()),
            Err(EngineError::NotFound(_))
        ));
        let bad_link = TaskPatch {
            link: Some("no way".to_string()),
            ..TaskPatch::default()
        };
        assert!(matches!(
            engine.update(&task.id, bad_link),
            Err(EngineError::Validation(_))
        ));
        let empty_title = TaskPatch {
            text: Some("  ".to_string()),
            ..TaskPatch::default()
        };
        assert!(matches!(
            engine.update(&task.id, empty_title),
            Err(EngineError::Validation(_))
        ));
        assert_eq!(engine.tasks()[0].text, "Keep");
    }

    #[test]
    fn test_delete() {
        let mut engine = engine();
        let a = add(&mut engine, "A", Category::NoteOnly);
        let b = add(&mut engine, "B", Category::NoteOnly);

        engine.delete(&a.id).unwrap();
        assert_eq!(engine.tasks().len(), 1);
        assert_eq!(engine.tasks()[0].id, b.id);
        assert!(matches!(engine.delete(&a.id), Err(EngineError::NotFound(_))));
    }

    #[test]
    fn test_toggle_note_twice_restores_state() {
        let mut engine = engine();
        let task = add(&mut engine, "Note", Category::NoteOnly);

        let on = engine.toggle_completion(&task.id).unwrap();
        assert!(on.completed);
        assert!(on.completed_at.is_some());

        let off = engine.toggle_completion(&task.id).unwrap();
        assert!(!off.completed);
        assert!(off.completed_at.is_none());
    }

    #[test]
    fn test_mutation_survives_write_failure() {
        let mut engine = failing_engine();
        let task = add(&mut engine, "Offline", Category::NoteOnly);
        engine.take_persistence_error();

        engine.toggle_completion(&task.id).unwrap();
        assert!(engine.tasks()[0].completed);
        assert!(engine.take_persistence_error().is_some());
    }
}
