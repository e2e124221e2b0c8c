use super::Engine;
use crate::domain::Task;
use crate::error::{EngineError, EngineResult};

/// Action waiting for explicit user confirmation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingAction {
    /// Completing a reset-eligible task (irreversible until the next reset)
    Complete(String),
    Delete(String),
}

impl PendingAction {
    pub fn task_id(&self) -> &str {
        match self {
            Self::Complete(id) | Self::Delete(id) => id,
        }
    }
}

/// Single confirmation slot shared by completion and deletion
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Confirmation {
    #[default]
    Idle,
    PendingConfirmation(PendingAction),
    Confirmed(PendingAction),
}

impl Confirmation {
    pub fn pending(&self) -> Option<&PendingAction> {
        match self {
            Self::PendingConfirmation(action) => Some(action),
            _ => None,
        }
    }
}

/// Result of a direct toggle request
#[derive(Debug, Clone, PartialEq)]
pub enum ToggleOutcome {
    /// Completion state changed
    Toggled(Task),
    /// Waiting for `confirm_completion` / `cancel_completion`
    Staged(Task),
}

impl Engine {
    /// Direct user toggle, with the per-category completion policy applied
    ///
    /// - incomplete daily task: staged for confirmation, nothing changes yet
    /// - completed daily task: refused until the next reset
    /// - any other category: toggled immediately
    pub fn request_toggle(&mut self, id: &str) -> EngineResult<ToggleOutcome> {
        let task = self
            .get(id)
            .ok_or_else(|| EngineError::NotFound(id.to_string()))?;

        if task.is_locked() {
            return Err(EngineError::CompletionLocked(task.text.clone()));
        }
        if task.category.requires_confirmation() {
            return self.stage_completion(id).map(ToggleOutcome::Staged);
        }
        self.toggle_completion(id).map(ToggleOutcome::Toggled)
    }

    /// Phase one of completing a task: remember it, change nothing
    pub fn stage_completion(&mut self, id: &str) -> EngineResult<Task> {
        let task = self
            .get(id)
            .cloned()
            .ok_or_else(|| EngineError::NotFound(id.to_string()))?;

        if task.completed {
            return Err(if task.is_locked() {
                EngineError::CompletionLocked(task.text)
            } else {
                EngineError::Validation(format!("'{}' is already completed", task.text))
            });
        }

        tracing::debug!(id = %task.id, "completion staged");
        self.confirmation =
            Confirmation::PendingConfirmation(PendingAction::Complete(task.id.clone()));
        Ok(task)
    }

    /// Phase two: complete the staged task
    pub fn confirm_completion(&mut self) -> EngineResult<Task> {
        let id = match self.confirmation.pending() {
            Some(PendingAction::Complete(id)) => id.clone(),
            _ => return Err(EngineError::NoPendingConfirmation),
        };

        let staged = match self.get(&id) {
            Some(task) => task.clone(),
            None => {
                self.confirmation = Confirmation::Idle;
                return Err(EngineError::NotFound(id));
            }
        };

        // Already completed (e.g. confirmed elsewhere): nothing to flip
        let task = if staged.completed {
            staged
        } else {
            self.toggle_completion(&id)?
        };
        self.confirmation = Confirmation::Confirmed(PendingAction::Complete(id));
        Ok(task)
    }

    /// Drop the staged completion without touching the task
    pub fn cancel_completion(&mut self) -> EngineResult<()> {
        match self.confirmation.pending() {
            Some(PendingAction::Complete(_)) => {
                self.confirmation = Confirmation::Idle;
                Ok(())
            }
            _ => Err(EngineError::NoPendingConfirmation),
        }
    }

    /// Phase one of deleting a task
    pub fn request_delete(&mut self, id: &str) -> EngineResult<Task> {
        let task = self
            .get(id)
            .cloned()
            .ok_or_else(|| EngineError::NotFound(id.to_string()))?;
        self.confirmation = Confirmation::PendingConfirmation(PendingAction::Delete(task.id.clone()));
        Ok(task)
    }

    pub fn confirm_delete(&mut self) -> EngineResult<Task> {
        let id = match self.confirmation.pending() {
            Some(PendingAction::Delete(id)) => id.clone(),
            _ => return Err(EngineError::NoPendingConfirmation),
        };
        let result = self.delete(&id);
        self.confirmation = match result {
            Ok(_) => Confirmation::Confirmed(PendingAction::Delete(id)),
            Err(_) => Confirmation::Idle,
        };
        result
    }

    pub fn cancel_delete(&mut self) -> EngineResult<()> {
        match self.confirmation.pending() {
            Some(PendingAction::Delete(_)) => {
                self.confirmation = Confirmation::Idle;
                Ok(())
            }
            _ => Err(EngineError::NoPendingConfirmation),
        }
    }

    /// Forget any pending confirmation (the collection was replaced)
    pub(crate) fn clear_confirmation(&mut self) {
        self.confirmation = Confirmation::Idle;
    }
}
