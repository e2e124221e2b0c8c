use thiserror::Error;

/// Errors reported by the task engine.
///
/// None of these are fatal: the engine stays usable after any of them. Only
/// `Persistence` can occur after an in-memory mutation has already been applied.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Bad task fields (empty title/description, malformed link, bad reset time)
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Task not found: {0}")]
    NotFound(String),

    /// Malformed or unrecognized import document
    #[error("Invalid import file: {0}")]
    Schema(String),

    #[error("Failed to save data: {0}")]
    Persistence(String),

    /// Direct un-completion of a daily task before the next reset
    #[error("Daily task is locked until the next reset: {0}")]
    CompletionLocked(String),

    #[error("No task is waiting for confirmation")]
    NoPendingConfirmation,
}

impl EngineError {
    /// Wrap a storage failure, keeping the full context chain in the message
    pub fn persistence(err: anyhow::Error) -> Self {
        Self::Persistence(format!("{:#}", err))
    }

    /// Whether the in-memory state may have changed despite this error
    pub fn is_persistence(&self) -> bool {
        matches!(self, Self::Persistence(_))
    }
}

pub type EngineResult<T> = std::result::Result<T, EngineError>;
