use super::Engine;
use crate::domain::ResetTime;
use crate::error::EngineResult;
use chrono::{DateTime, Duration, TimeZone};

/// Whether the stored marker matches the current reset day
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResetState {
    Settled,
    ResetDue { key: String },
}

/// What a reset did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResetReport {
    /// Boundary key now stored as the last-reset marker
    pub key: String,
    /// Daily tasks whose completion was cleared
    pub cleared: usize,
}

impl Engine {
    pub fn reset_state<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> ResetState {
        let key = self.settings.reset_time.current_boundary_key(now);
        if self.settings.last_reset_marker.as_deref() == Some(key.as_str()) {
            ResetState::Settled
        } else {
            ResetState::ResetDue { key }
        }
    }

    /// Clear completion of reset-eligible tasks if the boundary key moved on
    ///
    /// Runs at most once per key: a second call with the same key is a no-op.
    /// Tasks and marker are written together before returning; the task record is
    /// only written when a completion was actually cleared.
    pub fn apply_reset_if_due<Tz: TimeZone>(&mut self, now: &DateTime<Tz>) -> Option<ResetReport> {
        let key = match self.reset_state(now) {
            ResetState::Settled => return None,
            ResetState::ResetDue { key } => key,
        };

        let mut cleared = 0;
        for task in self
            .tasks
            .iter_mut()
            .filter(|t| t.category.is_reset_eligible())
        {
            if task.completed || task.completed_at.is_some() {
                task.clear_completion();
                cleared += 1;
            }
        }

        tracing::info!(key = %key, cleared, "daily reset applied");
        self.settings.last_reset_marker = Some(key.clone());
        // An untouched collection is not rewritten; it may be a stand-in for an
        // unreadable tasks file
        if cleared > 0 {
            self.persist_all();
        } else {
            self.persist_settings();
        }

        Some(ResetReport { key, cleared })
    }

    /// Save a new reset time and re-evaluate the reset state right away
    pub fn save_reset_time<Tz: TimeZone>(
        &mut self,
        reset_time: ResetTime,
        now: &DateTime<Tz>,
    ) -> EngineResult<Option<ResetReport>> {
        let reset_time = ResetTime::new(reset_time.hour, reset_time.minute)?;
        tracing::info!(reset_time = %reset_time, "reset time saved");
        self.settings.reset_time = reset_time;
        self.persist_settings();
        Ok(self.apply_reset_if_due(now))
    }

    /// Time left until the next boundary
    pub fn time_remaining<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Duration {
        self.settings.reset_time.remaining(now)
    }
}
