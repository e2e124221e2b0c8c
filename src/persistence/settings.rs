use crate::domain::ResetTime;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Settings record stored in settings.json
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default)]
    pub reset_time: ResetTime,
    /// Boundary key of the most recent reset that was applied
    #[serde(default)]
    pub last_reset_marker: Option<String>,
}

/// Load settings from settings.json
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<Settings> {
    let path = path.as_ref();

    if !path.exists() {
        // First run: midnight reset, no reset applied yet
        return Ok(Settings::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings: {}", path.display()))?;
    let settings: Settings = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse settings: {}", path.display()))?;

    // Out-of-range values from a hand-edited file fall back to midnight
    if ResetTime::new(settings.reset_time.hour, settings.reset_time.minute).is_err() {
        tracing::warn!(
            hour = settings.reset_time.hour,
            minute = settings.reset_time.minute,
            "stored reset time out of range, using 00:00"
        );
        return Ok(Settings {
            reset_time: ResetTime::default(),
            ..settings
        });
    }

    Ok(settings)
}

/// Save settings to settings.json
pub fn save_settings<P: AsRef<Path>>(path: P, settings: &Settings) -> Result<()> {
    let json = serde_json::to_string_pretty(settings)?;
    crate::persistence::atomic_write(path, &json)?;
    Ok(())
}
