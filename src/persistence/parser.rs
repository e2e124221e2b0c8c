use super::migration::upgrade_task;
use super::serializer::EXPORT_VERSION;
use crate::domain::{ResetTime, Task};
use crate::error::{EngineError, EngineResult};
use serde_json::Value;
use std::collections::HashSet;

/// A validated import, ready to replace the store
#[derive(Debug, Clone, PartialEq)]
pub struct ImportPayload {
    pub tasks: Vec<Task>,
    /// Present only for full documents that carried one
    pub reset_time: Option<ResetTime>,
}

/// Parse and validate an import document
///
/// Accepts a full export document or a bare task array (legacy exports). Every task
/// must validate; the first failure rejects the whole document.
pub fn parse_import(content: &str) -> EngineResult<ImportPayload> {
    let root: Value = serde_json::from_str(content)
        .map_err(|e| EngineError::Schema(format!("not valid JSON: {}", e)))?;

    let (elements, reset_time) = match &root {
        // Legacy format: bare array of tasks
        Value::Array(items) => (items, None),
        Value::Object(obj) => {
            check_version(obj.get("version"))?;
            let items = obj
                .get("tasks")
                .and_then(Value::as_array)
                .ok_or_else(|| EngineError::Schema("no task list found".to_string()))?;
            let reset_time = match obj.get("customResetTime") {
                None | Some(Value::Null) => None,
                Some(value) => Some(parse_reset_time(value)?),
            };
            (items, reset_time)
        }
        _ => return Err(EngineError::Schema("no task list found".to_string())),
    };

    let mut seen = HashSet::new();
    let mut tasks = Vec::with_capacity(elements.len());
    for (index, element) in elements.iter().enumerate() {
        let task = upgrade_task(element, index)?;
        if !seen.insert(task.id.clone()) {
            return Err(EngineError::Schema(format!(
                "task #{}: duplicate id '{}'",
                index + 1,
                task.id
            )));
        }
        tasks.push(task);
    }

    Ok(ImportPayload { tasks, reset_time })
}

/// Documents from a newer major format are refused rather than half-understood
fn check_version(version: Option<&Value>) -> EngineResult<()> {
    let supported_major = EXPORT_VERSION.split('.').next().unwrap_or("1");
    match version {
        None | Some(Value::Null) => Ok(()),
        Some(Value::String(v)) if v.split('.').next() == Some(supported_major) => Ok(()),
        Some(Value::String(v)) => Err(EngineError::Schema(format!(
            "unsupported format version '{}'",
            v
        ))),
        Some(_) => Err(EngineError::Schema("'version' must be a string".to_string())),
    }
}

fn parse_reset_time(value: &Value) -> EngineResult<ResetTime> {
    let field = |key: &str| {
        value
            .get(key)
            .and_then(Value::as_u64)
            .and_then(|n| u32::try_from(n).ok())
            .ok_or_else(|| {
                EngineError::Schema(format!("'customResetTime.{}' must be a whole number", key))
            })
    };
    let hour = field("hour")?;
    let minute = field("minute")?;
    ResetTime::new(hour, minute).map_err(|e| match e {
        EngineError::Validation(msg) => EngineError::Schema(msg),
        other => other,
    })
}
