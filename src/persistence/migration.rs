use crate::domain::{Category, Task, TaskStatus};
use crate::error::{EngineError, EngineResult};
use chrono::{DateTime, TimeZone, Utc};
use serde_json::{Map, Value};

/// Upgrade one imported task element to the current `Task` shape
///
/// Required: `id` (string), `text` (string), `completed` (boolean), category
/// (`type` or `category`, a known value) and `createdAt` (number, epoch ms).
/// Older documents without `status` get `early`. `completedAt` is kept only on
/// completed tasks; a completed task without one inherits `createdAt`.
pub fn upgrade_task(value: &Value, index: usize) -> EngineResult<Task> {
    let obj = value
        .as_object()
        .ok_or_else(|| schema(index, "task must be an object"))?;

    let id = required_str(obj, "id", index)?;
    if id.trim().is_empty() {
        return Err(schema(index, "'id' must not be empty"));
    }
    let text = required_str(obj, "text", index)?;
    let completed = obj
        .get("completed")
        .and_then(Value::as_bool)
        .ok_or_else(|| schema(index, "'completed' must be a boolean"))?;

    let category_tag = obj
        .get("type")
        .or_else(|| obj.get("category"))
        .and_then(Value::as_str)
        .ok_or_else(|| schema(index, "'type' must be a string"))?;
    let category = Category::from_tag(category_tag)
        .ok_or_else(|| schema(index, &format!("unknown task type '{}'", category_tag)))?;

    let created_at = obj
        .get("createdAt")
        .ok_or_else(|| schema(index, "'createdAt' must be a number"))
        .and_then(|v| millis_to_datetime(v, "createdAt", index))?;

    let status = match obj.get("status") {
        None | Some(Value::Null) => TaskStatus::default(),
        Some(Value::String(tag)) => TaskStatus::from_tag(tag)
            .ok_or_else(|| schema(index, &format!("unknown status '{}'", tag)))?,
        Some(_) => return Err(schema(index, "'status' must be a string")),
    };

    let completed_at = if completed {
        match obj.get("completedAt") {
            None | Some(Value::Null) => Some(created_at),
            Some(v) => Some(millis_to_datetime(v, "completedAt", index)?),
        }
    } else {
        None
    };

    Ok(Task {
        id: id.to_string(),
        text: text.to_string(),
        completed,
        category,
        status,
        created_at,
        completed_at,
        link: optional_str(obj, "link", index)?,
        description: optional_str(obj, "description", index)?,
    })
}

fn schema(index: usize, message: &str) -> EngineError {
    EngineError::Schema(format!("task #{}: {}", index + 1, message))
}

fn required_str<'a>(obj: &'a Map<String, Value>, key: &str, index: usize) -> EngineResult<&'a str> {
    obj.get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| schema(index, &format!("'{}' must be a string", key)))
}

fn optional_str(obj: &Map<String, Value>, key: &str, index: usize) -> EngineResult<Option<String>> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(schema(index, &format!("'{}' must be a string", key))),
    }
}

/// Epoch milliseconds (integer or float) to a UTC timestamp
fn millis_to_datetime(value: &Value, key: &str, index: usize) -> EngineResult<DateTime<Utc>> {
    let millis = value
        .as_i64()
        .or_else(|| value.as_f64().filter(|f| f.is_finite()).map(|f| f.round() as i64))
        .ok_or_else(|| schema(index, &format!("'{}' must be a number", key)))?;
    Utc.timestamp_millis_opt(millis)
        .single()
        .ok_or_else(|| schema(index, &format!("'{}' is out of range", key)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_upgrade_full_task() {
        let value = json!({
            "id": "1700000000000",
            "text": "Daily check-in",
            "completed": true,
            "type": "daily",
            "status": "ongoing",
            "createdAt": 1700000000000i64,
            "completedAt": 1700000500000i64,
            "link": "example.com",
            "description": "gm"
        });
        let task = upgrade_task(&value, 0).unwrap();
        assert_eq!(task.id, "1700000000000");
        assert_eq!(task.category, Category::Daily);
        assert_eq!(task.status, TaskStatus::Ongoing);
        assert_eq!(task.completed_at.unwrap().timestamp_millis(), 1700000500000);
        assert_eq!(task.link.as_deref(), Some("example.com"));
    }

    #[test]
    fn test_missing_status_defaults_to_early() {
        let value = json!({
            "id": "a", "text": "Old task", "completed": false,
            "type": "note", "createdAt": 1
        });
        assert_eq!(upgrade_task(&value, 0).unwrap().status, TaskStatus::Early);
    }

    #[test]
    fn test_category_field_and_float_timestamp() {
        let value = json!({
            "id": "a", "text": "T", "completed": false,
            "category": "social-links", "createdAt": 1700000000000.4
        });
        let task = upgrade_task(&value, 0).unwrap();
        assert_eq!(task.category, Category::SocialLinks);
        assert_eq!(task.created_at.timestamp_millis(), 1700000000000);
    }

    #[test]
    fn test_completed_at_invariant_is_restored() {
        let stale = json!({
            "id": "a", "text": "T", "completed": false, "type": "daily",
            "createdAt": 5, "completedAt": 10
        });
        assert_eq!(upgrade_task(&stale, 0).unwrap().completed_at, None);

        let missing = json!({
            "id": "b", "text": "T", "completed": true, "type": "daily", "createdAt": 5
        });
        assert_eq!(
            upgrade_task(&missing, 0).unwrap().completed_at.unwrap().timestamp_millis(),
            5
        );
    }

    #[test]
    fn test_rejects_bad_shapes() {
        let cases = vec![
            json!("not an object"),
            json!({"text": "T", "completed": false, "type": "daily", "createdAt": 1}),
            json!({"id": 7, "text": "T", "completed": false, "type": "daily", "createdAt": 1}),
            json!({"id": "a", "text": "T", "completed": "no", "type": "daily", "createdAt": 1}),
            json!({"id": "a", "text": "T", "completed": false, "type": "weekly", "createdAt": 1}),
            json!({"id": "a", "text": "T", "completed": false, "type": "daily", "createdAt": "today"}),
            json!({"id": "a", "text": "T", "completed": false, "type": "daily", "createdAt": 1, "status": "later"}),
            json!({"id": "a", "text": "T", "completed": false, "type": "daily", "createdAt": 1, "link": 3}),
        ];
        for (i, case) in cases.iter().enumerate() {
            let result = upgrade_task(case, i);
            assert!(
                matches!(result, Err(EngineError::Schema(_))),
                "case {} should fail",
                i
            );
        }
    }

    #[test]
    fn test_error_names_element() {
        let value = json!({"id": "a", "text": "T", "completed": false, "type": "daily"});
        let err = upgrade_task(&value, 4).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid import file: task #5: 'createdAt' must be a number"
        );
    }
}
