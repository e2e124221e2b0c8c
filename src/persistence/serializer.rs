use crate::domain::{ResetTime, Task};
use anyhow::Result;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Format version written into export documents
pub const EXPORT_VERSION: &str = "1.0";

/// Interchange document: the whole collection plus the reset time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub tasks: Vec<Task>,
    pub custom_reset_time: ResetTime,
    /// ISO-8601 timestamp of the export
    pub export_date: String,
    pub version: String,
}

/// Build an export document for the given collection and settings
pub fn build_export(tasks: &[Task], reset_time: ResetTime, now: DateTime<Utc>) -> ExportDocument {
    ExportDocument {
        tasks: tasks.to_vec(),
        custom_reset_time: reset_time,
        export_date: now.to_rfc3339_opts(SecondsFormat::Millis, true),
        version: EXPORT_VERSION.to_string(),
    }
}

/// Serialize an export document as pretty JSON
pub fn serialize_export(document: &ExportDocument) -> Result<String> {
    Ok(serde_json::to_string_pretty(document)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Category, NewTask};
    use chrono::TimeZone;

    #[test]
    fn test_export_document_shape() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 10, 30, 0).unwrap();
        let task = Task::new(
            "abc".to_string(),
            NewTask::new("Claim faucet", Category::Testnet).with_description("sepolia"),
            now,
        );
        let doc = build_export(&[task], ResetTime::new(9, 0).unwrap(), now);
        let json = serialize_export(&doc).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["version"], "1.0");
        assert_eq!(value["exportDate"], "2024-06-01T10:30:00.000Z");
        assert_eq!(value["customResetTime"]["hour"], 9);
        assert_eq!(value["customResetTime"]["minute"], 0);
        assert_eq!(value["tasks"][0]["id"], "abc");
        assert_eq!(value["tasks"][0]["type"], "testnet");
        assert_eq!(value["tasks"][0]["completed"], false);
    }

    #[test]
    fn test_empty_export() {
        let doc = build_export(&[], ResetTime::default(), Utc::now());
        assert!(doc.tasks.is_empty());
        assert_eq!(doc.version, EXPORT_VERSION);
    }
}
