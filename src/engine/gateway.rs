use super::Engine;
use crate::domain::ResetTime;
use crate::error::{EngineError, EngineResult};
use crate::persistence::{atomic_write, build_export, parse_import, serialize_export, ExportDocument};
use chrono::{DateTime, TimeZone, Utc};
use std::fs;
use std::path::Path;

/// Outcome of a successful import
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSummary {
    pub imported: usize,
    /// Reset time carried by the document, already saved
    pub reset_time: Option<ResetTime>,
}

impl Engine {
    pub fn export_document(&self, now: DateTime<Utc>) -> ExportDocument {
        build_export(&self.tasks, self.settings.reset_time, now)
    }

    pub fn export_json(&self, now: DateTime<Utc>) -> EngineResult<String> {
        serialize_export(&self.export_document(now)).map_err(EngineError::persistence)
    }

    /// Write the export document to `path` (atomic replace)
    pub fn export_to_file(&self, path: &Path, now: DateTime<Utc>) -> EngineResult<()> {
        let json = self.export_json(now)?;
        atomic_write(path, &json).map_err(EngineError::persistence)?;
        tracing::info!(path = %path.display(), tasks = self.tasks.len(), "exported tasks");
        Ok(())
    }

    /// Validate a document and replace the whole collection with it
    ///
    /// Nothing changes unless every task validates. A carried reset time goes
    /// through `save_reset_time`, so the reset check runs against the new boundary.
    pub fn import_str<Tz: TimeZone>(
        &mut self,
        content: &str,
        now: &DateTime<Tz>,
    ) -> EngineResult<ImportSummary> {
        let payload = parse_import(content).map_err(|err| {
            tracing::warn!(error = %err, "import rejected");
            err
        })?;

        let imported = payload.tasks.len();
        self.tasks = payload.tasks;
        self.clear_confirmation();
        self.persist_tasks();

        if let Some(reset_time) = payload.reset_time {
            self.save_reset_time(reset_time, now)?;
        }

        tracing::info!(imported, "import applied");
        Ok(ImportSummary {
            imported,
            reset_time: payload.reset_time,
        })
    }

    pub fn import_file<Tz: TimeZone>(
        &mut self,
        path: &Path,
        now: &DateTime<Tz>,
    ) -> EngineResult<ImportSummary> {
        let content = fs::read_to_string(path)
            .map_err(|e| EngineError::Schema(format!("cannot read {}: {}", path.display(), e)))?;
        self.import_str(&content, now)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use crate::domain::{Category, TaskPatch, TaskStatus};
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};
    use tempfile::tempdir;

    #[test]
    fn test_export_import_round_trip() {
        let mut source = engine();
        source
            .save_reset_time(ResetTime::new(8, 30).unwrap(), &local(10, 9, 0, 0))
            .unwrap();
        let daily = add(&mut source, "Check in", Category::Daily);
        let testnet = add(&mut source, "Faucet", Category::Testnet);
        source.toggle_completion(&daily.id).unwrap();
        source
            .update(
                &testnet.id,
                TaskPatch {
                    status: Some(TaskStatus::Ongoing),
                    link: Some("https://faucet.example.org".to_string()),
                    ..TaskPatch::default()
                },
            )
            .unwrap();

        let json = source.export_json(utc_now()).unwrap();

        let mut target = engine();
        target.apply_reset_if_due(&local(10, 9, 0, 0));
        let summary = target.import_str(&json, &local(10, 9, 0, 0)).unwrap();

        assert_eq!(summary.imported, 2);
        assert_eq!(summary.reset_time, Some(ResetTime::new(8, 30).unwrap()));
        assert_eq!(target.tasks(), source.tasks());
        assert_eq!(target.reset_time(), source.reset_time());
    }

    #[test]
    fn test_failed_import_leaves_store_untouched() {
        let mut engine = engine();
        let keep = add(&mut engine, "Keep me", Category::NoteOnly);

        let mut tasks: Vec<Value> = (0..10)
            .map(|i| {
                json!({
                    "id": format!("t{}", i),
                    "text": "Imported",
                    "completed": false,
                    "type": "testnet",
                    "createdAt": 1700000000000i64
                })
            })
            .collect();
        tasks[4]["completed"] = json!("yes");
        let doc = json!({ "tasks": tasks, "version": "1.0" }).to_string();

        let err = engine.import_str(&doc, &local(10, 9, 0, 0)).unwrap_err();
        assert!(matches!(err, EngineError::Schema(_)));
        assert_eq!(engine.tasks().len(), 1);
        assert_eq!(engine.tasks()[0].id, keep.id);
    }

    #[test]
    fn test_import_clears_pending_confirmation() {
        let mut engine = engine();
        let daily = add(&mut engine, "Check in", Category::Daily);
        engine.stage_completion(&daily.id).unwrap();

        engine.import_str("[]", &local(10, 9, 0, 0)).unwrap();
        assert!(engine.tasks().is_empty());
        assert!(engine.confirmation().pending().is_none());
    }

    #[test]
    fn test_export_shape() {
        let mut engine = engine();
        add(&mut engine, "Mint NFT", Category::Waitlist);
        let now = chrono::Utc.with_ymd_and_hms(2024, 6, 1, 10, 30, 0).unwrap();

        let value: Value = serde_json::from_str(&engine.export_json(now).unwrap()).unwrap();
        assert_eq!(value["version"], "1.0");
        assert_eq!(value["exportDate"], "2024-06-01T10:30:00.000Z");
        assert_eq!(value["customResetTime"], json!({"hour": 0, "minute": 0}));
        assert_eq!(value["tasks"][0]["type"], "waitlist");
    }

    #[test]
    fn test_file_round_trip() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("export.json");

        let mut engine = engine();
        add(&mut engine, "Swap", Category::Testnet);
        engine.export_to_file(&path, utc_now()).unwrap();

        let mut other = super::super::test_support::engine();
        let summary = other.import_file(&path, &local(10, 9, 0, 0)).unwrap();
        assert_eq!(summary.imported, 1);
        assert_eq!(other.tasks(), engine.tasks());

        let missing = temp_dir.path().join("nope.json");
        assert!(matches!(
            other.import_file(&missing, &local(10, 9, 0, 0)),
            Err(EngineError::Schema(_))
        ));
    }
}
