use super::enums::{Category, TaskStatus};
use crate::error::{EngineError, EngineResult};
use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

/// A tracked task
///
/// Serialized as camelCase JSON with epoch-millisecond timestamps. The category is
/// written as `type` and also read from `category`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Opaque unique ID, immutable
    pub id: String,
    /// Display title
    pub text: String,
    pub completed: bool,
    /// Category partition, immutable after creation
    #[serde(rename = "type", alias = "category")]
    pub category: Category,
    /// Lifecycle tag (defaults to early for documents written before it existed)
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
    /// Most recent completion, present only while completed
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "chrono::serde::ts_milliseconds_option"
    )]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Fields supplied by the create command
#[derive(Debug, Clone)]
pub struct NewTask {
    pub text: String,
    pub category: Category,
    pub status: TaskStatus,
    pub link: Option<String>,
    pub description: Option<String>,
}

impl NewTask {
    pub fn new(text: impl Into<String>, category: Category) -> Self {
        Self {
            text: text.into(),
            category,
            status: TaskStatus::default(),
            link: None,
            description: None,
        }
    }

    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Check the create-time invariants: title, description and link
    pub fn validate(&self) -> EngineResult<()> {
        if self.text.trim().is_empty() {
            return Err(EngineError::Validation("title must not be empty".to_string()));
        }
        let has_description = self
            .description
            .as_deref()
            .map(|d| !d.trim().is_empty())
            .unwrap_or(false);
        if !has_description {
            return Err(EngineError::Validation(
                "description must not be empty".to_string(),
            ));
        }
        if let Some(link) = &self.link {
            validate_link(link)?;
        }
        Ok(())
    }
}

/// Partial update applied by the edit command. `None` leaves a field untouched;
/// an empty link or description clears it.
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub text: Option<String>,
    pub status: Option<TaskStatus>,
    pub link: Option<String>,
    pub description: Option<String>,
}

impl TaskPatch {
    pub fn validate(&self) -> EngineResult<()> {
        if let Some(text) = &self.text {
            if text.trim().is_empty() {
                return Err(EngineError::Validation("title must not be empty".to_string()));
            }
        }
        if let Some(link) = &self.link {
            validate_link(link)?;
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_none()
            && self.status.is_none()
            && self.link.is_none()
            && self.description.is_none()
    }
}

impl Task {
    /// Build a task from validated input. The caller picks the ID.
    pub fn new(id: String, input: NewTask, now: DateTime<Utc>) -> Self {
        Self {
            id,
            text: input.text.trim().to_string(),
            completed: false,
            category: input.category,
            status: input.status,
            created_at: to_millis(now),
            completed_at: None,
            link: non_empty(input.link),
            description: non_empty(input.description),
        }
    }

    /// Generate a fresh task ID
    pub fn generate_id() -> String {
        Uuid::new_v4().to_string()
    }

    /// Flip completion, keeping `completed_at` in step
    pub fn toggle(&mut self, now: DateTime<Utc>) {
        if self.completed {
            self.clear_completion();
        } else {
            self.completed = true;
            self.completed_at = Some(to_millis(now));
        }
    }

    /// Clear completion state (reset or un-completion)
    pub fn clear_completion(&mut self) {
        self.completed = false;
        self.completed_at = None;
    }

    /// Apply an already validated patch
    pub fn apply_patch(&mut self, patch: TaskPatch) {
        if let Some(text) = patch.text {
            self.text = text.trim().to_string();
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(link) = patch.link {
            self.link = non_empty(Some(link));
        }
        if let Some(description) = patch.description {
            self.description = non_empty(Some(description));
        }
    }

    /// Whether the completion lock forbids a direct toggle right now
    pub fn is_locked(&self) -> bool {
        self.completed && !self.category.is_freely_reversible()
    }

    /// Link with a scheme, suitable for opening
    pub fn link_href(&self) -> Option<String> {
        self.link.as_deref().map(with_scheme)
    }

    /// Case-insensitive substring match over text, link and description.
    /// `needle` must already be lowercased.
    pub fn matches_query(&self, needle: &str) -> bool {
        let hit = |field: Option<&str>| {
            field
                .map(|value| value.to_lowercase().contains(needle))
                .unwrap_or(false)
        };
        hit(Some(&self.text)) || hit(self.link.as_deref()) || hit(self.description.as_deref())
    }
}

/// Timestamps are stored with millisecond precision
fn to_millis(time: DateTime<Utc>) -> DateTime<Utc> {
    time.with_nanosecond(time.nanosecond() / 1_000_000 * 1_000_000)
        .unwrap_or(time)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn with_scheme(link: &str) -> String {
    if link.contains("://") {
        link.to_string()
    } else {
        format!("https://{}", link)
    }
}

/// Accept an empty link or anything that parses as a URL once a scheme is assumed
pub fn validate_link(link: &str) -> EngineResult<()> {
    let trimmed = link.trim();
    if trimmed.is_empty() {
        return Ok(());
    }
    let candidate = with_scheme(trimmed);
    match Url::parse(&candidate) {
        Ok(parsed) if parsed.has_host() => Ok(()),
        _ => Err(EngineError::Validation(format!("invalid link: {}", trimmed))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample(category: Category) -> Task {
        let input = NewTask::new("Mint NFT", category).with_description("on zora");
        Task::new(
            "t1".to_string(),
            input,
            Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        )
    }

    #[test]
    fn test_new_task_validation() {
        let ok = NewTask::new("Swap", Category::Daily).with_description("daily swap");
        assert!(ok.validate().is_ok());

        let blank_title = NewTask::new("   ", Category::Daily).with_description("x");
        assert!(matches!(blank_title.validate(), Err(EngineError::Validation(_))));

        let no_description = NewTask::new("Swap", Category::Daily);
        assert!(matches!(no_description.validate(), Err(EngineError::Validation(_))));

        let bad_link = NewTask::new("Swap", Category::Daily)
            .with_description("x")
            .with_link("not a url");
        assert!(matches!(bad_link.validate(), Err(EngineError::Validation(_))));
    }

    #[test]
    fn test_validate_link() {
        assert!(validate_link("").is_ok());
        assert!(validate_link("example.com").is_ok());
        assert!(validate_link("https://example.com/path?q=1").is_ok());
        assert!(validate_link("http://localhost:8080").is_ok());
        assert!(validate_link("httpbin.org/get").is_ok());
        assert!(validate_link("exa mple.com").is_err());
        assert!(validate_link("https://").is_err());
    }

    #[test]
    fn test_toggle_tracks_completed_at() {
        let mut task = sample(Category::NoteOnly);
        let now = Utc.with_ymd_and_hms(2024, 5, 2, 9, 0, 0).unwrap();

        task.toggle(now);
        assert!(task.completed);
        assert_eq!(task.completed_at, Some(now));

        task.toggle(now);
        assert!(!task.completed);
        assert_eq!(task.completed_at, None);
    }

    #[test]
    fn test_is_locked_only_for_completed_daily() {
        let mut daily = sample(Category::Daily);
        assert!(!daily.is_locked());
        daily.toggle(Utc::now());
        assert!(daily.is_locked());

        let mut note = sample(Category::NoteOnly);
        note.toggle(Utc::now());
        assert!(!note.is_locked());
    }

    #[test]
    fn test_apply_patch_clears_empty_fields() {
        let mut task = sample(Category::Waitlist);
        task.link = Some("example.com".to_string());
        task.apply_patch(TaskPatch {
            text: Some("  Join waitlist ".to_string()),
            status: Some(TaskStatus::Ongoing),
            link: Some(String::new()),
            description: None,
        });
        assert_eq!(task.text, "Join waitlist");
        assert_eq!(task.status, TaskStatus::Ongoing);
        assert_eq!(task.link, None);
        assert_eq!(task.description.as_deref(), Some("on zora"));
    }

    #[test]
    fn test_matches_query() {
        let mut task = sample(Category::Testnet);
        task.link = Some("Faucet.example.org".to_string());
        assert!(task.matches_query("mint"));
        assert!(task.matches_query("faucet"));
        assert!(task.matches_query("zora"));
        assert!(!task.matches_query("bridge"));
    }

    #[test]
    fn test_link_href_adds_scheme() {
        let mut task = sample(Category::SocialLinks);
        task.link = Some("x.com/someone".to_string());
        assert_eq!(task.link_href().as_deref(), Some("https://x.com/someone"));
    }

    #[test]
    fn test_json_shape() {
        let mut task = sample(Category::NoteOnly);
        task.toggle(Utc.with_ymd_and_hms(2024, 5, 1, 13, 0, 0).unwrap());
        let value = serde_json::to_value(&task).unwrap();
        assert_eq!(value["type"], "note");
        assert_eq!(value["status"], "early");
        assert_eq!(value["createdAt"], 1714564800000i64);
        assert_eq!(value["completedAt"], 1714568400000i64);
        assert!(value.get("link").is_none());
    }

    #[test]
    fn test_reads_category_field_and_missing_status() {
        let json = r#"{"id":"a","text":"T","completed":false,"category":"daily","createdAt":1}"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.category, Category::Daily);
        assert_eq!(task.status, TaskStatus::Early);
        assert_eq!(task.completed_at, None);
    }
}
