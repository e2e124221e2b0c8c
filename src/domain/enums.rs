use serde::{de, Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Task category. Partitions the collection; each has its own completion rules.
/// Written with its wire tag; read through `from_tag`, so stored files accept the
/// same spellings as the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Category {
    #[serde(rename = "daily")]
    Daily,
    #[serde(rename = "note")]
    NoteOnly,
    #[serde(rename = "waitlist")]
    Waitlist,
    #[serde(rename = "testnet")]
    Testnet,
    #[serde(rename = "social_links")]
    SocialLinks,
}

const CATEGORY_TAGS: &[&str] = &["daily", "note", "waitlist", "testnet", "social_links"];

impl Category {
    /// Parse a category from its wire tag or a CLI-friendly spelling
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim().to_lowercase().as_str() {
            "daily" => Some(Self::Daily),
            "note" | "note-only" | "note_only" | "notes" => Some(Self::NoteOnly),
            "waitlist" => Some(Self::Waitlist),
            "testnet" => Some(Self::Testnet),
            "social_links" | "social-links" | "social" => Some(Self::SocialLinks),
            _ => None,
        }
    }

    /// Tag written to storage and export documents
    pub fn to_tag(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::NoteOnly => "note",
            Self::Waitlist => "waitlist",
            Self::Testnet => "testnet",
            Self::SocialLinks => "social_links",
        }
    }

    /// Display label for tabs and badges
    pub fn label(&self) -> &'static str {
        match self {
            Self::Daily => "Daily",
            Self::NoteOnly => "Task Only",
            Self::Waitlist => "Waitlist",
            Self::Testnet => "Testnet",
            Self::SocialLinks => "Social Links",
        }
    }

    /// Completion is cleared automatically at every daily boundary
    pub fn is_reset_eligible(&self) -> bool {
        matches!(self, Self::Daily)
    }

    /// Completed tasks can be un-completed by direct user action
    pub fn is_freely_reversible(&self) -> bool {
        !self.is_reset_eligible()
    }

    /// Completing requires an explicit confirmation step
    pub fn requires_confirmation(&self) -> bool {
        self.is_reset_eligible()
    }

    /// Get all categories in tab order
    pub fn all() -> &'static [Category] {
        &[
            Category::Daily,
            Category::NoteOnly,
            Category::Waitlist,
            Category::Testnet,
            Category::SocialLinks,
        ]
    }

    /// Next category in tab order (wraps around)
    pub fn next(&self) -> Self {
        let all = Self::all();
        let idx = all.iter().position(|c| c == self).unwrap_or(0);
        all[(idx + 1) % all.len()]
    }

    /// Previous category in tab order (wraps around)
    pub fn previous(&self) -> Self {
        let all = Self::all();
        let idx = all.iter().position(|c| c == self).unwrap_or(0);
        all[(idx + all.len() - 1) % all.len()]
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        Self::from_tag(&tag).ok_or_else(|| de::Error::unknown_variant(&tag, CATEGORY_TAGS))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_tag())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_tag(s).ok_or_else(|| {
            format!(
                "unknown category '{}' (expected daily, note, waitlist, testnet or social_links)",
                s
            )
        })
    }
}

/// Free-form lifecycle tag of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    #[default]
    Early,
    Ongoing,
    Ended,
}

impl TaskStatus {
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim().to_lowercase().as_str() {
            "early" => Some(Self::Early),
            "ongoing" => Some(Self::Ongoing),
            "ended" => Some(Self::Ended),
            _ => None,
        }
    }

    pub fn to_tag(&self) -> &'static str {
        match self {
            Self::Early => "early",
            Self::Ongoing => "ongoing",
            Self::Ended => "ended",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Early => "Early",
            Self::Ongoing => "Ongoing",
            Self::Ended => "Ended",
        }
    }

    /// Cycle to the next status (used by the task form)
    pub fn next(&self) -> Self {
        match self {
            Self::Early => Self::Ongoing,
            Self::Ongoing => Self::Ended,
            Self::Ended => Self::Early,
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_tag())
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_tag(s)
            .ok_or_else(|| format!("unknown status '{}' (expected early, ongoing or ended)", s))
    }
}

/// Sort/filter mode applied by the query engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOption {
    #[default]
    None,
    TitleAsc,
    TitleDesc,
    CompletedOnly,
    IncompleteOnly,
}

impl SortOption {
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim().to_lowercase().as_str() {
            "none" | "default" => Some(Self::None),
            "title-asc" | "title_asc" | "asc" => Some(Self::TitleAsc),
            "title-desc" | "title_desc" | "desc" => Some(Self::TitleDesc),
            "completed" | "completed-only" => Some(Self::CompletedOnly),
            "uncompleted" | "incomplete" | "incomplete-only" => Some(Self::IncompleteOnly),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::None => "Default order",
            Self::TitleAsc => "Title A-Z",
            Self::TitleDesc => "Title Z-A",
            Self::CompletedOnly => "Completed only",
            Self::IncompleteOnly => "Incomplete only",
        }
    }

    /// Cycle to the next sort mode
    pub fn next(&self) -> Self {
        match self {
            Self::None => Self::TitleAsc,
            Self::TitleAsc => Self::TitleDesc,
            Self::TitleDesc => Self::CompletedOnly,
            Self::CompletedOnly => Self::IncompleteOnly,
            Self::IncompleteOnly => Self::None,
        }
    }
}

impl FromStr for SortOption {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_tag(s).ok_or_else(|| {
            format!(
                "unknown sort '{}' (expected none, title-asc, title-desc, completed or uncompleted)",
                s
            )
        })
    }
}

/// UI mode for the terminal front end
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiMode {
    Normal,
    Searching,
    TaskForm,
    ConfirmComplete,
    ConfirmDelete,
    ResetTimeEditor,
    ImportPrompt,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_from_tag() {
        assert_eq!(Category::from_tag("daily"), Some(Category::Daily));
        assert_eq!(Category::from_tag("note"), Some(Category::NoteOnly));
        assert_eq!(Category::from_tag("note-only"), Some(Category::NoteOnly));
        assert_eq!(Category::from_tag("Social-Links"), Some(Category::SocialLinks));
        assert_eq!(Category::from_tag("weekly"), None);
    }

    #[test]
    fn test_category_serde_accepts_aliases() {
        let c: Category = serde_json::from_str("\"note-only\"").unwrap();
        assert_eq!(c, Category::NoteOnly);
        let c: Category = serde_json::from_str("\"social-links\"").unwrap();
        assert_eq!(c, Category::SocialLinks);
        assert_eq!(serde_json::to_string(&Category::NoteOnly).unwrap(), "\"note\"");
    }

    #[test]
    fn test_category_serde_matches_from_tag() {
        for tag in ["notes", "social", "Daily", "note_only", "waitlist"] {
            let c: Category = serde_json::from_str(&format!("\"{}\"", tag)).unwrap();
            assert_eq!(Some(c), Category::from_tag(tag));
        }
        assert!(serde_json::from_str::<Category>("\"weekly\"").is_err());
    }

    #[test]
    fn test_only_daily_is_reset_eligible() {
        for category in Category::all() {
            assert_eq!(category.is_reset_eligible(), *category == Category::Daily);
            assert_eq!(category.is_freely_reversible(), *category != Category::Daily);
        }
    }

    #[test]
    fn test_category_cycle() {
        assert_eq!(Category::Daily.next(), Category::NoteOnly);
        assert_eq!(Category::SocialLinks.next(), Category::Daily);
        assert_eq!(Category::Daily.previous(), Category::SocialLinks);
    }

    #[test]
    fn test_status_default_and_parse() {
        assert_eq!(TaskStatus::default(), TaskStatus::Early);
        assert_eq!("Ongoing".parse::<TaskStatus>(), Ok(TaskStatus::Ongoing));
        assert!("later".parse::<TaskStatus>().is_err());
    }

    #[test]
    fn test_sort_option_cycle_returns_to_start() {
        let mut sort = SortOption::None;
        for _ in 0..5 {
            sort = sort.next();
        }
        assert_eq!(sort, SortOption::None);
        assert_eq!(SortOption::from_tag("uncompleted"), Some(SortOption::IncompleteOnly));
    }
}
