use super::enums::{Category, SortOption};
use super::task::Task;
use std::cmp::Ordering;

/// Aggregate statistics for one category partition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryStats {
    pub category: Category,
    pub total: usize,
    pub completed: usize,
    /// Rounded percentage, 0 for an empty partition
    pub completion_rate: u32,
    /// Point-in-time count of completed tasks (not a consecutive-day measure)
    pub streak: usize,
}

/// Derive the visible list for the active category, search query and sort mode
///
/// Pipeline: partition, search, completion filter, ordering. Modes other than the
/// title sorts keep insertion order.
pub fn visible_tasks<'a>(
    tasks: &'a [Task],
    category: Category,
    query: &str,
    sort: SortOption,
) -> Vec<&'a Task> {
    let needle = query.trim().to_lowercase();

    let mut rows: Vec<&Task> = tasks
        .iter()
        .filter(|t| t.category == category)
        .filter(|t| needle.is_empty() || t.matches_query(&needle))
        .filter(|t| match sort {
            SortOption::CompletedOnly => t.completed,
            SortOption::IncompleteOnly => !t.completed,
            _ => true,
        })
        .collect();

    match sort {
        SortOption::TitleAsc => rows.sort_by(|a, b| compare_titles(&a.text, &b.text)),
        SortOption::TitleDesc => rows.sort_by(|a, b| compare_titles(&b.text, &a.text)),
        _ => {}
    }

    rows
}

/// Title comparison: case-folded first so "apple" sorts next to "Apple",
/// raw text as the tie-breaker for a total order
pub fn compare_titles(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Rounded completion percentage (half rounds up), 0 when there are no tasks
pub fn completion_rate(completed: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((200 * completed + total) / (2 * total)) as u32
}

/// Statistics over the unfiltered partition of one category
pub fn category_stats(tasks: &[Task], category: Category) -> CategoryStats {
    let (total, completed) = tasks
        .iter()
        .filter(|t| t.category == category)
        .fold((0, 0), |(total, done), t| {
            (total + 1, done + usize::from(t.completed))
        });

    CategoryStats {
        category,
        total,
        completed,
        completion_rate: completion_rate(completed, total),
        streak: completed,
    }
}

/// Statistics for every category, in tab order
pub fn all_category_stats(tasks: &[Task]) -> Vec<CategoryStats> {
    Category::all()
        .iter()
        .map(|c| category_stats(tasks, *c))
        .collect()
}

/// Checkbox glyph for a task row
pub fn check_glyph(task: &Task, use_emoji: bool) -> &'static str {
    match (task.completed, task.is_locked(), use_emoji) {
        (true, true, true) => "🔒",
        (true, _, true) => "✅",
        (false, _, true) => "⬜",
        (true, true, false) => "[#]",
        (true, _, false) => "[x]",
        (false, _, false) => "[ ]",
    }
}
