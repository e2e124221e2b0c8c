pub mod enums;
pub mod schedule;
pub mod task;
pub mod views;

pub use enums::{Category, SortOption, TaskStatus, UiMode};
pub use schedule::{format_countdown, ResetTime};
pub use task::{NewTask, Task, TaskPatch};
pub use views::{all_category_stats, category_stats, check_glyph, visible_tasks, CategoryStats};
