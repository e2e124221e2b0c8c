/// Desktop notifications
/// Currently only implements macOS notifications

#[cfg(target_os = "macos")]
use std::process::Command;

/// Send a notification when a task is completed
pub fn notify_task_completed(task_text: &str) {
    send("Dailies - Task Completed", task_text);
}

/// Send a notification when the daily reset cleared completed tasks
pub fn notify_daily_reset(cleared: usize) {
    if cleared == 0 {
        return;
    }
    let message = if cleared == 1 {
        "1 daily task is ready again".to_string()
    } else {
        format!("{} daily tasks are ready again", cleared)
    };
    send("Dailies - New Day", &message);
}

fn send(title: &str, message: &str) {
    let script = notification_script(title, message);

    #[cfg(target_os = "macos")]
    {
        if let Err(err) = Command::new("osascript").arg("-e").arg(&script).output() {
            tracing::debug!(error = %err, "notification not delivered");
        }
    }

    #[cfg(not(target_os = "macos"))]
    {
        // No-op on other platforms
        let _ = script;
    }
}

fn notification_script(title: &str, message: &str) -> String {
    format!(
        r#"display notification "{}" with title "{}""#,
        applescript_escape(message),
        applescript_escape(title)
    )
}

/// Escape for an AppleScript string literal (backslashes first)
fn applescript_escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_backslash_and_quotes() {
        assert_eq!(applescript_escape(r#"say "hi""#), r#"say \"hi\""#);
        assert_eq!(applescript_escape(r"C:\dir\"), r"C:\\dir\\");
        assert_eq!(
            notification_script("Done", r"ends with \"),
            r#"display notification "ends with \\" with title "Done""#
        );
    }
}
