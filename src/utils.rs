//! Small formatting helpers shared by the views.

use std::time::Duration;

/// Format duration as MM:SS
pub fn format_duration(duration: Duration) -> String {
    let total_secs = duration.as_secs();
    format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
}

/// "1 rep", "2 reps"
pub fn plural(count: u64, noun: &str) -> String {
    if count == 1 {
        format!("{} {}", count, noun)
    } else {
        format!("{} {}s", count, noun)
    }
}
