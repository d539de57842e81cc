//! Prompt construction.

use std::fmt::Write;

use crate::models::Schedule;

/// Placeholder replaced by the rendered schedule.
pub const SCHEDULE_PLACEHOLDER: &str = "{schedule}";

/// Default prompt template.
pub const DEFAULT_PROMPT_TEMPLATE: &str = "Schedule:\n{schedule}\n\nExplain this schedule.";

/// Renders one line per entry: `- <task>: start <s>, end <e> (<d> units)`.
pub fn format_schedule(schedule: &Schedule) -> String {
    if schedule.is_empty() {
        return "(no tasks)".to_string();
    }

    let mut out = String::new();
    for (i, entry) in schedule.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        // Writing to a String cannot fail.
        let _ = write!(
            out,
            "- {}: start {}, end {} ({} units)",
            entry.task,
            entry.start,
            entry.end,
            entry.duration()
        );
    }
    out
}

/// Substitutes the rendered schedule into `template`.
pub fn render_prompt(template: &str, schedule: &Schedule) -> String {
    template.replace(SCHEDULE_PLACEHOLDER, &format_schedule(schedule))
}
