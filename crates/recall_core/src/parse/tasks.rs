//! Task list document parser.
//!
//! Checkbox grammar: `- [ ]` pending, `- [x]` completed, `- [~]` blocked.
//! Inline metadata: `[high|medium|low]` priority, `@assignee`,
//! `due: YYYY-MM-DD`. A pending task whose description says
//! "in progress" / "en progreso" is promoted to in-progress.

use crate::parse::sections::find_date;
use crate::types::{ParsedTasks, Priority, Task, TaskStatus};
use regex::Regex;
use std::sync::OnceLock;

fn task_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^\s*[-*]\s+\[([ xX~])\]\s+(.+)$").expect("task pattern"))
}

fn priority_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\[(high|medium|low|urgent)\]").expect("priority pattern"))
}

fn assignee_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"@([A-Za-z0-9_-]+)").expect("assignee pattern"))
}

fn due_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)due[:\s]+(\d{4}-\d{2}-\d{2})").expect("due pattern"))
}

/// Parses a task list document. Lines that don't match the checkbox
/// grammar are ignored.
pub fn parse_tasks(text: &str) -> ParsedTasks {
    let tasks = task_re()
        .captures_iter(text)
        .map(|caps| parse_task(&caps[1], &caps[2]))
        .collect();
    ParsedTasks { tasks }
}

fn parse_task(checkbox: &str, rest: &str) -> Task {
    let priority = priority_re().captures(rest).map(|caps| {
        match caps[1].to_lowercase().as_str() {
            "high" | "urgent" => Priority::High,
            "medium" => Priority::Medium,
            _ => Priority::Low,
        }
    });
    let assignee = assignee_re()
        .captures(rest)
        .map(|caps| caps[1].to_string());
    let due_date = due_re()
        .captures(rest)
        .and_then(|caps| find_date(&caps[1]));

    let description = due_re().replace(rest, "");
    let description = priority_re().replace(&description, "");
    let description = assignee_re().replace(&description, "");
    let description = description.split_whitespace().collect::<Vec<_>>().join(" ");

    let status = match checkbox {
        "x" | "X" => TaskStatus::Completed,
        "~" => TaskStatus::Blocked,
        _ => {
            let lowered = description.to_lowercase();
            if lowered.contains("in progress") || lowered.contains("en progreso") {
                TaskStatus::InProgress
            } else {
                TaskStatus::Pending
            }
        }
    };

    Task {
        description,
        status,
        priority,
        assignee,
        due_date,
    }
}
