//! Status document parser.

use crate::parse::sections::{
    bullet_items, classify, find_date, non_empty, split_sections, SectionKind,
};
use crate::types::{Decision, ParsedStatus, ProgressEntry};
use chrono::NaiveDate;
use regex::Regex;
use std::sync::OnceLock;

fn rationale_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)(?:rationale|context|razón|razon|contexto)[:\s]+(.+)")
            .expect("rationale pattern")
    })
}

/// Parses a status document: dated progress entries, current-status
/// text, dated decisions, blockers, and next steps.
///
/// `today` is the record's generation date; malformed or missing dates
/// fall back to it instead of failing.
pub fn parse_status(text: &str, today: NaiveDate) -> ParsedStatus {
    let mut status = ParsedStatus {
        raw_content: text.to_string(),
        ..ParsedStatus::default()
    };

    for section in split_sections(text) {
        match classify(&section.heading) {
            Some(SectionKind::Progress) => status.progress = parse_progress(&section.body),
            Some(SectionKind::CurrentStatus) => status.current_status = non_empty(&section.body),
            Some(SectionKind::Decisions) => {
                status.decisions = parse_decisions(&section.body, today)
            }
            Some(SectionKind::Blockers) => status.blockers = bullet_items(&section.body),
            Some(SectionKind::NextSteps) => status.next_steps = bullet_items(&section.body),
            _ => {}
        }
    }

    status
}

/// Progress entries are `### YYYY-MM-DD` subsections. Inside each,
/// line markers categorize items: `✅` completed, `🟡` in progress,
/// `📝` free notes. Subsections without a parsable date are skipped.
fn parse_progress(body: &str) -> Vec<ProgressEntry> {
    let mut entries = Vec::new();
    let mut current: Option<ProgressEntry> = None;

    for line in body.lines() {
        let trimmed = line.trim_start();
        if let Some(rest) = trimmed.strip_prefix("### ") {
            if let Some(entry) = current.take() {
                entries.push(entry);
            }
            current = find_date(rest).map(|date| ProgressEntry {
                date,
                completed: Vec::new(),
                in_progress: Vec::new(),
                notes: Vec::new(),
            });
        } else if let Some(entry) = current.as_mut() {
            let item = trimmed.trim_start_matches(['-', '*']).trim_start();
            if let Some(text) = item.strip_prefix("✅") {
                entry.completed.push(text.trim().to_string());
            } else if let Some(text) = item.strip_prefix("🟡") {
                entry.in_progress.push(text.trim().to_string());
            } else if let Some(text) = item.strip_prefix("📝") {
                entry.notes.push(text.trim().to_string());
            }
        }
    }
    if let Some(entry) = current.take() {
        entries.push(entry);
    }
    entries
}

fn leading_date_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*(?:\d{4}-\d{2}-\d{2}|\d{1,2}/\d{1,2}/\d{4})\s*[:\-–—]*\s*")
            .expect("leading date pattern")
    })
}

fn parse_decisions(body: &str, today: NaiveDate) -> Vec<Decision> {
    bullet_items(body)
        .into_iter()
        .filter_map(|item| {
            let rationale = rationale_re()
                .captures(&item)
                .map(|caps| caps[1].trim().to_string());

            // The decision text is the item minus its date prefix and
            // rationale suffix, both of which land in their own fields.
            let without_rationale = rationale_re().replace(&item, "");
            let text = leading_date_re().replace(&without_rationale, "");
            let text = text.trim().trim_end_matches(['.', ',', ';', ':']).trim();
            if text.is_empty() {
                return None;
            }
            Some(Decision {
                date: find_date(&item).unwrap_or(today),
                decision: text.to_string(),
                rationale,
            })
        })
        .collect()
}
