//! Section segmentation and shared parsing helpers.
//!
//! A document is split on `#` / `##` heading lines into sections, each
//! classified against a marker table. `###` lines stay inside the body;
//! the type-specific parsers use them for sub-structure (phases, dated
//! progress entries). A `---` rule ends the current section.

use chrono::NaiveDate;
use regex::Regex;
use std::sync::OnceLock;

/// One segmented section: the heading text and everything below it up
/// to the next heading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub heading: String,
    pub body: String,
}

/// Recognized section kinds across all document types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    Summary,
    Phases,
    SuccessCriteria,
    Risks,
    Progress,
    CurrentStatus,
    Decisions,
    Blockers,
    NextSteps,
}

/// Marker table: heading synonyms per kind, matched case-insensitively
/// by substring. Order matters — more specific markers come first so
/// that e.g. "Session Progress" never falls through to a broader kind.
const MARKERS: &[(SectionKind, &[&str])] = &[
    (SectionKind::NextSteps, &["next steps", "próximos pasos", "proximos pasos"]),
    (
        SectionKind::SuccessCriteria,
        &["success criteria", "success metrics", "criterios", "métricas", "metricas"],
    ),
    (SectionKind::Progress, &["progress", "progreso"]),
    (SectionKind::Decisions, &["decision", "decisión", "decisiones"]),
    (
        SectionKind::Blockers,
        &["blocker", "bloqueador", "obstáculo", "obstaculo"],
    ),
    (SectionKind::Phases, &["phase", "fase", "roadmap"]),
    (SectionKind::Risks, &["risk", "riesgo"]),
    (
        SectionKind::Summary,
        &["summary", "purpose", "objective", "overview", "resumen", "propósito", "proposito", "objetivo"],
    ),
    (SectionKind::CurrentStatus, &["status", "estado"]),
];

/// Classifies a heading against the marker table. Unrecognized headings
/// return `None` and their sections are ignored by the parsers.
pub fn classify(heading: &str) -> Option<SectionKind> {
    let lowered = heading.to_lowercase();
    MARKERS
        .iter()
        .find(|(_, markers)| markers.iter().any(|m| lowered.contains(m)))
        .map(|(kind, _)| *kind)
}

/// Splits a document into sections on `#` / `##` heading lines.
///
/// Text before the first heading (frontmatter, sync annotations) is
/// dropped; it carries no recognized structure.
pub fn split_sections(text: &str) -> Vec<Section> {
    let mut sections = Vec::new();
    let mut current: Option<Section> = None;

    for line in text.lines() {
        if let Some(heading) = heading_text(line) {
            if let Some(section) = current.take() {
                sections.push(section);
            }
            current = Some(Section {
                heading: heading.to_string(),
                body: String::new(),
            });
        } else if line.trim() == "---" {
            if let Some(section) = current.take() {
                sections.push(section);
            }
        } else if let Some(section) = current.as_mut() {
            section.body.push_str(line);
            section.body.push('\n');
        }
    }
    if let Some(section) = current.take() {
        sections.push(section);
    }
    sections
}

/// Returns the heading text for `#` / `##` lines, `None` otherwise.
/// `###` and deeper are sub-structure, not section boundaries.
fn heading_text(line: &str) -> Option<&str> {
    let trimmed = line.trim_start();
    for prefix in ["## ", "# "] {
        if let Some(rest) = trimmed.strip_prefix(prefix) {
            return Some(rest.trim());
        }
    }
    None
}

/// Extracts bullet list items (`-`, `*`, `•`), markers stripped.
pub fn bullet_items(body: &str) -> Vec<String> {
    body.lines()
        .filter_map(|line| {
            let trimmed = line.trim_start();
            ["- ", "* ", "• "]
                .iter()
                .find_map(|marker| trimmed.strip_prefix(marker))
        })
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}

fn date_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b(\d{4})-(\d{2})-(\d{2})\b").expect("date pattern"))
}

/// Finds the first `YYYY-MM-DD` date in the text, if any. Matches that
/// are not real calendar dates (e.g. `2026-13-40`) are skipped.
pub fn find_date(text: &str) -> Option<NaiveDate> {
    date_re().captures_iter(text).find_map(|caps| {
        let year = caps[1].parse().ok()?;
        let month = caps[2].parse().ok()?;
        let day = caps[3].parse().ok()?;
        NaiveDate::from_ymd_opt(year, month, day)
    })
}

/// Trims and returns the body as a scalar value, `None` when blank.
pub fn non_empty(body: &str) -> Option<String> {
    let trimmed = body.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
