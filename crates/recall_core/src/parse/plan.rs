//! Plan document parser.

use crate::parse::sections::{bullet_items, classify, non_empty, split_sections, SectionKind};
use crate::types::{ParsedPlan, Phase, Risk};
use regex::Regex;
use std::sync::OnceLock;

fn timeline_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)timeline[:\s]+(.+)").expect("timeline pattern"))
}

fn mitigation_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)(?:mitigation|mitigación|mitigacion)[:\s]+(.+)").expect("mitigation pattern"))
}

/// Parses a plan document: summary, ordered phases, success criteria,
/// and risks. Absent sections yield empty fields, never errors.
pub fn parse_plan(text: &str) -> ParsedPlan {
    let mut plan = ParsedPlan {
        raw_content: text.to_string(),
        ..ParsedPlan::default()
    };

    for section in split_sections(text) {
        match classify(&section.heading) {
            Some(SectionKind::Summary) => plan.summary = non_empty(&section.body),
            Some(SectionKind::Phases) => plan.phases = parse_phases(&section.body),
            Some(SectionKind::SuccessCriteria) => {
                plan.success_criteria = bullet_items(&section.body)
            }
            Some(SectionKind::Risks) => plan.risks = parse_risks(&section.body),
            _ => {}
        }
    }

    plan
}

/// Phases are `###` subsections (name line + free description, with an
/// optional `timeline:` label); when a phases section has no subsections
/// its bullets become name-only phases.
fn parse_phases(body: &str) -> Vec<Phase> {
    let mut phases = Vec::new();
    let mut current: Option<(String, String)> = None;

    for line in body.lines() {
        if let Some(name) = line.trim_start().strip_prefix("### ") {
            if let Some((name, desc)) = current.take() {
                phases.push(finish_phase(name, desc));
            }
            current = Some((name.trim().to_string(), String::new()));
        } else if let Some((_, desc)) = current.as_mut() {
            desc.push_str(line);
            desc.push('\n');
        }
    }
    if let Some((name, desc)) = current.take() {
        phases.push(finish_phase(name, desc));
    }

    if phases.is_empty() {
        phases = bullet_items(body)
            .into_iter()
            .map(|name| Phase {
                name,
                description: None,
                timeline: None,
            })
            .collect();
    }
    phases
}

fn finish_phase(name: String, description: String) -> Phase {
    let timeline = timeline_re()
        .captures(&description)
        .map(|caps| caps[1].trim().to_string());
    let description = match &timeline {
        Some(_) => timeline_re().replace(&description, "").trim().to_string(),
        None => description.trim().to_string(),
    };
    Phase {
        name,
        description: (!description.is_empty()).then_some(description),
        timeline,
    }
}

fn parse_risks(body: &str) -> Vec<Risk> {
    bullet_items(body)
        .into_iter()
        .map(|item| {
            let mitigation = mitigation_re()
                .captures(&item)
                .map(|caps| caps[1].trim().to_string());
            let risk = match &mitigation {
                Some(_) => mitigation_re()
                    .replace(&item, "")
                    .trim_end_matches(['.', ',', ';', '-', ' '])
                    .trim()
                    .to_string(),
                None => item,
            };
            Risk { risk, mitigation }
        })
        .filter(|risk| !risk.risk.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAN: &str = "\
# Launch plan

## Purpose

Ship the first public version.

## Phases

### Phase 1: Foundations
Set up the core pipeline.
Timeline: Q1

### Phase 2: Polish
Close the gaps.

## Success Metrics

- 100 users in the first month
- Zero data loss

## Risks

- Scope creep. Mitigation: freeze the feature list
- Single maintainer
";

    #[test]
    fn parses_all_plan_sections() {
        let plan = parse_plan(PLAN);
        assert_eq!(plan.summary.as_deref(), Some("Ship the first public version."));
        assert_eq!(plan.phases.len(), 2);
        assert_eq!(plan.phases[0].name, "Phase 1: Foundations");
        assert_eq!(plan.phases[0].timeline.as_deref(), Some("Q1"));
        assert_eq!(
            plan.phases[0].description.as_deref(),
            Some("Set up the core pipeline.")
        );
        assert!(plan.phases[1].timeline.is_none());
        assert_eq!(plan.success_criteria.len(), 2);
        assert_eq!(plan.risks.len(), 2);
        assert_eq!(plan.risks[0].risk, "Scope creep");
        assert_eq!(
            plan.risks[0].mitigation.as_deref(),
            Some("freeze the feature list")
        );
        assert!(plan.risks[1].mitigation.is_none());
        assert_eq!(plan.raw_content, PLAN);
    }

    #[test]
    fn spanish_headings_parse_too() {
        let plan = parse_plan("## Propósito\n\nLanzar la beta.\n\n## Fases\n\n- descubrimiento\n- entrega\n");
        assert_eq!(plan.summary.as_deref(), Some("Lanzar la beta."));
        assert_eq!(plan.phases.len(), 2);
        assert_eq!(plan.phases[0].name, "descubrimiento");
    }

    #[test]
    fn empty_section_yields_empty_vec() {
        let plan = parse_plan("## Risks\n\n## Success Criteria\n");
        assert!(plan.risks.is_empty());
        assert!(plan.success_criteria.is_empty());
    }

    #[test]
    fn unparsable_document_keeps_raw_content() {
        let text = "just a loose paragraph with no headings at all";
        let plan = parse_plan(text);
        assert!(plan.summary.is_none());
        assert!(plan.phases.is_empty());
        assert_eq!(plan.raw_content, text);
    }
}
