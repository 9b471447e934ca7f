//! Heuristic document parsing.
//!
//! Turns loosely-structured, hand-edited markdown into typed records.
//! The grammar is a table of recognized heading markers (case-insensitive,
//! English and Spanish synonyms) with type-specific rules per section:
//! bullet lists become array fields, `label: value` lines become
//! structured sub-fields, and dates follow a fixed `YYYY-MM-DD` pattern.
//!
//! All parsing is pure. Missing documents and unrecognized sections are
//! never errors; a completely unparsable document still carries its
//! `raw_content` so nothing is silently lost.

pub mod sections;

mod input;
mod plan;
mod status;
mod tasks;

pub use input::{parse_note, NoteInput};
pub use plan::parse_plan;
pub use status::parse_status;
pub use tasks::parse_tasks;
