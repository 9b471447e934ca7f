//! E2E test harness for recall.
//!
//! Scenarios are declarative: a builder collects steps (seed documents,
//! run sync passes, mutate artifacts) and assertions, then `run`
//! executes them in order against a fresh temporary knowledge root
//! under a fixed clock.

#![allow(dead_code)]

pub mod scenario;
pub mod workspace;

pub use scenario::Scenario;
