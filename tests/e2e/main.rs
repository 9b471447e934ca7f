//! End-to-end scenarios for the recall sync engine.

mod harness;
mod scenarios;
