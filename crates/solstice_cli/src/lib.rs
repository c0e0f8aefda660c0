//! Solstice CLI support
//!
//! The `solstice` binary drives a headless toggle from JSON scenarios. The
//! runner lives here so it can be exercised from tests.

pub mod scenario;

pub use scenario::{run_scenario, RevealSummary, RunOptions, RunReport, Scenario, ScenarioStep, StepRecord};
