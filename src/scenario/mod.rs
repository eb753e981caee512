//! Scenario Computation
//!
//! Grades each (region, crop) pair for a target year under a fixed warming
//! scenario. Heat-loving crops move toward `Optimal` as years pass;
//! temperate crops move toward `Unsuitable`.
//!
//! ## Architecture
//! - `grade.rs` - Ordinal `Grade` enum and label parsing
//! - `rules.rs` - Year-threshold rules, affine savings, built-in rule table
//! - `engine.rs` - `ScenarioEngine`: rule → baseline → no-data lookup

pub mod grade;
pub mod rules;
pub mod engine;

pub use grade::Grade;
pub use rules::{RuleStage, SavingsFormula, ScenarioRule, ScenarioRules, WarmingResponse};
pub use engine::{
    ResultSource, ScenarioEngine, ScenarioResult, YearPolicy, BASELINE_CAUSE, NO_DATA_CAUSE,
};
