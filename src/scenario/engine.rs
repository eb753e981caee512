//! Scenario Engine
//!
//! Pure projection of (region, crop, year) onto a grade, a cause and a
//! heating-cost savings estimate. Lookup order: explicit scenario rule, then
//! the baseline grade table, then a `NoData` placeholder. No call fails.

use super::grade::Grade;
use super::rules::ScenarioRules;
use crate::config::{EngineConfig, LAST_SUPPORTED_YEAR, REFERENCE_YEAR};
use crate::data::{ReferenceData, TableCache};
use serde::Serialize;
use std::sync::Arc;

pub const BASELINE_CAUSE: &str = "baseline data, no scenario defined";
pub const NO_DATA_CAUSE: &str = "no data";

/// How years outside the supported range are treated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum YearPolicy {
    /// Snap to the nearest bound
    Clamp { min: i32, max: i32 },
    /// Keep the year; rule stages and savings slopes extend past the range
    Extrapolate,
}

impl Default for YearPolicy {
    fn default() -> Self {
        YearPolicy::Clamp {
            min: REFERENCE_YEAR,
            max: LAST_SUPPORTED_YEAR,
        }
    }
}

impl YearPolicy {
    pub fn apply(&self, year: i32) -> i32 {
        match *self {
            YearPolicy::Clamp { min, max } => year.clamp(min, max),
            YearPolicy::Extrapolate => year,
        }
    }
}

/// Where a result came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultSource {
    Rule,
    Baseline,
    NoData,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioResult {
    pub region: String,
    pub crop: String,
    /// Year the result was computed for, after the year policy
    pub year: i32,
    pub grade: Grade,
    pub cause: String,
    pub savings_percent: f64,
    pub source: ResultSource,
}

pub struct ScenarioEngine {
    reference: Arc<ReferenceData>,
    rules: ScenarioRules,
    policy: YearPolicy,
}

impl ScenarioEngine {
    pub fn new(reference: Arc<ReferenceData>, rules: ScenarioRules, policy: YearPolicy) -> Self {
        ScenarioEngine {
            reference,
            rules,
            policy,
        }
    }

    /// Engine over the configured sources and the built-in rule table
    pub fn from_config(config: &EngineConfig, cache: &TableCache) -> Self {
        let reference = Arc::new(ReferenceData::load(config, cache));
        Self::new(reference, ScenarioRules::builtin(), config.year_policy)
    }

    pub fn reference(&self) -> &ReferenceData {
        &self.reference
    }

    pub fn rules(&self) -> &ScenarioRules {
        &self.rules
    }

    pub fn policy(&self) -> YearPolicy {
        self.policy
    }

    pub fn effective_year(&self, year: i32) -> i32 {
        self.policy.apply(year)
    }

    /// Result for one pair
    pub fn scenario_for(&self, region: &str, crop: &str, year: i32) -> ScenarioResult {
        let year = self.effective_year(year);

        let stage = self.rules.get(region, crop).and_then(|rule| rule.stage_at(year));
        let (grade, cause, savings_percent, source) = match stage {
            Some(stage) => (stage.grade, stage.cause.clone(), stage.savings_at(year), ResultSource::Rule),
            None => match self.reference.baseline().grade(region, crop) {
                Some(grade) => (grade, BASELINE_CAUSE.to_string(), 0.0, ResultSource::Baseline),
                None => (Grade::NoData, NO_DATA_CAUSE.to_string(), 0.0, ResultSource::NoData),
            },
        };

        ScenarioResult {
            region: region.to_string(),
            crop: crop.to_string(),
            year,
            grade,
            cause,
            savings_percent,
            source,
        }
    }

    /// Results for every known (region, crop) pair at a year
    pub fn compute_scenario(&self, year: i32) -> Vec<ScenarioResult> {
        let crops = self.crop_names();
        let regions = self.region_names();

        let mut results = Vec::with_capacity(regions.len() * crops.len());
        for region in regions {
            for crop in &crops {
                results.push(self.scenario_for(region, crop, year));
            }
        }
        results
    }

    /// One region's crops, best grade first, then highest savings
    pub fn region_outlook(&self, region: &str, year: i32) -> Vec<ScenarioResult> {
        let mut results: Vec<ScenarioResult> = self
            .crop_names()
            .into_iter()
            .map(|crop| self.scenario_for(region, crop, year))
            .collect();

        // Stable sort keeps crop order for ties
        results.sort_by(|a, b| {
            b.grade
                .cmp(&a.grade)
                .then(b.savings_percent.total_cmp(&a.savings_percent))
        });
        results
    }

    /// One crop across every region
    pub fn crop_scenarios(&self, crop: &str, year: i32) -> Vec<ScenarioResult> {
        self.region_names()
            .into_iter()
            .map(|region| self.scenario_for(region, crop, year))
            .collect()
    }

    /// Regions from reference data, then baseline-only, then rule-only
    pub fn region_names(&self) -> Vec<&str> {
        let reference = self.reference.regions().iter().map(|r| r.name.as_str());
        let baseline = self.reference.baseline().regions().iter().map(String::as_str);
        merge_names(reference.chain(baseline).chain(self.rules.regions()))
    }

    /// Crops from profiles, then baseline columns, then rule-only
    pub fn crop_names(&self) -> Vec<&str> {
        let profiles = self.reference.crops().iter().map(|c| c.name.as_str());
        let baseline = self.reference.baseline().crops().iter().map(String::as_str);
        merge_names(profiles.chain(baseline).chain(self.rules.crops()))
    }
}

fn merge_names<'a>(names: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut merged: Vec<&str> = Vec::new();
    for name in names {
        if !merged.contains(&name) {
            merged.push(name);
        }
    }
    merged
}
