//! Year-threshold scenario rules
//!
//! Each (region, crop) pair owns an ordered list of stages. A stage applies
//! from its `from_year` until the next stage starts; the first stage is
//! open-ended and covers every earlier year. Savings are affine in the year,
//! measured from the 2025 reference year.

use super::grade::Grade;
use crate::config::REFERENCE_YEAR;
use crate::error::RuleError;
use rustc_hash::FxHashMap;
use serde::Serialize;

/// Heating-cost savings: `base + slope × (year − 2025)`, floored at 0
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SavingsFormula {
    pub base: f64,
    pub slope: f64,
}

impl SavingsFormula {
    pub const NONE: SavingsFormula = SavingsFormula { base: 0.0, slope: 0.0 };

    pub const fn new(base: f64, slope: f64) -> Self {
        SavingsFormula { base, slope }
    }

    pub fn at(&self, year: i32) -> f64 {
        let elapsed = f64::from(year) - f64::from(REFERENCE_YEAR);
        (self.base + self.slope * elapsed).max(0.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleStage {
    /// First year this stage applies; `None` for the open-ended first stage
    pub from_year: Option<i32>,
    pub grade: Grade,
    pub cause: String,
    pub savings: SavingsFormula,
}

impl RuleStage {
    pub fn new(from_year: Option<i32>, grade: Grade, cause: impl Into<String>, savings: SavingsFormula) -> Self {
        RuleStage {
            from_year,
            grade,
            cause: cause.into(),
            savings,
        }
    }

    /// Savings at a year; always 0 once the crop is unsuitable
    pub fn savings_at(&self, year: i32) -> f64 {
        match self.grade {
            Grade::Unsuitable | Grade::NoData => 0.0,
            _ => self.savings.at(year),
        }
    }
}

/// Direction a pair's grade moves as the climate warms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WarmingResponse {
    Favored,
    Disfavored,
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioRule {
    region: String,
    crop: String,
    stages: Vec<RuleStage>,
}

impl ScenarioRule {
    /// Build a rule, ordering stages by start year
    ///
    /// Exactly one stage must be open-ended and start years must be distinct.
    pub fn new(region: impl Into<String>, crop: impl Into<String>, mut stages: Vec<RuleStage>) -> Result<Self, RuleError> {
        let region = region.into();
        let crop = crop.into();

        // None sorts before Some(_)
        stages.sort_by_key(|s| s.from_year);

        match stages.first() {
            None => return Err(RuleError::Empty { region, crop }),
            Some(first) if first.from_year.is_some() => return Err(RuleError::NoOpenStage { region, crop }),
            _ => {}
        }

        if let Some(pair) = stages.windows(2).find(|w| w[0].from_year == w[1].from_year) {
            let year = pair[1].from_year;
            return Err(RuleError::OverlappingStages { region, crop, year });
        }

        Ok(ScenarioRule { region, crop, stages })
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn crop(&self) -> &str {
        &self.crop
    }

    pub fn stages(&self) -> &[RuleStage] {
        &self.stages
    }

    /// Stage in force at a year: the latest one that has started
    pub fn stage_at(&self, year: i32) -> Option<&RuleStage> {
        self.stages
            .iter()
            .rev()
            .find(|s| s.from_year.map_or(true, |start| year >= start))
    }

    pub fn warming_response(&self) -> WarmingResponse {
        let (Some(first), Some(last)) = (self.stages.first(), self.stages.last()) else {
            return WarmingResponse::Neutral;
        };

        match last.grade.cmp(&first.grade) {
            std::cmp::Ordering::Greater => WarmingResponse::Favored,
            std::cmp::Ordering::Less => WarmingResponse::Disfavored,
            std::cmp::Ordering::Equal if last.savings.slope > 0.0 => WarmingResponse::Favored,
            std::cmp::Ordering::Equal if last.savings.slope < 0.0 => WarmingResponse::Disfavored,
            std::cmp::Ordering::Equal => WarmingResponse::Neutral,
        }
    }
}

/// Immutable rule table indexed by (region, crop)
#[derive(Debug, Clone, Default)]
pub struct ScenarioRules {
    rules: Vec<ScenarioRule>,
    index: FxHashMap<(String, String), usize>,
}

impl ScenarioRules {
    pub fn new(rules: impl IntoIterator<Item = ScenarioRule>) -> Self {
        let mut table = ScenarioRules::default();
        for rule in rules {
            let key = (rule.region.clone(), rule.crop.clone());
            if table.index.contains_key(&key) {
                tracing::warn!("Duplicate scenario rule for {}/{} ignored", key.0, key.1);
                continue;
            }
            table.index.insert(key, table.rules.len());
            table.rules.push(rule);
        }
        table
    }

    /// The rule table shipped with the crate
    pub fn builtin() -> Self {
        let rules = BUILTIN_RULES.iter().filter_map(|spec| {
            let stages = spec
                .stages
                .iter()
                .map(|s| RuleStage::new(s.from_year, s.grade, s.cause, s.savings))
                .collect();

            ScenarioRule::new(spec.region, spec.crop, stages)
                .map_err(|e| tracing::error!("Invalid built-in rule: {}", e))
                .ok()
        });
        Self::new(rules)
    }

    pub fn get(&self, region: &str, crop: &str) -> Option<&ScenarioRule> {
        // Tuple keys need owned strings; the table is small
        self.index
            .get(&(region.to_string(), crop.to_string()))
            .map(|&i| &self.rules[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScenarioRule> {
        self.rules.iter()
    }

    /// Regions in order of first appearance
    pub fn regions(&self) -> Vec<&str> {
        first_seen(self.rules.iter().map(|r| r.region.as_str()))
    }

    /// Crops in order of first appearance
    pub fn crops(&self) -> Vec<&str> {
        first_seen(self.rules.iter().map(|r| r.crop.as_str()))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

fn first_seen<'a>(names: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut seen = Vec::new();
    for name in names {
        if !seen.contains(&name) {
            seen.push(name);
        }
    }
    seen
}

// ============================================================================
// BUILT-IN SCENARIO TABLE
// Warming scenario for the southern coast; mango and papaya gain with warmer
// winters, grape loses its winter chilling.
// ============================================================================

struct StageSpec {
    from_year: Option<i32>,
    grade: Grade,
    cause: &'static str,
    savings: SavingsFormula,
}

struct RuleSpec {
    region: &'static str,
    crop: &'static str,
    stages: &'static [StageSpec],
}

const fn stage(from_year: Option<i32>, grade: Grade, cause: &'static str, base: f64, slope: f64) -> StageSpec {
    StageSpec {
        from_year,
        grade,
        cause,
        savings: SavingsFormula::new(base, slope),
    }
}

static BUILTIN_RULES: &[RuleSpec] = &[
    RuleSpec {
        region: "Jeju Seogwipo",
        crop: "mango",
        stages: &[stage(None, Grade::Optimal, "Frost-free subtropical winters; greenhouse heating is minimal", 30.0, 1.0)],
    },
    RuleSpec {
        region: "Jeju Seogwipo",
        crop: "papaya",
        stages: &[
            stage(None, Grade::Suitable, "Winter lows still need supplementary greenhouse heating", 15.0, 1.0),
            stage(Some(2029), Grade::Optimal, "Winter minimum stays above papaya's cold limit", 22.0, 1.2),
        ],
    },
    RuleSpec {
        region: "Jeju Seogwipo",
        crop: "grape",
        stages: &[
            stage(None, Grade::Possible, "Humid summers already stress temperate grapes", 5.0, -0.5),
            stage(Some(2028), Grade::Unsuitable, "Too little winter chilling to break dormancy", 0.0, 0.0),
        ],
    },
    RuleSpec {
        region: "Jeonnam Haenam",
        crop: "mango",
        stages: &[
            stage(None, Grade::Suitable, "Greenhouse cultivation viable with winter heating", 15.0, 1.5),
            stage(Some(2030), Grade::Optimal, "Mean temperature crosses the subtropical threshold", 25.0, 1.5),
        ],
    },
    RuleSpec {
        region: "Jeonnam Haenam",
        crop: "papaya",
        stages: &[
            stage(None, Grade::Possible, "Cold snaps limit growth outside heated greenhouses", 5.0, 1.0),
            stage(Some(2031), Grade::Suitable, "Shorter cold season cuts the heating period", 14.0, 1.0),
        ],
    },
    RuleSpec {
        region: "Jeonnam Haenam",
        crop: "grape",
        stages: &[
            stage(None, Grade::Suitable, "Winters still provide enough chilling hours", 8.0, -0.5),
            stage(Some(2030), Grade::Possible, "Warm nights reduce berry coloring", 3.0, -0.3),
            stage(Some(2034), Grade::Unsuitable, "Chilling requirement no longer met", 0.0, 0.0),
        ],
    },
    RuleSpec {
        region: "Gyeongnam Tongyeong",
        crop: "mango",
        stages: &[
            stage(None, Grade::Possible, "Coastal cold snaps require a fully heated greenhouse", 8.0, 1.2),
            stage(Some(2029), Grade::Suitable, "Milder winters allow partial heating", 15.0, 1.2),
            stage(Some(2034), Grade::Optimal, "Subtropical climate established along the coast", 22.0, 1.2),
        ],
    },
    RuleSpec {
        region: "Gyeongnam Tongyeong",
        crop: "grape",
        stages: &[
            stage(None, Grade::Suitable, "Maritime climate keeps adequate chilling", 6.0, -0.4),
            stage(Some(2032), Grade::Possible, "Warmer winters shorten dormancy", 2.0, -0.2),
        ],
    },
];
