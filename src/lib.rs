//! Fruit Suitability Scenario Engine
//!
//! Predicts which regions suit tropical/subtropical fruit crops in a chosen
//! future year under a fixed warming scenario, and turns each prediction into
//! map-marker parameters for a dashboard.
//!
//! Modules, leaves first:
//! - `data/`: Reference tables (regions, crops, baseline grades) via Polars
//! - `scenario/`: Year-threshold rules → grade, cause, heating-cost savings
//! - `render/`: Marker color/radius, popup and panel markup
//!
//! Typical flow:
//! ```no_run
//! use fruit_suitability_rust::{build_markers, EngineConfig, ScenarioEngine, TableCache};
//!
//! let cache = TableCache::new();
//! let engine = ScenarioEngine::from_config(&EngineConfig::default(), &cache);
//! let mango = engine.crop_scenarios("mango", 2030);
//! let markers = build_markers(engine.reference(), &mango);
//! ```

pub mod config;
pub mod error;
pub mod data;
pub mod scenario;
pub mod render;

// Re-export commonly used types
pub use config::EngineConfig;
pub use error::{RuleError, SourceError};
pub use data::{load_reference_data, KeyedTable, ReferenceData, TableCache};
pub use scenario::{Grade, ScenarioEngine, ScenarioResult, ScenarioRules, YearPolicy};
pub use render::{build_markers, legend, render_spec_for, MapMarker, RenderSpec};
