//! Typed reference data
//!
//! Region climate/soil attributes, crop agronomic profiles and the
//! year-independent baseline grades, built from keyed tables and validated
//! against their expected columns.

use super::cache::TableCache;
use super::table::{CellValue, KeyedTable, Record};
use crate::config::EngineConfig;
use crate::scenario::Grade;
use rustc_hash::FxHashMap;
use serde::Serialize;

/// Canonical region schema (key column `region`)
pub const REGION_COLUMNS: &[&str] = &["lat", "lon", "temp", "soil_ph", "rain"];

/// Required crop columns (key column `crop`)
pub const CROP_COLUMNS: &[&str] = &["temp_min", "temp_max", "humidity_min", "humidity_max"];

/// Region climate and soil attributes
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Region {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Mean annual temperature (°C)
    pub mean_temp_c: f64,
    /// Older exports carry no pH for some regions
    pub soil_ph: Option<f64>,
    /// Annual rainfall (mm)
    pub rainfall_mm: f64,
}

impl Region {
    /// Build from a `region, lat, lon, temp, soil_ph, rain` row
    pub fn from_record(name: &str, record: &Record) -> Option<Self> {
        Some(Region {
            name: name.to_string(),
            latitude: number(record, "lat")?,
            longitude: number(record, "lon")?,
            mean_temp_c: number(record, "temp")?,
            soil_ph: number(record, "soil_ph"),
            rainfall_mm: number(record, "rain")?,
        })
    }
}

/// Qualitative cultivation difficulty level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    Low,
    Medium,
    High,
}

impl Level {
    /// Parse `low|medium|high` or the Korean `하|중|상`
    pub fn parse(label: &str) -> Option<Level> {
        match label.trim().to_lowercase().as_str() {
            "low" | "하" => Some(Level::Low),
            "medium" | "mid" | "중" => Some(Level::Medium),
            "high" | "상" => Some(Level::High),
            _ => None,
        }
    }

    pub fn display_text(&self) -> &'static str {
        match self {
            Level::Low => "Low",
            Level::Medium => "Medium",
            Level::High => "High",
        }
    }
}

/// Cultivation difficulty profile of a crop
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CultivationDifficulty {
    pub water_demand: Option<Level>,
    pub temperature_sensitivity: Option<Level>,
    pub harvest_frequency: Option<Level>,
    pub pest_pressure: Option<Level>,
    pub cost_tier: Option<Level>,
}

impl CultivationDifficulty {
    fn from_record(record: &Record) -> Self {
        let level = |column: &str| record.get(column).and_then(CellValue::as_text).and_then(Level::parse);

        CultivationDifficulty {
            water_demand: level("water_demand"),
            temperature_sensitivity: level("temperature_sensitivity"),
            harvest_frequency: level("harvest_frequency"),
            pest_pressure: level("pest_pressure"),
            cost_tier: level("cost_tier"),
        }
    }

    /// (label, level) pairs in display order
    pub fn entries(&self) -> [(&'static str, Option<Level>); 5] {
        [
            ("Water demand", self.water_demand),
            ("Temperature sensitivity", self.temperature_sensitivity),
            ("Harvest frequency", self.harvest_frequency),
            ("Pest pressure", self.pest_pressure),
            ("Cost", self.cost_tier),
        ]
    }
}

/// Agronomic profile of a crop
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CropProfile {
    pub name: String,
    /// Optimal growing temperature range (°C)
    pub optimal_temp_c: (f64, f64),
    /// Optimal relative humidity range (%)
    pub optimal_humidity_pct: (f64, f64),
    /// Flowering window, e.g. "Feb-Apr"
    pub flowering: String,
    pub description: String,
    /// Cultivation manual link
    pub manual_url: Option<String>,
    pub difficulty: CultivationDifficulty,
}

impl CropProfile {
    pub fn from_record(name: &str, record: &Record) -> Option<Self> {
        let text = |column: &str| record.get(column).and_then(CellValue::as_text).map(str::to_string);

        Some(CropProfile {
            name: name.to_string(),
            optimal_temp_c: (number(record, "temp_min")?, number(record, "temp_max")?),
            optimal_humidity_pct: (number(record, "humidity_min")?, number(record, "humidity_max")?),
            flowering: text("flowering").unwrap_or_default(),
            description: text("description").unwrap_or_default(),
            manual_url: text("manual_url"),
            difficulty: CultivationDifficulty::from_record(record),
        })
    }
}

/// Year-independent grades: region → crop → grade
///
/// Read from a wide table: first column the region, one column per crop.
#[derive(Debug, Clone, Default)]
pub struct BaselineTable {
    grades: FxHashMap<String, FxHashMap<String, Grade>>,
    regions: Vec<String>,
    crops: Vec<String>,
}

impl BaselineTable {
    pub fn from_table(table: &KeyedTable) -> Self {
        let mut baseline = BaselineTable {
            crops: table.columns().to_vec(),
            ..Default::default()
        };

        for (region, record) in table.iter() {
            let mut row = FxHashMap::default();
            for (crop, cell) in record {
                let Some(label) = cell_label(cell) else { continue };
                match Grade::parse_label(&label) {
                    Some(grade) => {
                        row.insert(crop.clone(), grade);
                    }
                    None => tracing::warn!(
                        "Unrecognized baseline grade '{}' for {}/{}",
                        label,
                        region,
                        crop
                    ),
                }
            }
            baseline.regions.push(region.to_string());
            baseline.grades.insert(region.to_string(), row);
        }

        baseline
    }

    pub fn grade(&self, region: &str, crop: &str) -> Option<Grade> {
        self.grades.get(region)?.get(crop).copied()
    }

    /// Regions in file order
    pub fn regions(&self) -> &[String] {
        &self.regions
    }

    /// Crop columns in file order
    pub fn crops(&self) -> &[String] {
        &self.crops
    }

    pub fn is_empty(&self) -> bool {
        self.grades.is_empty()
    }
}

/// Immutable reference data shared by the scenario engine and the renderer
#[derive(Debug, Clone, Default)]
pub struct ReferenceData {
    regions: Vec<Region>,
    region_index: FxHashMap<String, usize>,
    crops: Vec<CropProfile>,
    crop_index: FxHashMap<String, usize>,
    baseline: BaselineTable,
}

impl ReferenceData {
    /// Load the region, crop and baseline sources through the cache
    pub fn load(config: &EngineConfig, cache: &TableCache) -> Self {
        let regions = cache.get_or_load(config.regions_path());
        let crops = cache.get_or_load(config.crops_path());
        let baseline = cache.get_or_load(config.baseline_path());

        let data = Self::from_tables(&regions, &crops, &baseline);
        tracing::info!(
            "Reference data: {} regions, {} crops, {} baseline rows",
            data.regions.len(),
            data.crops.len(),
            data.baseline.regions().len()
        );
        data
    }

    pub fn from_tables(regions: &KeyedTable, crops: &KeyedTable, baseline: &KeyedTable) -> Self {
        let mut data = ReferenceData {
            baseline: BaselineTable::from_table(baseline),
            ..Default::default()
        };

        if has_columns(regions, REGION_COLUMNS, "region") {
            for (name, record) in regions.iter() {
                match Region::from_record(name, record) {
                    Some(region) => {
                        data.region_index.insert(region.name.clone(), data.regions.len());
                        data.regions.push(region);
                    }
                    None => tracing::warn!("Skipping region '{}': missing coordinates or climate values", name),
                }
            }
        }

        if has_columns(crops, CROP_COLUMNS, "crop") {
            for (name, record) in crops.iter() {
                match CropProfile::from_record(name, record) {
                    Some(crop) => {
                        data.crop_index.insert(crop.name.clone(), data.crops.len());
                        data.crops.push(crop);
                    }
                    None => tracing::warn!("Skipping crop '{}': missing optimal ranges", name),
                }
            }
        }

        data
    }

    pub fn region(&self, name: &str) -> Option<&Region> {
        self.region_index.get(name).map(|&i| &self.regions[i])
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn crop(&self, name: &str) -> Option<&CropProfile> {
        self.crop_index.get(name).map(|&i| &self.crops[i])
    }

    pub fn crops(&self) -> &[CropProfile] {
        &self.crops
    }

    pub fn baseline(&self) -> &BaselineTable {
        &self.baseline
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty() && self.crops.is_empty() && self.baseline.is_empty()
    }
}

fn number(record: &Record, column: &str) -> Option<f64> {
    record.get(column).and_then(CellValue::as_f64)
}

fn cell_label(cell: &CellValue) -> Option<String> {
    match cell {
        CellValue::Text(s) => Some(s.clone()),
        // Bare class numbers ("1".."4") are read as numeric columns
        CellValue::Number(v) => Some(format!("{}", v)),
        CellValue::Missing => None,
    }
}

fn has_columns(table: &KeyedTable, required: &[&str], kind: &str) -> bool {
    if table.is_empty() {
        return false;
    }
    match required.iter().find(|c| !table.has_column(c)) {
        Some(missing) => {
            tracing::warn!("{} table is missing column '{}', ignoring it", kind, missing);
            false
        }
        None => true,
    }
}
