//! Map marker encoding
//!
//! Grade → color/radius is a fixed total table. Better grades never get a
//! smaller marker.

use super::html::popup_markup;
use crate::data::ReferenceData;
use crate::scenario::{Grade, ScenarioResult};
use serde::Serialize;

/// Four-entry marker palette
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerColor {
    Blue,
    Green,
    Orange,
    Red,
}

impl MarkerColor {
    pub fn as_str(&self) -> &'static str {
        match self {
            MarkerColor::Blue => "blue",
            MarkerColor::Green => "green",
            MarkerColor::Orange => "orange",
            MarkerColor::Red => "red",
        }
    }
}

/// Marker color and radius for a grade
pub fn marker_style(grade: Grade) -> (MarkerColor, f64) {
    match grade {
        Grade::Optimal => (MarkerColor::Blue, 20.0),
        Grade::Suitable => (MarkerColor::Green, 15.0),
        Grade::Possible => (MarkerColor::Orange, 10.0),
        // Alert color, smallest marker
        Grade::Unsuitable | Grade::NoData => (MarkerColor::Red, 10.0),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderSpec {
    pub color: MarkerColor,
    pub radius: f64,
    pub popup: String,
}

pub fn render_spec_for(result: &ScenarioResult) -> RenderSpec {
    let (color, radius) = marker_style(result.grade);
    RenderSpec {
        color,
        radius,
        popup: popup_markup(result),
    }
}

/// `"{region}: {grade}"`, shown on hover
pub fn tooltip_text(result: &ScenarioResult) -> String {
    format!("{}: {}", result.region, result.grade.korean_label())
}

/// Exactly the fields the map renderer consumes per marker
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapMarker {
    pub latitude: f64,
    pub longitude: f64,
    pub color: MarkerColor,
    pub radius: f64,
    pub tooltip: String,
    pub popup: String,
}

/// One marker per result whose region has coordinates
pub fn build_markers(reference: &ReferenceData, results: &[ScenarioResult]) -> Vec<MapMarker> {
    results
        .iter()
        .filter_map(|result| {
            let Some(region) = reference.region(&result.region) else {
                tracing::debug!("No coordinates for '{}', marker skipped", result.region);
                return None;
            };

            let spec = render_spec_for(result);
            Some(MapMarker {
                latitude: region.latitude,
                longitude: region.longitude,
                color: spec.color,
                radius: spec.radius,
                tooltip: tooltip_text(result),
                popup: spec.popup,
            })
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendEntry {
    pub grade: Grade,
    pub color: MarkerColor,
    pub label: String,
}

/// Legend buckets, best grade first
pub fn legend() -> Vec<LegendEntry> {
    Grade::RANKED
        .iter()
        .map(|&grade| LegendEntry {
            grade,
            color: marker_style(grade).0,
            label: format!("{} ({})", grade.display_text(), grade.korean_label()),
        })
        .collect()
}
