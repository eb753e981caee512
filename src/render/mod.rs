//! Visualization Mapping
//!
//! Pure formatting from scenario results to what the map renderer draws:
//! marker color/radius, tooltip and popup markup, plus the legend and the
//! crop and region panels shown beside the map.
//!
//! ## Architecture
//! - `marker.rs` - Grade palette, `RenderSpec`, `MapMarker`, legend
//! - `html.rs` - Popup, crop card and region detail markup

pub mod marker;
pub mod html;

pub use marker::{
    build_markers, legend, marker_style, render_spec_for, tooltip_text, LegendEntry, MapMarker,
    MarkerColor, RenderSpec,
};
pub use html::{crop_profile_markup, escape_html, format_decimal, popup_markup, region_detail_markup};
