use super::marker::marker_style;
use crate::data::{CropProfile, Region};
use crate::scenario::ScenarioResult;

/// Round to one decimal place, dropping a trailing ".0"
pub fn format_decimal(value: f64) -> String {
    let rounded = (value * 10.0).round() / 10.0;
    if rounded.fract() == 0.0 {
        format!("{:.0}", rounded)
    } else {
        format!("{:.1}", rounded)
    }
}

/// Escape text for HTML element content and attribute values
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Popup fragment for one scenario result
pub fn popup_markup(result: &ScenarioResult) -> String {
    let (color, _) = marker_style(result.grade);
    let mut html = String::with_capacity(512);

    html.push_str("<div class=\"scenario-popup\">\n");
    html.push_str(&format!("<h4>{}</h4>\n", escape_html(&result.region)));
    html.push_str(&format!(
        "<p><b>{}</b> &middot; {}</p>\n",
        result.year,
        escape_html(&result.crop)
    ));
    html.push_str(&format!(
        "<p>Grade: <b style=\"color:{}\">{} ({})</b></p>\n",
        color.as_str(),
        result.grade.display_text(),
        result.grade.korean_label()
    ));
    html.push_str(&format!("<p>Cause: {}</p>\n", escape_html(&result.cause)));
    html.push_str(&format!(
        "<p>Heating-cost savings: {}%</p>\n",
        format_decimal(result.savings_percent)
    ));
    html.push_str("</div>\n");

    html
}

/// Growing conditions and cultivation difficulty card for a crop
pub fn crop_profile_markup(profile: &CropProfile) -> String {
    let name = escape_html(&profile.name);
    let mut html = String::with_capacity(1024);

    html.push_str("<div class=\"crop-card\">\n");
    html.push_str(&format!("<h4>{} growing conditions</h4>\n<ul>\n", name));
    html.push_str(&format!(
        "<li><b>Optimal temperature:</b> {}&ndash;{} &deg;C</li>\n",
        format_decimal(profile.optimal_temp_c.0),
        format_decimal(profile.optimal_temp_c.1)
    ));
    html.push_str(&format!(
        "<li><b>Optimal humidity:</b> {}&ndash;{}%</li>\n",
        format_decimal(profile.optimal_humidity_pct.0),
        format_decimal(profile.optimal_humidity_pct.1)
    ));
    if !profile.flowering.is_empty() {
        html.push_str(&format!(
            "<li><b>Flowering:</b> {}</li>\n",
            escape_html(&profile.flowering)
        ));
    }
    if !profile.description.is_empty() {
        html.push_str(&format!(
            "<li><b>Notes:</b> {}</li>\n",
            escape_html(&profile.description)
        ));
    }
    html.push_str("</ul>\n");

    html.push_str(&format!("<h4>{} cultivation difficulty</h4>\n<ul>\n", name));
    for (label, level) in profile.difficulty.entries() {
        let text = level.map_or("Unknown", |l| l.display_text());
        html.push_str(&format!("<li><b>{}:</b> {}</li>\n", label, text));
    }
    html.push_str("</ul>\n");

    if let Some(url) = &profile.manual_url {
        html.push_str(&format!(
            "<p><a href=\"{}\" target=\"_blank\">{} cultivation manual</a></p>\n",
            escape_html(url),
            name
        ));
    }
    html.push_str("</div>\n");

    html
}

/// Region panel: ranked crop outlook, climate/soil metrics, savings summary
///
/// `outlook` is expected in ranked order (see `ScenarioEngine::region_outlook`).
pub fn region_detail_markup(region: &Region, outlook: &[ScenarioResult]) -> String {
    let mut html = String::with_capacity(2048);

    html.push_str("<div class=\"region-detail\">\n");
    html.push_str(&format!("<h3>{}</h3>\n", escape_html(&region.name)));

    html.push_str("<h4>Recommended crops</h4>\n");
    if outlook.is_empty() {
        html.push_str("<p>No data</p>\n");
    } else {
        html.push_str("<table>\n<thead><tr><th>Crop</th><th>Grade</th><th>Savings</th></tr></thead>\n<tbody>\n");
        for result in outlook {
            html.push_str(&format!(
                "<tr><td>{}</td><td>{}</td><td>{}%</td></tr>\n",
                escape_html(&result.crop),
                result.grade.korean_label(),
                format_decimal(result.savings_percent)
            ));
        }
        html.push_str("</tbody>\n</table>\n");
    }

    html.push_str("<h4>Climate and soil</h4>\n<ul>\n");
    html.push_str(&format!(
        "<li><b>Mean temperature:</b> {} &deg;C</li>\n",
        format_decimal(region.mean_temp_c)
    ));
    match region.soil_ph {
        Some(ph) => html.push_str(&format!("<li><b>Soil pH:</b> {}</li>\n", format_decimal(ph))),
        None => html.push_str("<li><b>Soil pH:</b> no data</li>\n"),
    }
    html.push_str(&format!(
        "<li><b>Annual rainfall:</b> {} mm</li>\n",
        format_decimal(region.rainfall_mm)
    ));
    html.push_str("</ul>\n");

    html.push_str("<h4>Summary</h4>\n");
    let best = outlook
        .iter()
        .filter(|r| r.savings_percent > 0.0)
        .max_by(|a, b| a.savings_percent.total_cmp(&b.savings_percent));
    match best {
        Some(r) => html.push_str(&format!(
            "<p>Winter heating for {} is expected to cost {}% less than in the reference region.</p>\n",
            escape_html(&r.crop),
            format_decimal(r.savings_percent)
        )),
        None => html.push_str("<p>No heating-cost advantage is expected for these crops.</p>\n"),
    }
    html.push_str("</div>\n");

    html
}
