// Scenario map query tool
//
// Prints what the dashboard needs for one year as JSON:
//   scenario_map <year>                    every (region, crop) result
//   scenario_map <year> <crop>             crop card, legend and map markers
//   scenario_map <year> --region <name>    ranked crop outlook for one region
//
// Data location and year policy come from the environment (see config.rs).

use anyhow::{bail, Context, Result};
use fruit_suitability_rust::render::{crop_profile_markup, region_detail_markup};
use fruit_suitability_rust::{build_markers, legend, EngineConfig, ScenarioEngine, TableCache};
use serde_json::json;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fruit_suitability_rust=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(year_arg) = args.first() else {
        bail!("usage: scenario_map <year> [<crop> | --region <name>]");
    };
    let year: i32 = year_arg
        .parse()
        .with_context(|| format!("year must be an integer, got '{}'", year_arg))?;

    let config = EngineConfig::from_env()?;
    tracing::info!("Data directory: {}", config.data_dir.display());
    tracing::info!("Year policy: {:?}", config.year_policy);

    let cache = TableCache::new();
    let engine = ScenarioEngine::from_config(&config, &cache);
    if engine.reference().is_empty() {
        tracing::warn!("No reference data found; only built-in scenario rules are available");
    }

    let output = match args.get(1).map(String::as_str) {
        None => json!({
            "year": engine.effective_year(year),
            "results": engine.compute_scenario(year),
        }),
        Some("--region") => {
            let name = args.get(2).context("--region needs a region name")?;
            let outlook = engine.region_outlook(name, year);
            let detail = engine
                .reference()
                .region(name)
                .map(|region| region_detail_markup(region, &outlook));
            json!({
                "year": engine.effective_year(year),
                "region": name,
                "outlook": outlook,
                "detail": detail,
            })
        }
        Some(crop) => {
            let results = engine.crop_scenarios(crop, year);
            let markers = build_markers(engine.reference(), &results);
            tracing::info!("{} markers for {}", markers.len(), crop);
            json!({
                "year": engine.effective_year(year),
                "crop": crop,
                "crop_card": engine.reference().crop(crop).map(crop_profile_markup),
                "legend": legend(),
                "markers": markers,
            })
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
