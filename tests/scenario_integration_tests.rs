//! Scenario Integration Tests
//!
//! Runs the full pipeline over the bundled `data/` tables: load reference
//! sources, compute every pair for a year, and turn results into markers.

use approx::assert_relative_eq;
use fruit_suitability_rust::data::{try_load_table, SourceEncoding};
use fruit_suitability_rust::render::{marker_style, region_detail_markup};
use fruit_suitability_rust::scenario::{ResultSource, WarmingResponse, BASELINE_CAUSE};
use fruit_suitability_rust::{
    build_markers, load_reference_data, render_spec_for, EngineConfig, Grade, ScenarioEngine,
    TableCache,
};
use std::path::PathBuf;

const YEARS: std::ops::RangeInclusive<i32> = 2025..=2035;

fn data_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data")
}

fn engine() -> ScenarioEngine {
    ScenarioEngine::from_config(&EngineConfig::with_data_dir(data_dir()), &TableCache::new())
}

#[test]
fn test_bundled_reference_data_loads() {
    let engine = engine();
    let reference = engine.reference();

    assert_eq!(reference.regions().len(), 4);
    assert_eq!(reference.crops().len(), 3);
    assert_eq!(reference.region("Busan Gijang").unwrap().soil_ph, None);
    assert_eq!(engine.region_names().len(), 4);
    assert_eq!(engine.crop_names(), vec!["mango", "papaya", "grape"]);
}

#[test]
fn test_compute_scenario_deterministic() {
    let engine = engine();
    for year in YEARS {
        assert_eq!(engine.compute_scenario(year), engine.compute_scenario(year));
    }
    assert_eq!(engine.compute_scenario(2030).len(), 12);
}

#[test]
fn test_grade_monotone_with_warming() {
    let engine = engine();

    for rule in engine.rules().iter() {
        let early = engine.scenario_for(rule.region(), rule.crop(), 2025).grade;
        let late = engine.scenario_for(rule.region(), rule.crop(), 2035).grade;

        match rule.warming_response() {
            WarmingResponse::Favored => assert!(late >= early, "{}/{}", rule.region(), rule.crop()),
            WarmingResponse::Disfavored => assert!(late <= early, "{}/{}", rule.region(), rule.crop()),
            WarmingResponse::Neutral => assert_eq!(late, early),
        }
    }
}

#[test]
fn test_savings_non_decreasing_for_favored_pairs() {
    let engine = engine();

    for rule in engine.rules().iter() {
        if rule.warming_response() != WarmingResponse::Favored {
            continue;
        }
        let savings: Vec<f64> = YEARS
            .map(|y| engine.scenario_for(rule.region(), rule.crop(), y).savings_percent)
            .collect();
        assert!(
            savings.windows(2).all(|w| w[1] >= w[0]),
            "{}/{}: {:?}",
            rule.region(),
            rule.crop(),
            savings
        );
    }
}

#[test]
fn test_savings_pinned_to_zero_when_unsuitable() {
    let engine = engine();
    for year in YEARS {
        for result in engine.compute_scenario(year) {
            assert!(result.savings_percent >= 0.0);
            if result.grade == Grade::Unsuitable {
                assert_eq!(result.savings_percent, 0.0, "{}/{} {}", result.region, result.crop, year);
            }
        }
    }
}

#[test]
fn test_example_scenarios() {
    let engine = engine();

    let jeju_2025 = engine.scenario_for("Jeju Seogwipo", "mango", 2025);
    assert_eq!(jeju_2025.grade, Grade::Optimal);
    assert_relative_eq!(jeju_2025.savings_percent, 30.0);

    let jeju_2035 = engine.scenario_for("Jeju Seogwipo", "mango", 2035);
    assert_eq!(jeju_2035.grade, Grade::Optimal);
    assert_relative_eq!(jeju_2035.savings_percent, 40.0);

    let haenam_2028 = engine.scenario_for("Jeonnam Haenam", "mango", 2028);
    let haenam_2032 = engine.scenario_for("Jeonnam Haenam", "mango", 2032);
    assert_eq!(haenam_2028.grade, Grade::Suitable);
    assert_eq!(haenam_2032.grade, Grade::Optimal);
    assert_ne!(haenam_2028.cause, haenam_2032.cause);
}

#[test]
fn test_baseline_fills_pairs_without_rules() {
    let engine = engine();

    let papaya = engine.scenario_for("Gyeongnam Tongyeong", "papaya", 2031);
    assert_eq!(papaya.grade, Grade::Possible);
    assert_eq!(papaya.source, ResultSource::Baseline);
    assert_eq!(papaya.cause, BASELINE_CAUSE);

    let gijang: Vec<Grade> = engine
        .crop_names()
        .into_iter()
        .map(|crop| engine.scenario_for("Busan Gijang", crop, 2030).grade)
        .collect();
    assert_eq!(gijang, vec![Grade::Possible, Grade::Unsuitable, Grade::Suitable]);
}

#[test]
fn test_missing_entities_never_fail() {
    let engine = engine();
    let result = engine.scenario_for("Gangwon Chuncheon", "dragonfruit", 2030);

    assert_eq!(result.grade, Grade::NoData);
    assert_eq!(result.savings_percent, 0.0);

    let spec = render_spec_for(&result);
    assert_eq!((spec.color, spec.radius), marker_style(Grade::NoData));
}

#[test]
fn test_absent_sources_fall_back_to_rules() {
    let engine = ScenarioEngine::from_config(
        &EngineConfig::with_data_dir("no/such/dir"),
        &TableCache::new(),
    );

    assert!(engine.reference().is_empty());
    let results = engine.compute_scenario(2030);
    assert_eq!(results.len(), 9);
    assert!(build_markers(engine.reference(), &results).is_empty());
}

#[test]
fn test_legacy_encoding_loads_same_mapping() {
    let legacy_dir = data_dir().join("legacy");
    let (legacy, encoding) = try_load_table(&legacy_dir.join("regions_ko_euckr.csv")).unwrap();
    let utf8 = load_reference_data(legacy_dir.join("regions_ko.csv"));

    assert_eq!(encoding, SourceEncoding::EucKr);
    assert_eq!(legacy.len(), 3);
    assert_eq!(legacy.keys().collect::<Vec<_>>(), utf8.keys().collect::<Vec<_>>());
    for key in utf8.keys() {
        assert_eq!(legacy.get(key), utf8.get(key));
    }
    assert!(legacy.get("제주 서귀포").is_some());
}

#[test]
fn test_cache_parses_each_source_once() {
    let config = EngineConfig::with_data_dir(data_dir());
    let cache = TableCache::new();

    let _first = ScenarioEngine::from_config(&config, &cache);
    let _second = ScenarioEngine::from_config(&config, &cache);

    assert_eq!(cache.load_count(), 3);

    cache.invalidate(config.regions_path());
    let _third = ScenarioEngine::from_config(&config, &cache);
    assert_eq!(cache.load_count(), 4);
}

#[test]
fn test_markers_for_crop_map() {
    let engine = engine();
    let mango = engine.crop_scenarios("mango", 2032);
    let markers = build_markers(engine.reference(), &mango);

    assert_eq!(markers.len(), 4);

    let haenam = &markers[1];
    assert_relative_eq!(haenam.latitude, 34.57);
    assert_eq!(haenam.radius, 20.0);
    assert_eq!(haenam.tooltip, "Jeonnam Haenam: 1등급 (최적)");
    assert!(haenam.popup.contains("2032"));
}

#[test]
fn test_region_detail_panel() {
    let engine = engine();
    let outlook = engine.region_outlook("Jeju Seogwipo", 2030);
    let region = engine.reference().region("Jeju Seogwipo").unwrap();

    assert_eq!(outlook[0].grade, Grade::Optimal);
    assert_eq!(outlook.last().unwrap().crop, "grape");

    let html = region_detail_markup(region, &outlook);
    assert!(html.contains("Soil pH:</b> 6.5"));
    assert!(html.contains("for mango is expected to cost 35% less"));
}
