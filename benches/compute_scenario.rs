use criterion::{black_box, criterion_group, criterion_main, Criterion};
use fruit_suitability_rust::{build_markers, render_spec_for, EngineConfig, ScenarioEngine, TableCache};

fn bench_year_sweep(c: &mut Criterion) {
    let config = EngineConfig::with_data_dir(concat!(env!("CARGO_MANIFEST_DIR"), "/data"));
    let engine = ScenarioEngine::from_config(&config, &TableCache::new());

    c.bench_function("compute_scenario 2025-2035", |b| {
        b.iter(|| {
            for year in 2025..=2035 {
                black_box(engine.compute_scenario(black_box(year)));
            }
        })
    });

    let results = engine.compute_scenario(2030);
    c.bench_function("render all results", |b| {
        b.iter(|| {
            for result in &results {
                black_box(render_spec_for(result));
            }
            black_box(build_markers(engine.reference(), &results))
        })
    });
}

criterion_group!(benches, bench_year_sweep);
criterion_main!(benches);
