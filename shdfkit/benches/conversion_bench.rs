use criterion::{black_box, criterion_group, criterion_main, Criterion};
use shdfkit::prelude::*;
use std::path::PathBuf;

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn load(name: &str) -> serde_json::Value {
    shdfkit::read_json(&fixture_path(name)).expect("fixture should load")
}

fn bench_to_neutral(c: &mut Criterion) {
    let core = ShdfKitCore::new();
    let diagram = load("blink_diagram.json");
    let options = ConvertOptions::physical();

    c.bench_function("to_neutral", |b| {
        b.iter(|| core.convert_json_to_neutral(black_box(&diagram), black_box(&options)));
    });
}

fn bench_to_simulator(c: &mut Criterion) {
    let core = ShdfKitCore::new();
    let document = load("blink_breadboard.json");
    let options = ConvertOptions::physical();

    c.bench_function("to_simulator", |b| {
        b.iter(|| core.convert_json_to_simulator(black_box(&document), black_box(&options)));
    });
}

fn bench_validate(c: &mut Criterion) {
    let core = ShdfKitCore::new();
    let document = load("invalid_document.json");

    c.bench_function("validate_shdf_document", |b| {
        b.iter(|| core.validate_json(black_box(&document)));
    });
}

fn bench_evaluate(c: &mut Criterion) {
    let core = ShdfKitCore::new();
    let document = load("blink_breadboard.json");
    let reference = load("reference.json");
    let options = EvaluationOptions::new(Mode::Physical).with_scenario("traffic_light");

    c.bench_function("evaluate_hardware_design", |b| {
        b.iter(|| core.evaluate_json(black_box(&document), Some(black_box(&reference)), &options));
    });
}

fn bench_catalog_build(c: &mut Criterion) {
    c.bench_function("catalog_builtin", |b| b.iter(Catalog::builtin));
}

criterion_group!(
    benches,
    bench_to_neutral,
    bench_to_simulator,
    bench_validate,
    bench_evaluate,
    bench_catalog_build
);
criterion_main!(benches);
