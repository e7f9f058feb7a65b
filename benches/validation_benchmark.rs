use std::collections::BTreeSet;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use serde_json::json;

use tickboard_processor::analyzers::PredictionAnalyzer;
use tickboard_processor::models::{RawSubmission, RegionCode, RegionDataset, RegionFeature};
use tickboard_processor::processors::SubmissionValidator;

// Synthetic universe sized like the real NUTS3 partition (~1500 regions).
fn synthetic_codes(count: usize) -> Vec<String> {
    (0..count).map(|i| format!("ZZ{:03}", i)).collect()
}

fn synthetic_dataset(count: usize, variables: usize) -> RegionDataset {
    let features = synthetic_codes(count)
        .into_iter()
        .map(|code| {
            let mut feature = RegionFeature::new(code).with_geometry(json!({
                "type": "Polygon",
                "coordinates": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]]
            }));
            for v in 0..variables {
                feature = feature.with_property(format!("VAR{v}"), json!(v as f64 * 0.5));
            }
            feature
        })
        .collect();
    RegionDataset::new(features)
}

fn complete_submission(count: usize) -> RawSubmission {
    let pairs: Vec<(String, String)> = synthetic_codes(count)
        .into_iter()
        .enumerate()
        .map(|(i, code)| (code, format!("{}.5", i)))
        .collect();
    RawSubmission::from_pairs(&pairs)
}

fn benchmark_validate_accept(c: &mut Criterion) {
    let dataset = synthetic_dataset(1500, 8);
    let validator = SubmissionValidator::from_dataset(&dataset).unwrap();
    let submission = complete_submission(1500);

    c.bench_function("validate_accept_1500", |b| {
        b.iter(|| {
            let validated = validator.validate(&submission, "FreshVariable").unwrap();
            black_box(validated.len())
        })
    });
}

fn benchmark_validate_reject_missing(c: &mut Criterion) {
    let dataset = synthetic_dataset(1500, 8);
    let validator = SubmissionValidator::from_dataset(&dataset).unwrap();
    let submission = complete_submission(750);

    c.bench_function("validate_reject_missing_half", |b| {
        b.iter(|| {
            let err = validator.validate(&submission, "FreshVariable").unwrap_err();
            black_box(err.to_string().len())
        })
    });
}

fn benchmark_merge_column(c: &mut Criterion) {
    let dataset = synthetic_dataset(1500, 8);
    let validator = SubmissionValidator::from_dataset(&dataset).unwrap();
    let submission = complete_submission(1500);
    let validated = validator.validate(&submission, "FreshVariable").unwrap();

    c.bench_function("merge_column_1500", |b| {
        b.iter(|| {
            let mut copy = dataset.clone();
            copy.insert_column(validated.variable(), validated.values())
                .unwrap();
            black_box(copy.len())
        })
    });
}

fn benchmark_universe_extraction(c: &mut Criterion) {
    let mut group = c.benchmark_group("region_codes_by_size");

    for &size in &[100, 500, 1500] {
        group.bench_with_input(BenchmarkId::new("regions", size), &size, |b, &size| {
            let dataset = synthetic_dataset(size, 4);
            b.iter(|| {
                let codes: BTreeSet<RegionCode> = dataset.region_codes().unwrap();
                black_box(codes.len())
            })
        });
    }
    group.finish();
}

fn benchmark_metrics(c: &mut Criterion) {
    let analyzer = PredictionAnalyzer::new();
    let y_true: Vec<f64> = (0..1500).map(|i| (i as f64 * 0.37).sin() * 50.0 + 60.0).collect();
    let y_pred: Vec<f64> = y_true.iter().map(|v| v * 0.93 + 2.0).collect();

    c.bench_function("prediction_metrics_1500", |b| {
        b.iter(|| {
            let metrics = analyzer.calculate_metrics(&y_true, &y_pred).unwrap();
            black_box(metrics.rmse)
        })
    });
}

criterion_group!(
    benches,
    benchmark_validate_accept,
    benchmark_validate_reject_missing,
    benchmark_merge_column,
    benchmark_universe_extraction,
    benchmark_metrics
);
criterion_main!(benches);
