//! Identification benchmarks
//!
//! Benchmarks step-response simulation, model selection and the full analysis pipeline.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use fopdtsim::prelude::*;
use fopdtsim::signal::uniform_grid;

fn synthetic_record(samples: usize) -> StepTestRecord {
    let params = FopdtParameters::new(2.0, 10.0, 3.0);
    let horizon = 100.0;
    let time = uniform_grid(0.0, horizon, horizon / samples as f64).unwrap();
    let output = params.ideal_response(&time, 1.5);
    StepTestRecord::new(1.5, time, output).unwrap()
}

/// Benchmark step simulation for increasing Padé orders
fn bench_simulate_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("Simulate Step");
    let params = FopdtParameters::new(2.0, 10.0, 3.0);
    let times = uniform_grid(0.0, 100.0, 0.1).unwrap();

    for order in [1, 2, 4, 6, 8].iter() {
        let tf = params.transfer_function(*order).unwrap();
        group.bench_with_input(BenchmarkId::new("pade_order", order), order, |b, _| {
            b.iter(|| simulate_step(black_box(&tf), &times, 1.5).unwrap());
        });
    }

    group.finish();
}

/// Benchmark model selection for increasing record lengths
fn bench_identify_best(c: &mut Criterion) {
    let mut group = c.benchmark_group("Identify Best");

    for samples in [100, 1000, 10000].iter() {
        let record = synthetic_record(*samples);
        group.bench_with_input(BenchmarkId::new("samples", samples), samples, |b, _| {
            b.iter(|| identify_best(black_box(&record), 2).unwrap());
        });
    }

    group.finish();
}

/// Benchmark the full pipeline on a typical record
fn bench_analyze(c: &mut Criterion) {
    let record = synthetic_record(1000);
    let config = AnalysisConfig::default();

    c.bench_function("Analyze (1000 samples)", |b| {
        b.iter(|| analyze(black_box(&record), &config).unwrap());
    });
}

criterion_group!(benches, bench_simulate_step, bench_identify_best, bench_analyze);
criterion_main!(benches);
