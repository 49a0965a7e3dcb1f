use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use titrapeak::analysis::{analyze, AnalysisConfig};
use titrapeak::chemistry::{build_model_curve, solve_h, ChemConstants, ModelCurveConfig};
use titrapeak::processor::{ProcessorConfig, TitrationProcessor};

/// One reading every 30 s with pH rising from 2.2 to 6.5
fn create_run(n: usize) -> (Vec<f64>, Vec<f64>) {
    let time = (0..n).map(|i| i as f64 * 30.0).collect();
    let ph = (0..n)
        .map(|i| 2.2 + 4.3 * i as f64 / (n - 1) as f64)
        .collect();
    (time, ph)
}

/// Benchmark the charge-balance root solve
fn bench_solve_h(c: &mut Criterion) {
    let constants = ChemConstants::default();
    c.bench_function("solve_h", |b| {
        b.iter(|| black_box(solve_h(black_box(0.01), black_box(0.004), &constants)))
    });
}

/// Benchmark building the standalone model curve
fn bench_model_curve(c: &mut Criterion) {
    let mut group = c.benchmark_group("model_curve");
    let constants = ChemConstants::default();

    for num_points in [100, 400, 1600] {
        let config = ModelCurveConfig {
            num_points,
            ..Default::default()
        };
        group.throughput(Throughput::Elements(num_points as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}points", num_points)),
            &config,
            |b, config| {
                b.iter(|| black_box(build_model_curve(0.01, 0.1, config, &constants)));
            },
        );
    }

    group.finish();
}

/// Benchmark both processor passes
fn bench_process(c: &mut Criterion) {
    let mut group = c.benchmark_group("process");
    let processor =
        TitrationProcessor::new(ProcessorConfig::default(), ChemConstants::default()).unwrap();

    for n in [100, 1000, 10000] {
        let (time, ph) = create_run(n);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}rows", n)),
            &(time, ph),
            |b, (time, ph)| {
                b.iter(|| black_box(processor.process(time, ph).unwrap()));
            },
        );
    }

    group.finish();
}

/// Benchmark the full pipeline
fn bench_analyze(c: &mut Criterion) {
    let mut group = c.benchmark_group("analyze");
    let config = AnalysisConfig::default();

    for n in [100, 1000] {
        let (time, ph) = create_run(n);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}rows", n)),
            &(time, ph),
            |b, (time, ph)| {
                b.iter(|| black_box(analyze(time, ph, &config).unwrap()));
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_solve_h,
    bench_model_curve,
    bench_process,
    bench_analyze
);
criterion_main!(benches);
