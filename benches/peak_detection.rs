use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use titrapeak::peaks::{gradient, savgol_smooth, PeakConfig, PeakDetector};

/// pH grid over 2..8 with three buffering steps and seeded noise
fn synthetic_curve(n: usize) -> (Vec<f64>, Vec<f64>) {
    let mut rng = StdRng::seed_from_u64(17);
    let noise = Normal::new(0.0, 0.0002).unwrap();
    let steps = [(3.0, 0.01), (5.0, 0.02), (7.0, 0.03)];

    let ph: Vec<f64> = (0..n)
        .map(|i| 2.0 + 6.0 * i as f64 / (n - 1) as f64)
        .collect();
    let delta_b = ph
        .iter()
        .map(|&p| {
            let level: f64 = steps
                .iter()
                .filter(|(at, _)| p >= *at)
                .map(|(_, size)| size)
                .sum();
            level + noise.sample(&mut rng)
        })
        .collect();
    (ph, delta_b)
}

/// Benchmark Savitzky-Golay smoothing alone
fn bench_smoothing(c: &mut Criterion) {
    let mut group = c.benchmark_group("savgol_smooth");

    for n in [200, 1000, 5000] {
        let (_, delta_b) = synthetic_curve(n);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}points", n)),
            &delta_b,
            |b, delta_b| {
                b.iter(|| black_box(savgol_smooth(delta_b, 19, 3)));
            },
        );
    }

    group.finish();
}

/// Benchmark the non-uniform gradient
fn bench_gradient(c: &mut Criterion) {
    let mut group = c.benchmark_group("gradient");

    for n in [200, 1000, 5000] {
        let (ph, delta_b) = synthetic_curve(n);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}points", n)),
            &(ph, delta_b),
            |b, (ph, delta_b)| {
                b.iter(|| black_box(gradient(ph, delta_b)));
            },
        );
    }

    group.finish();
}

/// Benchmark a full detection pass, with and without the cutoff
fn bench_detect(c: &mut Criterion) {
    let mut group = c.benchmark_group("detect");

    for n in [200, 1000, 5000] {
        let (ph, delta_b) = synthetic_curve(n);
        group.throughput(Throughput::Elements(n as u64));

        for (label, config) in [
            ("cutoff", PeakConfig::default()),
            ("no_cutoff", PeakConfig::without_cutoff()),
        ] {
            let detector = PeakDetector::new(config);
            group.bench_with_input(
                BenchmarkId::new(label, format!("{}points", n)),
                &(&ph, &delta_b),
                |b, (ph, delta_b)| {
                    b.iter(|| black_box(detector.detect(ph, delta_b).unwrap()));
                },
            );
        }
    }

    group.finish();
}

criterion_group!(benches, bench_smoothing, bench_gradient, bench_detect);
criterion_main!(benches);
