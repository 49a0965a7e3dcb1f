use super::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| start + (end - start) * i as f64 / (n - 1) as f64)
        .collect()
}

/// Hard steps of `size` at each `ph` plus seeded Gaussian noise
fn step_curve(ph: &[f64], steps: &[(f64, f64)], noise: f64, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let normal = Normal::new(0.0, noise).unwrap();
    ph.iter()
        .map(|&p| {
            let level: f64 = steps
                .iter()
                .filter(|(at, _)| p >= *at)
                .map(|(_, size)| size)
                .sum();
            if noise > 0.0 {
                level + normal.sample(&mut rng)
            } else {
                level
            }
        })
        .collect()
}

// Smoothing

#[test]
fn test_savgol_preserves_cubic() {
    let x = linspace(-2.0, 3.0, 40);
    let y: Vec<f64> = x.iter().map(|v| 0.5 * v * v * v - v * v + 2.0 * v - 1.0).collect();
    let smoothed = savgol_smooth(&y, 11, 3);
    assert_eq!(smoothed.len(), y.len());
    for (s, v) in smoothed.iter().zip(&y) {
        assert!((s - v).abs() < 1e-9, "{s} vs {v}");
    }
}

#[test]
fn test_savgol_reduces_noise() {
    let x = linspace(0.0, 10.0, 200);
    let clean: Vec<f64> = x.iter().map(|v| v.sin()).collect();
    let mut rng = StdRng::seed_from_u64(7);
    let normal = Normal::new(0.0, 0.1).unwrap();
    let noisy: Vec<f64> = clean.iter().map(|c| c + normal.sample(&mut rng)).collect();

    let smoothed = savgol_smooth(&noisy, 19, 3);
    let residual = |series: &[f64]| -> f64 {
        series
            .iter()
            .zip(&clean)
            .map(|(s, c)| (s - c).powi(2))
            .sum::<f64>()
    };
    assert!(residual(&smoothed) < 0.5 * residual(&noisy));
}

#[test]
fn test_savgol_short_input() {
    // too short to smooth at all
    assert_eq!(savgol_smooth(&[1.0, 5.0, 2.0], 19, 3), vec![1.0, 5.0, 2.0]);
    assert!(savgol_smooth(&[], 19, 3).is_empty());

    // four samples leave a window too small to change anything
    let y = [1.0, 4.0, 2.0, 8.0];
    let smoothed = savgol_smooth(&y, 19, 3);
    for (s, v) in smoothed.iter().zip(&y) {
        assert!((s - v).abs() < 1e-9);
    }

    // 5-point window keeps a quadratic
    let y: Vec<f64> = (0..8).map(|i| (i * i) as f64).collect();
    let smoothed = savgol_smooth(&y, 19, 3);
    for (s, v) in smoothed.iter().zip(&y) {
        assert!((s - v).abs() < 1e-9);
    }
}

#[test]
fn test_savgol_even_window_grows() {
    let y: Vec<f64> = (0..30).map(|i| ((i * 7) % 5) as f64).collect();
    assert_eq!(savgol_smooth(&y, 8, 2), savgol_smooth(&y, 9, 2));
}

// Gradient

#[test]
fn test_gradient_exact_for_quadratic_on_uneven_grid() {
    let x = [0.0, 0.1, 0.35, 0.5, 0.9, 1.0, 1.6];
    let y: Vec<f64> = x.iter().map(|v| 3.0 * v * v - v + 2.0).collect();
    let d = gradient(&x, &y);
    for (di, xi) in d.iter().zip(&x) {
        assert!((di - (6.0 * xi - 1.0)).abs() < 1e-9, "{di} at {xi}");
    }
}

#[test]
fn test_gradient_degenerate_inputs() {
    assert!(gradient(&[], &[]).is_empty());
    assert_eq!(gradient(&[1.0], &[3.0]), vec![0.0]);
    assert_eq!(gradient(&[1.0, 2.0], &[3.0, 5.0]), vec![2.0, 2.0]);

    // repeated x falls back to the wider difference
    let d = gradient(&[0.0, 1.0, 1.0, 2.0], &[0.0, 1.0, 1.0, 2.0]);
    assert!(d.iter().all(|v| v.is_finite()));
    assert!((d[1] - 1.0).abs() < 1e-12);
}

// Segmentation

#[test]
fn test_zero_crossings() {
    let d = [1.0, 2.0, -1.0, -2.0, 0.0, 3.0, 4.0];
    // sign change 1->2, zero at 4, change at 4->5 (zero carries -1)
    assert_eq!(zero_crossings(&d), vec![0, 1, 4, 6]);
    assert!(zero_crossings(&[]).is_empty());
    assert_eq!(zero_crossings(&[0.5]), vec![0]);
}

#[test]
fn test_find_segments() {
    let ph = linspace(2.0, 3.2, 7);
    let d = [0.1, 0.5, 0.2, -0.1, -0.7, -0.3, -0.2];
    let segments = find_segments(&ph, &d);

    assert_eq!(segments.len(), 2);
    assert_eq!((segments[0].start, segments[0].end), (0, 2));
    assert_eq!(segments[0].apex, 1);
    assert_eq!(segments[0].sign, 1);
    assert!((segments[0].magnitude - 0.5).abs() < 1e-15);

    assert_eq!((segments[1].start, segments[1].end), (2, 6));
    assert_eq!(segments[1].apex, 4);
    assert_eq!(segments[1].sign, -1);
    assert_eq!(segments[1].ph_start, ph[2]);
    assert_eq!(segments[1].ph_end, ph[6]);
    assert_eq!(segments[1].ph_apex, ph[4]);
}

// Detector

#[test]
fn test_length_mismatch() {
    let err = PeakDetector::default().detect(&[1.0, 2.0], &[0.0]).unwrap_err();
    assert_eq!(
        err,
        PeakError::ArrayLengthMismatch {
            ph_len: 2,
            delta_b_len: 1
        }
    );
}

#[test]
fn test_too_few_points() {
    let report = PeakDetector::default().detect(&[2.0, 3.0], &[0.0, 0.01]).unwrap();
    assert!(report.is_empty());
    assert!(PeakDetector::default().detect(&[], &[]).unwrap().is_empty());
}

#[test]
fn test_flat_signal_has_no_peaks() {
    let ph = linspace(2.0, 6.0, 100);
    let report = PeakDetector::new(PeakConfig::without_cutoff())
        .detect(&ph, &vec![0.0; 100])
        .unwrap();
    assert!(report.is_empty());
    assert_eq!(report.thresholds.step_min, 1e-4);
    assert_eq!(report.thresholds.min_prominence, 0.001);
}

#[test]
fn test_single_step() {
    let ph = linspace(2.0, 6.0, 200);
    let delta_b = step_curve(&ph, &[(3.5, 0.01)], 0.0002, 42);

    let report = PeakDetector::default().detect(&ph, &delta_b).unwrap();
    assert_eq!(report.cutoff, AppliedCutoff::UpperBound(6.5));
    assert_eq!(report.len(), 1);

    let peak = report.peaks[0];
    assert_eq!(peak.peak_id, 1);
    assert!((peak.ph_apex - 3.5).abs() < 0.2);
    assert!(peak.ph_start <= peak.ph_apex && peak.ph_apex <= peak.ph_end);
    assert!((peak.delta_b_step - 0.01).abs() / 0.01 <= 0.03);
}

#[test]
fn test_negative_step_rejected() {
    let ph = linspace(2.0, 6.0, 200);
    let delta_b = step_curve(&ph, &[(3.5, -0.01)], 0.0, 0);
    let report = PeakDetector::new(PeakConfig::without_cutoff())
        .detect(&ph, &delta_b)
        .unwrap();
    assert!(report.is_empty());
}

#[test]
fn test_peaks_renumbered_by_apex() {
    let ph = linspace(2.0, 8.0, 300);
    let delta_b = step_curve(&ph, &[(3.0, 0.01), (5.0, 0.02), (7.0, 0.03)], 0.0002, 3);
    let peaks = detect_peaks(&ph, &delta_b, &PeakConfig::without_cutoff()).unwrap();

    assert_eq!(peaks.len(), 3);
    for (i, peak) in peaks.iter().enumerate() {
        assert_eq!(peak.peak_id, i + 1);
    }
    assert!(peaks.windows(2).all(|w| w[0].ph_apex < w[1].ph_apex));
}

#[test]
fn test_lower_bound_fallback() {
    let ph = linspace(2.0, 8.0, 300);
    let delta_b = step_curve(&ph, &[(7.0, 0.02)], 0.0, 0);

    let config = PeakConfig::default().with_cutoff(Some(6.5));
    let report = PeakDetector::new(config).detect(&ph, &delta_b).unwrap();
    assert_eq!(report.cutoff, AppliedCutoff::LowerBound(6.5));
    assert_eq!(report.len(), 1);
    assert!((report.peaks[0].ph_apex - 7.0).abs() < 0.2);
}

#[test]
fn test_lower_bound_retry_has_no_apex_filter() {
    // the electrode dips back below the cutoff after first reaching it
    let mut ph = linspace(2.0, 8.0, 300);
    for p in ph.iter_mut().filter(|p| **p > 6.55 && **p < 6.75) {
        *p -= 0.4;
    }
    let delta_b = step_curve(&ph, &[(7.0, 0.02)], 0.0, 0);

    let config = PeakConfig::default().with_cutoff(Some(6.5));
    let report = PeakDetector::new(config).detect(&ph, &delta_b).unwrap();
    assert_eq!(report.cutoff, AppliedCutoff::LowerBound(6.5));

    let start = ph.iter().position(|&p| p >= 6.5).unwrap();
    assert!(ph[start..].iter().any(|&p| p < 6.5));
    let unfiltered = PeakDetector::new(PeakConfig::without_cutoff())
        .detect(&ph[start..], &delta_b[start..])
        .unwrap();
    assert_eq!(report.peaks, unfiltered.peaks);
    assert_eq!(report.thresholds, unfiltered.thresholds);
    assert_eq!(report.len(), 1);
}

#[test]
fn test_low_cutoff_does_not_fall_back() {
    let ph = linspace(2.0, 8.0, 300);
    let delta_b = step_curve(&ph, &[(7.0, 0.02)], 0.0, 0);

    // 3.0 is below min + 0.3 * range = 3.8
    let config = PeakConfig::default().with_cutoff(Some(3.0));
    let detector = PeakDetector::new(config);
    assert_eq!(detector.config().ph_cutoff, Some(3.0));
    let report = detector.detect(&ph, &delta_b).unwrap();
    assert_eq!(report.cutoff, AppliedCutoff::UpperBound(3.0));
    assert!(report.is_empty());
}

#[test]
fn test_cutoff_admits() {
    assert!(AppliedCutoff::None.admits(14.0));
    assert!(AppliedCutoff::UpperBound(6.5).admits(6.5));
    assert!(!AppliedCutoff::UpperBound(6.5).admits(6.6));
    assert!(AppliedCutoff::LowerBound(6.5).admits(7.0));
    assert!(!AppliedCutoff::LowerBound(6.5).admits(6.0));
}

#[test]
fn test_peak_config_from_toml() {
    let config: PeakConfig = toml::from_str("window_length = 11\nph_cutoff = 5.0").unwrap();
    assert_eq!(config.window_length, 11);
    assert_eq!(config.polyorder, DEFAULT_POLYORDER);
    assert_eq!(config.ph_cutoff, Some(5.0));
    assert_eq!(config.prominence, Some(DEFAULT_PROMINENCE));
}
