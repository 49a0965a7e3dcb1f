use super::*;
use crate::chemistry::{model_ph_at_dose, normalized_dose, base_moles, ChemConstants, TimeUnit};

fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| start + (end - start) * i as f64 / (n - 1) as f64)
        .collect()
}

fn processor(config: ProcessorConfig) -> TitrationProcessor {
    TitrationProcessor::new(config, ChemConstants::default()).unwrap()
}

#[test]
fn test_process_returns_every_row() {
    let ph = linspace(2.0, 6.0, 20);
    let time = linspace(0.0, 1200.0, 20);

    let run = processor(ProcessorConfig::default()).process(&time, &ph).unwrap();
    assert_eq!(run.len(), 20);
    assert!(matches!(
        run.acid_source,
        AcidSource::Estimated { baseline_rows: 4, .. }
    ));
    for (row, (&t, &p)) in run.rows.iter().zip(time.iter().zip(&ph)) {
        assert_eq!(row.time, t);
        assert_eq!(row.ph, p);
    }
}

#[test]
fn test_start_index_skips_leading_rows() {
    let ph = linspace(2.0, 6.0, 20);
    let time = linspace(0.0, 1200.0, 20);

    let config = ProcessorConfig {
        start_index: 5,
        ..Default::default()
    };
    let run = processor(config).process(&time, &ph).unwrap();
    assert_eq!(run.len(), 15);
    assert_eq!(run.rows[0].ph, ph[5]);
    assert_eq!(run.rows[0].time, time[5]);
}

#[test]
fn test_start_index_past_end_is_empty() {
    let config = ProcessorConfig {
        start_index: 10,
        ..Default::default()
    };
    let run = processor(config).process(&[0.0, 60.0], &[2.0, 2.1]).unwrap();
    assert!(run.is_empty());
    assert_eq!(run.background_acid, 0.0);
}

#[test]
fn test_length_mismatch_is_an_error() {
    let err = processor(ProcessorConfig::default())
        .process(&[0.0, 1.0], &[2.0])
        .unwrap_err();
    assert!(matches!(
        err,
        ProcessError::ArrayLengthMismatch {
            time_len: 2,
            ph_len: 1
        }
    ));
}

#[test]
fn test_invalid_config_rejected() {
    for config in [
        ProcessorConfig {
            base_concentration: 0.0,
            ..Default::default()
        },
        ProcessorConfig {
            initial_volume: f64::NAN,
            ..Default::default()
        },
        ProcessorConfig {
            fixed_background_acid: Some(-1.0),
            ..Default::default()
        },
    ] {
        assert!(matches!(
            TitrationProcessor::new(config, ChemConstants::default()),
            Err(ProcessError::InvalidConfig(_))
        ));
    }
}

#[test]
fn test_processor_keeps_settings() {
    let config = ProcessorConfig {
        base_concentration: 0.05,
        time_unit: TimeUnit::Minutes,
        ..Default::default()
    };
    let constants = ChemConstants::new(1.0e-2, 1.0e-14);
    let processor = TitrationProcessor::new(config.clone(), constants).unwrap();

    assert_eq!(processor.config(), &config);
    assert_eq!(processor.constants().k_a2, 1.0e-2);
    assert_eq!(processor.constants().k_w, 1.0e-14);
}

#[test]
fn test_baseline_window_defaults() {
    let config = ProcessorConfig::default();
    assert_eq!(config.baseline_window(20), 4);
    assert_eq!(config.baseline_window(10), 3);
    assert_eq!(config.baseline_window(2), 2);
    assert_eq!(config.baseline_window(100), 20);

    let explicit = ProcessorConfig {
        baseline_end: Some(50),
        ..Default::default()
    };
    assert_eq!(explicit.baseline_window(10), 10);
}

#[test]
fn test_measured_quantities() {
    let config = ProcessorConfig {
        base_concentration: 0.2,
        pump_rate: 2.0,
        initial_volume: 200.0,
        fixed_background_acid: Some(0.1),
        ..Default::default()
    };
    let run = processor(config).process(&[0.0, 120.0], &[3.0, 4.0]).unwrap();
    let row = run.rows[1];
    assert_eq!(row.v_b, 4.0);
    assert!((row.n_b - 0.0008).abs() < 1e-15);
    assert!((row.b_meas - 0.004).abs() < 1e-15);
    assert!((row.na - 0.2 * 4.0 / 204.0).abs() < 1e-15);
    assert!((row.h - 1e-4).abs() < 1e-16);
    assert_eq!(run.acid_source, AcidSource::Fixed);
    assert_eq!(run.background_acid, 0.1);
}

#[test]
fn test_minutes_time_unit() {
    let config = ProcessorConfig {
        time_unit: TimeUnit::Minutes,
        ..Default::default()
    };
    let run = processor(config).process(&[0.0, 1.0, 2.0], &[2.0, 2.1, 2.2]).unwrap();
    assert_eq!(run.rows[2].v_b, 2.0);
}

#[test]
fn test_model_anchored_at_first_row() {
    let ph = linspace(2.0, 6.0, 20);
    let time = linspace(0.0, 1200.0, 20);
    let run = processor(ProcessorConfig::default()).process(&time, &ph).unwrap();

    // no titrant at t = 0, so the anchored model sits at zero too
    assert_eq!(run.rows[0].b_model, 0.0);
    assert_eq!(run.rows[0].delta_b, 0.0);
    assert!(run.rows.windows(2).all(|w| w[1].b_model >= w[0].b_model));
    for row in &run.rows {
        assert!((row.delta_b - (row.b_meas - row.b_model)).abs() < 1e-15);
    }
}

/// Samples generated from the background-acid model itself leave no excess base
#[test]
fn test_pure_background_acid_has_no_excess_base() {
    let constants = ChemConstants::default();
    let (c_a, c_b, v0, q) = (0.01, 0.1, 100.0, 1.0);
    let time = linspace(0.0, 600.0, 30);
    let ph: Vec<f64> = time
        .iter()
        .map(|&t| {
            let b = normalized_dose(base_moles(q * t / 60.0, c_b), v0);
            model_ph_at_dose(c_a, c_b, b, &constants).unwrap()
        })
        .collect();

    let fixed = ProcessorConfig {
        fixed_background_acid: Some(c_a),
        ..Default::default()
    };
    let run = processor(fixed).process(&time, &ph).unwrap();
    for row in &run.rows {
        assert!(row.delta_b.abs() < 1e-10, "delta_b = {:e}", row.delta_b);
    }

    // the estimator sees the diluted acid, so it lands slightly low
    let estimated = processor(ProcessorConfig::default()).process(&time, &ph).unwrap();
    let rel = (estimated.background_acid - c_a) / c_a;
    assert!(rel <= 1e-9 && rel > -0.03, "relative error {rel}");
}

#[test]
fn test_ph_floor_filters_baseline() {
    let ph = vec![1.0, 1.1, 2.5, 2.6, 2.7, 3.0, 3.5, 4.0, 4.5, 5.0];
    let time = linspace(0.0, 540.0, 10);

    let config = ProcessorConfig {
        baseline_end: Some(5),
        baseline_ph_floor: Some(2.0),
        ..Default::default()
    };
    let run = processor(config).process(&time, &ph).unwrap();
    assert!(matches!(
        run.acid_source,
        AcidSource::Estimated { baseline_rows: 3, .. }
    ));

    let config = ProcessorConfig {
        baseline_end: Some(5),
        baseline_ph_floor: Some(9.0),
        ..Default::default()
    };
    let run = processor(config).process(&time, &ph).unwrap();
    assert!(matches!(
        run.acid_source,
        AcidSource::Estimated { baseline_rows: 5, .. }
    ));
}

#[test]
fn test_constrain_model_sodium() {
    let constrained = constrain_model_sodium(&[0.5, 0.2, 0.9, 2.0], 0.0, 1.0);
    assert_eq!(constrained.len(), 4);
    assert_eq!(constrained[0], 0.0);
    assert_eq!(constrained[1], 0.0);
    assert!((constrained[2] - 0.4).abs() < 1e-12);
    assert_eq!(constrained[3], 0.999);
    assert!(constrain_model_sodium(&[], 0.0, 1.0).is_empty());
}

#[test]
fn test_finite_difference() {
    let x = linspace(0.0, 10.0, 11);
    let y: Vec<f64> = x.iter().map(|v| 2.0 * v + 1.0).collect();
    assert!(finite_difference(&x, &y).iter().all(|d| (d - 2.0).abs() < 1e-12));

    assert!(finite_difference(&[], &[]).is_empty());
    assert_eq!(finite_difference(&[1.0], &[2.0]), vec![0.0]);
    assert_eq!(finite_difference(&[1.0, 1.0], &[2.0, 3.0]), vec![0.0, 0.0]);
}
