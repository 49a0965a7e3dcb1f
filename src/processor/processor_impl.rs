use log::{debug, info, warn};

use super::config::{ProcessorConfig, SODIUM_CEILING_FRACTION};
use super::error::ProcessError;
use super::types::{AcidSource, SampleRow, TitrationRun};
use crate::chemistry::{
    base_moles, base_volume, diluted_acid, dose_from_sodium, estimate_background_acid, h_from_ph,
    model_sodium, normalized_dose, oh_from_h, sodium_with_dilution, speciation_fraction,
    BaselinePoint, ChemConstants,
};

/// Two-pass titration processor.
///
/// Pass 1 derives the measured quantities for every row and fixes the
/// background-acid concentration from the baseline window. Pass 2 evaluates
/// the constrained background-acid model and the excess base.
#[derive(Debug, Clone)]
pub struct TitrationProcessor {
    config: ProcessorConfig,
    constants: ChemConstants,
}

impl TitrationProcessor {
    /// Create a processor, validating the configuration
    pub fn new(config: ProcessorConfig, constants: ChemConstants) -> Result<Self, ProcessError> {
        config.validate()?;
        Ok(Self { config, constants })
    }

    /// Processor configuration
    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    /// Equilibrium constants
    pub fn constants(&self) -> &ChemConstants {
        &self.constants
    }

    /// Process parallel time and pH arrays.
    ///
    /// Rows before `start_index` are dropped; a start index past the end
    /// yields an empty run with C_A = 0.
    pub fn process(&self, time: &[f64], ph: &[f64]) -> Result<TitrationRun, ProcessError> {
        if time.len() != ph.len() {
            return Err(ProcessError::ArrayLengthMismatch {
                time_len: time.len(),
                ph_len: ph.len(),
            });
        }

        let start = self.config.start_index.min(time.len());
        if start == time.len() && !time.is_empty() {
            warn!(
                "Start index {} leaves no rows out of {}",
                self.config.start_index,
                time.len()
            );
        }

        let mut rows: Vec<SampleRow> = time[start..]
            .iter()
            .zip(&ph[start..])
            .map(|(&t, &p)| self.measured_row(t, p))
            .collect();

        let (background_acid, acid_source) = self.background_acid(&rows);
        self.apply_model(&mut rows, background_acid);

        let ph_values: Vec<f64> = rows.iter().map(|r| r.ph).collect();
        let delta_b: Vec<f64> = rows.iter().map(|r| r.delta_b).collect();
        for (row, d) in rows.iter_mut().zip(finite_difference(&ph_values, &delta_b)) {
            row.d_delta_b_d_ph = d;
        }

        Ok(TitrationRun {
            rows,
            background_acid,
            acid_source,
        })
    }

    /// Pass 1: measured quantities only, model fields zeroed
    fn measured_row(&self, time: f64, ph: f64) -> SampleRow {
        let c = &self.config;
        let h = h_from_ph(ph);
        let v_b = base_volume(time, c.pump_rate, c.time_unit);
        let n_b = base_moles(v_b, c.base_concentration);

        SampleRow {
            time,
            ph,
            v_b,
            n_b,
            b_meas: normalized_dose(n_b, c.initial_volume),
            na: sodium_with_dilution(v_b, c.base_concentration, c.initial_volume),
            h,
            oh: oh_from_h(h, self.constants.k_w),
            ..Default::default()
        }
    }

    fn background_acid(&self, rows: &[SampleRow]) -> (f64, AcidSource) {
        if let Some(c_a) = self.config.fixed_background_acid {
            info!("Using fixed background acid C_A = {:.6} mol/L", c_a);
            return (c_a, AcidSource::Fixed);
        }

        let window = &rows[..self.config.baseline_window(rows.len())];
        let mut baseline: Vec<BaselinePoint> = window
            .iter()
            .filter(|r| self.config.baseline_ph_floor.map_or(true, |floor| r.ph >= floor))
            .map(|r| BaselinePoint::new(r.na, r.h, r.oh))
            .collect();

        if baseline.is_empty() && !window.is_empty() {
            warn!(
                "pH floor {:?} excludes every baseline row, using the whole window",
                self.config.baseline_ph_floor
            );
            baseline = window
                .iter()
                .map(|r| BaselinePoint::new(r.na, r.h, r.oh))
                .collect();
        }

        let estimate = estimate_background_acid(&baseline, &self.constants);
        info!(
            "Baseline window rows 0..{}: {}",
            window.len(),
            estimate
        );

        (
            estimate.c_a,
            AcidSource::Estimated {
                baseline_rows: baseline.len(),
                estimate,
            },
        )
    }

    /// Pass 2: anchored, clamped, monotone model and excess base
    fn apply_model(&self, rows: &mut [SampleRow], c_a: f64) {
        let Some(first) = rows.first() else {
            return;
        };
        let c = &self.config;
        let na_first = first.na;

        let raw: Vec<f64> = rows
            .iter()
            .map(|r| {
                let c_mix = diluted_acid(c_a, c.initial_volume, r.v_b);
                model_sodium(r.h, r.oh, c_mix, speciation_fraction(r.h, self.constants.k_a2))
            })
            .collect();

        let constrained = constrain_model_sodium(&raw, na_first, c.base_concentration);
        for (row, na_model) in rows.iter_mut().zip(constrained) {
            row.b_model = dose_from_sodium(na_model, c.base_concentration);
            row.delta_b = row.b_meas - row.b_model;
        }
        debug!("Model pass complete for {} rows (C_A = {:.6})", rows.len(), c_a);
    }
}

/// Apply the physical constraints to a raw model-sodium series.
///
/// The series is shifted so its first value equals `na_first`, each value is
/// clamped to `[0, 0.999·c_b]`, and the running maximum makes the sequence
/// non-decreasing (cumulative titrant uptake never decreases).
pub fn constrain_model_sodium(raw: &[f64], na_first: f64, c_b: f64) -> Vec<f64> {
    let Some(&raw_first) = raw.first() else {
        return Vec::new();
    };
    let offset = raw_first - na_first;
    let ceiling = SODIUM_CEILING_FRACTION * c_b;

    let mut previous = 0.0_f64;
    raw.iter()
        .map(|&value| {
            let clamped = (value - offset).min(ceiling).max(0.0);
            previous = previous.max(clamped);
            previous
        })
        .collect()
}

/// Derivative dy/dx by finite differences: forward at the first point,
/// backward at the last, central elsewhere. A zero x-step gives 0.
pub fn finite_difference(x: &[f64], y: &[f64]) -> Vec<f64> {
    let n = x.len().min(y.len());
    if n <= 1 {
        return vec![0.0; n];
    }

    (0..n)
        .map(|i| {
            let (lo, hi) = if i == 0 {
                (0, 1)
            } else if i == n - 1 {
                (n - 2, n - 1)
            } else {
                (i - 1, i + 1)
            };
            let dx = x[hi] - x[lo];
            if dx != 0.0 {
                (y[hi] - y[lo]) / dx
            } else {
                0.0
            }
        })
        .collect()
}
