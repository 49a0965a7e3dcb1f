//! Standalone background-acid titration curve.
//!
//! Sweeps the normalized titrant dose, solves the charge balance at every grid
//! point and records the resulting (pH, dose) pairs. The curve depends only on
//! C_A, the titrant concentration and the equilibrium constants, never on the
//! measured samples.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::constants::ChemConstants;
use super::conversions::{ph_from_h, sodium_from_dose};
use super::solver::{solve_h, SolveError};

/// Configuration for the dose sweep
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelCurveConfig {
    /// Number of grid doses per attempt
    pub num_points: usize,
    /// pH the curve should reach
    pub target_ph: f64,
    /// Initial upper dose bound as a multiple of C_A
    pub initial_span: f64,
    /// Maximum number of sweeps (the bound doubles after each miss)
    pub max_attempts: usize,
}

impl Default for ModelCurveConfig {
    fn default() -> Self {
        Self {
            num_points: 200,
            target_ph: 7.0,
            initial_span: 2.5,
            max_attempts: 8,
        }
    }
}

/// A single point on the model curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelPoint {
    /// Model pH
    pub ph: f64,
    /// Normalized titrant dose (mol/L of initial sample)
    pub dose: f64,
}

/// Ordered (pH, dose) pairs for the background acid alone
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ModelCurve {
    /// Curve points in order of increasing dose
    pub points: Vec<ModelPoint>,
    /// Upper dose bound of the sweep that produced the curve
    pub dose_bound: f64,
    /// Sweeps performed
    pub attempts: usize,
}

impl ModelCurve {
    /// Number of points on the curve
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the curve has no points
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// pH values of the curve
    pub fn ph(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.ph).collect()
    }

    /// Dose values of the curve
    pub fn doses(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.dose).collect()
    }

    /// pH of the last point, if any
    pub fn final_ph(&self) -> Option<f64> {
        self.points.last().map(|p| p.ph)
    }

    /// Whether the curve reaches `target_ph`
    pub fn reaches(&self, target_ph: f64) -> bool {
        self.final_ph().is_some_and(|ph| ph >= target_ph)
    }

    /// Model dose at a given pH by linear interpolation between curve points.
    ///
    /// Returns `None` when `ph` lies outside the curve's pH range.
    pub fn dose_at_ph(&self, ph: f64) -> Option<f64> {
        if !ph.is_finite() {
            return None;
        }
        self.points.windows(2).find_map(|w| {
            let (lo, hi) = (w[0], w[1]);
            if ph < lo.ph || ph > hi.ph {
                return None;
            }
            let span = hi.ph - lo.ph;
            if span <= 0.0 {
                return Some(lo.dose);
            }
            let t = (ph - lo.ph) / span;
            Some(lo.dose + t * (hi.dose - lo.dose))
        })
    }
}

/// `num_points` evenly spaced values from 0 to `upper` inclusive
fn dose_grid(upper: f64, num_points: usize) -> Vec<f64> {
    match num_points {
        0 => Vec::new(),
        1 => vec![0.0],
        n => {
            let step = upper / (n - 1) as f64;
            (0..n).map(|i| i as f64 * step).collect()
        }
    }
}

/// Model pH after a normalized dose `b` of titrant at `c_b` mol/L has been
/// added to a sample containing `c_a` mol/L of background acid.
pub fn model_ph_at_dose(
    c_a: f64,
    c_b: f64,
    b: f64,
    constants: &ChemConstants,
) -> Result<f64, SolveError> {
    let na = sodium_from_dose(b, c_b);
    let c_mix = c_a / (1.0 + b / c_b);
    solve_h(c_mix, na, constants).map(ph_from_h)
}

/// Build the standalone model curve up to `config.target_ph`.
///
/// Grid points where the solver fails are skipped. If the final pH falls short
/// of the target the upper dose bound doubles and the sweep restarts from
/// scratch, up to `config.max_attempts` sweeps; the last curve is returned
/// either way.
pub fn build_model_curve(
    c_a: f64,
    c_b: f64,
    config: &ModelCurveConfig,
    constants: &ChemConstants,
) -> ModelCurve {
    let mut dose_bound = config.initial_span * c_a;
    let mut curve = ModelCurve::default();

    for attempt in 1..=config.max_attempts {
        let mut skipped = 0usize;
        let points: Vec<ModelPoint> = dose_grid(dose_bound, config.num_points)
            .into_iter()
            .filter_map(|dose| match model_ph_at_dose(c_a, c_b, dose, constants) {
                Ok(ph) => Some(ModelPoint { ph, dose }),
                Err(_) => {
                    skipped += 1;
                    None
                }
            })
            .collect();

        if skipped > 0 {
            debug!("Model sweep {}: skipped {} unsolvable grid points", attempt, skipped);
        }

        curve = ModelCurve {
            points,
            dose_bound,
            attempts: attempt,
        };

        if curve.reaches(config.target_ph) {
            break;
        }
        dose_bound *= 2.0;
    }

    if !curve.reaches(config.target_ph) {
        warn!(
            "Model curve stopped at pH {:.2} after {} sweeps (target {:.2})",
            curve.final_ph().unwrap_or(f64::NAN),
            curve.attempts,
            config.target_ph
        );
    }

    curve
}
