use serde::{Deserialize, Serialize};

use super::error::ProcessError;
use crate::chemistry::TimeUnit;

/// Fraction of rows used as the default baseline window
pub const DEFAULT_BASELINE_FRACTION: f64 = 0.2;

/// Minimum size of the default baseline window
pub const MIN_BASELINE_ROWS: usize = 3;

/// Upper clamp on model sodium as a fraction of the titrant concentration.
/// Keeps the inverse dilution transform away from its pole at `na == c_b`.
pub const SODIUM_CEILING_FRACTION: f64 = 0.999;

/// Configuration for a titration run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessorConfig {
    /// Titrant concentration c_b (mol/L)
    pub base_concentration: f64,

    /// Pump rate (mL/min)
    pub pump_rate: f64,

    /// Initial sample volume v0 (mL)
    pub initial_volume: f64,

    /// Unit of the time column
    pub time_unit: TimeUnit,

    /// Leading rows to skip before any calculation
    pub start_index: usize,

    /// End (exclusive) of the baseline window, counted after `start_index`.
    /// `None` uses the first 20% of rows, at least 3.
    pub baseline_end: Option<usize>,

    /// Known background-acid concentration (mol/L); skips estimation
    pub fixed_background_acid: Option<f64>,

    /// Baseline rows with pH below this value are ignored during estimation
    pub baseline_ph_floor: Option<f64>,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            base_concentration: 0.1,
            pump_rate: 1.0,
            initial_volume: 100.0,
            time_unit: TimeUnit::Seconds,
            start_index: 0,
            baseline_end: None,
            fixed_background_acid: None,
            baseline_ph_floor: None,
        }
    }
}

impl ProcessorConfig {
    /// Check that the physical parameters are usable
    pub fn validate(&self) -> Result<(), ProcessError> {
        let positive = [
            ("base_concentration", self.base_concentration),
            ("pump_rate", self.pump_rate),
            ("initial_volume", self.initial_volume),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(ProcessError::InvalidConfig(format!(
                    "{} must be a positive finite number, got {}",
                    name, value
                )));
            }
        }
        if let Some(c_a) = self.fixed_background_acid {
            if !c_a.is_finite() || c_a < 0.0 {
                return Err(ProcessError::InvalidConfig(format!(
                    "fixed_background_acid must be non-negative, got {}",
                    c_a
                )));
            }
        }
        Ok(())
    }

    /// Baseline window end for a run of `rows` rows (after `start_index`)
    pub fn baseline_window(&self, rows: usize) -> usize {
        let end = self.baseline_end.unwrap_or_else(|| {
            MIN_BASELINE_ROWS.max((rows as f64 * DEFAULT_BASELINE_FRACTION) as usize)
        });
        end.min(rows)
    }
}
