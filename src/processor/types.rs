use serde::Serialize;

use crate::chemistry::AcidEstimate;

/// One processed instrument reading
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SampleRow {
    /// Time since start of titration, in the run's time unit
    pub time: f64,
    /// Measured pH
    pub ph: f64,
    /// Delivered titrant volume (mL)
    pub v_b: f64,
    /// Delivered titrant amount (mol)
    pub n_b: f64,
    /// Normalized titrant dose (mol/L of initial sample)
    pub b_meas: f64,
    /// Dilution-corrected titrant cation concentration (mol/L)
    pub na: f64,
    /// H⁺ concentration (mol/L)
    pub h: f64,
    /// OH⁻ concentration (mol/L)
    pub oh: f64,
    /// Background-acid-only model dose (mol/L)
    pub b_model: f64,
    /// Excess base `b_meas − b_model` (mol/L)
    pub delta_b: f64,
    /// d(delta_b)/d(pH)
    pub d_delta_b_d_ph: f64,
}

/// How the run's background-acid concentration was obtained
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum AcidSource {
    /// Supplied by the caller
    Fixed,
    /// Estimated from the baseline window
    Estimated {
        /// Rows of the baseline window passed to the estimator
        baseline_rows: usize,
        /// Estimator details
        estimate: AcidEstimate,
    },
}

/// Processed titration: rows in acquisition order plus the background-acid
/// concentration used for the model pass
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TitrationRun {
    /// Processed rows, index = acquisition order after `start_index`
    pub rows: Vec<SampleRow>,
    /// Background-acid concentration C_A (mol/L)
    pub background_acid: f64,
    /// Origin of `background_acid`
    pub acid_source: AcidSource,
}

impl TitrationRun {
    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the run has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// pH column
    pub fn ph(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.ph).collect()
    }

    /// Excess-base column
    pub fn delta_b(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.delta_b).collect()
    }

    /// Model dose column
    pub fn b_model(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.b_model).collect()
    }
}
