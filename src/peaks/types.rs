use std::fmt;

use serde::Serialize;

/// A buffering region: one titratable species
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Peak {
    /// 1-based id in order of increasing apex pH
    pub peak_id: usize,
    /// pH where the region begins
    pub ph_start: f64,
    /// pH of the steepest excess-base rise
    pub ph_apex: f64,
    /// pH where the region ends
    pub ph_end: f64,
    /// Excess base consumed across the region (mol/L)
    pub delta_b_step: f64,
}

impl fmt::Display for Peak {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Peak {}: pH {:.2} .. {:.2} (apex {:.2}), step {:.6} mol/L",
            self.peak_id, self.ph_start, self.ph_end, self.ph_apex, self.delta_b_step
        )
    }
}

/// Noise-derived acceptance thresholds of one detection pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct NoiseThresholds {
    /// Robust sigma of the derivative
    pub sigma: f64,
    /// Minimum segment |derivative| for an event
    pub min_prominence: f64,
    /// Robust sigma of the smoothed point-to-point increments
    pub step_sigma: f64,
    /// Minimum |step| for a peak
    pub step_min: f64,
}

/// How the pH cutoff was applied
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(tag = "kind", content = "ph", rename_all = "snake_case")]
pub enum AppliedCutoff {
    /// No cutoff
    #[default]
    None,
    /// Apexes above the cutoff were dropped
    UpperBound(f64),
    /// Only data from the first pH at or above the cutoff was analysed
    LowerBound(f64),
}

impl AppliedCutoff {
    /// Whether an event apex at `ph` survives the cutoff
    pub fn admits(&self, ph: f64) -> bool {
        match *self {
            AppliedCutoff::None => true,
            AppliedCutoff::UpperBound(cutoff) => ph <= cutoff,
            AppliedCutoff::LowerBound(cutoff) => ph >= cutoff,
        }
    }
}

/// Result of a detection call
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PeakReport {
    /// Peaks sorted by apex pH, ids 1..=n
    pub peaks: Vec<Peak>,
    /// Thresholds of the pass that produced `peaks`
    pub thresholds: NoiseThresholds,
    /// Cutoff interpretation of that pass
    pub cutoff: AppliedCutoff,
}

impl PeakReport {
    /// Number of peaks
    pub fn len(&self) -> usize {
        self.peaks.len()
    }

    /// Whether no peak was found
    pub fn is_empty(&self) -> bool {
        self.peaks.is_empty()
    }

    /// Sum of all steps (mol/L)
    pub fn total_step(&self) -> f64 {
        self.peaks.iter().map(|p| p.delta_b_step).sum()
    }
}
