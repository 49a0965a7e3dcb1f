//! Robust background-acid estimation from a baseline window.

use std::fmt;

use log::debug;
use serde::Serialize;

use super::constants::ChemConstants;
use super::conversions::{h_from_ph, oh_from_h, speciation_fraction};
use crate::stats::{median, median_abs_deviation, MAD_SCALE};

/// Outlier threshold in Gaussian-equivalent standard deviations
pub const OUTLIER_THRESHOLD: f64 = 3.0;

/// One baseline sample: measured titrant cation concentration plus the
/// derived H⁺ and OH⁻ concentrations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BaselinePoint {
    /// Dilution-corrected sodium concentration (mol/L)
    pub na: f64,
    /// H⁺ concentration (mol/L)
    pub h: f64,
    /// OH⁻ concentration (mol/L)
    pub oh: f64,
}

impl BaselinePoint {
    /// Create a baseline point from precomputed concentrations
    pub fn new(na: f64, h: f64, oh: f64) -> Self {
        Self { na, h, oh }
    }

    /// Create a baseline point from a pH reading
    pub fn from_ph(ph: f64, na: f64, constants: &ChemConstants) -> Self {
        let h = h_from_ph(ph);
        Self {
            na,
            h,
            oh: oh_from_h(h, constants.k_w),
        }
    }

    /// Per-point background-acid estimate `(na + h − oh) / f(h)`
    pub fn acid_estimate(&self, constants: &ChemConstants) -> f64 {
        (self.na + self.h - self.oh) / speciation_fraction(self.h, constants.k_a2)
    }
}

/// Result of a robust background-acid estimate
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AcidEstimate {
    /// Estimated total background-acid concentration (mol/L)
    pub c_a: f64,
    /// Median of the per-point estimates before outlier rejection
    pub median: f64,
    /// Median absolute deviation of the per-point estimates
    pub mad: f64,
    /// Points retained after outlier rejection
    pub inliers: usize,
    /// Points supplied
    pub total: usize,
}

impl fmt::Display for AcidEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "C_A = {:.6} mol/L ({} of {} baseline points, MAD {:.3e})",
            self.c_a, self.inliers, self.total, self.mad
        )
    }
}

/// Estimate total background-acid concentration from baseline points.
///
/// Takes the median of the per-point estimates, then keeps only points within
/// `3 × 1.4826 × MAD` of it and returns the median of the survivors. A zero
/// MAD returns the plain median; an empty input returns 0.
pub fn estimate_background_acid(points: &[BaselinePoint], constants: &ChemConstants) -> AcidEstimate {
    if points.is_empty() {
        return AcidEstimate {
            c_a: 0.0,
            median: 0.0,
            mad: 0.0,
            inliers: 0,
            total: 0,
        };
    }

    let estimates: Vec<f64> = points.iter().map(|p| p.acid_estimate(constants)).collect();
    let center = median(&estimates);
    let mad = median_abs_deviation(&estimates, center);

    if mad == 0.0 {
        debug!("Degenerate baseline (MAD = 0), using plain median");
        return AcidEstimate {
            c_a: center,
            median: center,
            mad,
            inliers: estimates.len(),
            total: estimates.len(),
        };
    }

    let threshold = OUTLIER_THRESHOLD * MAD_SCALE * mad;
    let inliers: Vec<f64> = estimates
        .iter()
        .copied()
        .filter(|c| (c - center).abs() <= threshold)
        .collect();

    let c_a = if inliers.is_empty() {
        center
    } else {
        median(&inliers)
    };

    AcidEstimate {
        c_a,
        median: center,
        mad,
        inliers: inliers.len(),
        total: estimates.len(),
    }
}
