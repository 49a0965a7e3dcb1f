//! # Peak Detection
//!
//! Finds buffering regions in an excess-base curve ΔB(pH) and measures how
//! much titrant each one consumed.
//!
//! ## Pipeline
//!
//! 1. Savitzky–Golay smoothing of ΔB
//! 2. dΔB/dpH by second-order differences on the (non-uniform) pH grid
//! 3. Robust noise floors for the derivative and for ΔB increments
//! 4. Segmentation at derivative sign changes
//! 5. Events from prominent segments and their opposite-sign partner lobes
//! 6. Merging of events with nearby apexes or touching extents
//! 7. Step quantification on the smoothed curve
//!
//! ```rust
//! use titrapeak::peaks::{PeakConfig, PeakDetector};
//!
//! let ph: Vec<f64> = (0..200).map(|i| 2.0 + 4.0 * i as f64 / 199.0).collect();
//! let delta_b: Vec<f64> = ph.iter().map(|&p| if p >= 3.5 { 0.01 } else { 0.0 }).collect();
//!
//! let report = PeakDetector::new(PeakConfig::default()).detect(&ph, &delta_b).unwrap();
//! assert_eq!(report.peaks.len(), 1);
//! ```

mod config;
mod detector;
mod error;
mod segments;
mod smoothing;
mod types;

#[cfg(test)]
mod tests;

pub use config::{
    PeakConfig, DEFAULT_PH_CUTOFF, DEFAULT_POLYORDER, DEFAULT_PROMINENCE, DEFAULT_WINDOW_LENGTH,
};
pub use detector::{detect_peaks, PeakDetector};
pub use error::PeakError;
pub use segments::{find_segments, zero_crossings, Segment};
pub use smoothing::{gradient, savgol_smooth};
pub use types::{AppliedCutoff, NoiseThresholds, Peak, PeakReport};
