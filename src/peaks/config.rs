use serde::{Deserialize, Serialize};

/// Default Savitzky–Golay window (samples)
pub const DEFAULT_WINDOW_LENGTH: usize = 19;

/// Default Savitzky–Golay polynomial order
pub const DEFAULT_POLYORDER: usize = 3;

/// Default minimum derivative prominence
pub const DEFAULT_PROMINENCE: f64 = 0.001;

/// Default upper pH cutoff for peak apexes
pub const DEFAULT_PH_CUTOFF: f64 = 6.5;

/// Configuration for [`PeakDetector`](super::PeakDetector)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PeakConfig {
    /// Smoothing window length in samples (even values grow by one)
    pub window_length: usize,

    /// Smoothing polynomial order (capped at window − 1)
    pub polyorder: usize,

    /// Minimum derivative prominence; the noise floor still applies when unset
    pub prominence: Option<f64>,

    /// Apexes above this pH are dropped; `None` disables the cutoff
    pub ph_cutoff: Option<f64>,
}

impl Default for PeakConfig {
    fn default() -> Self {
        Self {
            window_length: DEFAULT_WINDOW_LENGTH,
            polyorder: DEFAULT_POLYORDER,
            prominence: Some(DEFAULT_PROMINENCE),
            ph_cutoff: Some(DEFAULT_PH_CUTOFF),
        }
    }
}

impl PeakConfig {
    /// Configuration without a pH cutoff
    pub fn without_cutoff() -> Self {
        Self {
            ph_cutoff: None,
            ..Default::default()
        }
    }

    /// Set the pH cutoff
    pub fn with_cutoff(mut self, cutoff: Option<f64>) -> Self {
        self.ph_cutoff = cutoff;
        self
    }
}
