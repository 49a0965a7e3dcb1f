//! # titrapeak - Excess-Base Titration Analysis
//!
//! `titrapeak` turns a pH-vs-time record of a strong-base titration into the
//! amount of titrant consumed by metal-hydroxide precipitation, and splits that
//! consumption into buffering regions, one per titratable metal.
//!
//! ## Key Features
//!
//! - **Electroneutrality Model**: a diprotic background acid (sulfate-like)
//!   with dilution, solved for H⁺ by a bracketed Brent search.
//!
//! - **Robust Background Estimate**: median + MAD outlier rejection over a
//!   baseline window, or a fixed concentration supplied by the caller.
//!
//! - **Constrained Model Subtraction**: the background model is anchored to
//!   the first sample, clamped to physical bounds and made non-decreasing
//!   before it is subtracted from the measured dose.
//!
//! - **Noise-Aware Peak Engine**: Savitzky–Golay smoothing, derivative
//!   segmentation and robust noise floors locate and quantify each step in
//!   the excess base.
//!
//! - **Metal Assignment**: steps convert to mol/L and mg/L through the
//!   hydroxide stoichiometry of the assigned metal.
//!
//! ## Quick Start
//!
//! ```rust
//! use titrapeak::prelude::*;
//!
//! // one reading per minute
//! let time: Vec<f64> = (0..40).map(|i| i as f64 * 60.0).collect();
//! let ph: Vec<f64> = (0..40).map(|i| 2.2 + 0.05 * i as f64).collect();
//!
//! let config = AnalysisConfig::default();
//! let analysis = analyze(&time, &ph, &config)?;
//!
//! println!("C_A = {:.5} mol/L", analysis.run.background_acid);
//! for peak in &analysis.peaks.peaks {
//!     println!("{}", assign_peak(peak, Metal::Fe3));
//! }
//! # Ok::<(), titrapeak::analysis::AnalysisError>(())
//! ```
//!
//! ## Units
//!
//! | Quantity | Unit |
//! |----------|------|
//! | Concentrations (C_A, c_b, Na, H⁺, OH⁻) | mol/L |
//! | Volumes (v0, V_b) | mL |
//! | Pump rate | mL/min |
//! | Titrant amount n_b | mol |
//! | Normalized dose B, excess base ΔB | mol/L of initial sample |
//!
//! ## Modules
//!
//! - [`chemistry`]: conversions, root solver, background-acid estimator and
//!   model curve
//! - [`processor`]: two-pass run processing
//! - [`peaks`]: peak detection and quantification
//! - [`metals`]: metal table and assignment
//! - [`analysis`]: the full pipeline
//! - [`stats`]: robust statistics shared by the above

// Documentation lints - enforce complete documentation for publication
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod analysis;
pub mod chemistry;
pub mod metals;
pub mod peaks;
pub mod processor;
pub mod stats;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::analysis::{analyze, Analysis, AnalysisConfig, AnalysisError, ModelData};
    pub use crate::chemistry::{
        build_model_curve, estimate_background_acid, model_ph_at_dose, solve_h, AcidEstimate,
        BaselinePoint, ChemConstants, ModelCurve, ModelCurveConfig, ModelPoint, SolveError,
        TimeUnit,
    };
    pub use crate::metals::{assign_peak, metal_concentration, AssignedPeak, Metal, MetalData};
    pub use crate::peaks::{
        detect_peaks, AppliedCutoff, Peak, PeakConfig, PeakDetector, PeakError, PeakReport,
    };
    pub use crate::processor::{
        AcidSource, ProcessError, ProcessorConfig, SampleRow, TitrationProcessor, TitrationRun,
    };
}
