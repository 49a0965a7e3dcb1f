//! # Titration Processor
//!
//! Turns raw (time, pH) samples into processed rows carrying the measured
//! titrant dose, the background-acid model dose and the excess base.
//!
//! ## Passes
//!
//! 1. **Measurement pass**: H⁺, OH⁻, delivered volume and moles, normalized
//!    dose and dilution-corrected sodium for every row. The baseline window
//!    (first 20% of rows, at least 3, unless configured) feeds the robust
//!    background-acid estimator unless C_A is supplied.
//!
//! 2. **Model pass**: raw electroneutrality sodium with a dilution-adjusted
//!    acid concentration, anchored to the first measured row, clamped to
//!    `[0, 0.999·c_b]`, made non-decreasing, and mapped back to a dose.
//!    The excess base and its pH derivative complete each row.

mod config;
mod error;
mod processor_impl;
mod types;

#[cfg(test)]
mod tests;

pub use config::{
    ProcessorConfig, DEFAULT_BASELINE_FRACTION, MIN_BASELINE_ROWS, SODIUM_CEILING_FRACTION,
};
pub use error::ProcessError;
pub use processor_impl::{constrain_model_sodium, finite_difference, TitrationProcessor};
pub use types::{AcidSource, SampleRow, TitrationRun};
