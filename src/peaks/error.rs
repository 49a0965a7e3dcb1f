use thiserror::Error;

/// Errors raised by peak detection
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PeakError {
    /// pH and excess-base arrays differ in length
    #[error("Array length mismatch: pH has {ph_len} elements, delta_b has {delta_b_len}")]
    ArrayLengthMismatch {
        /// Length of the pH array
        ph_len: usize,
        /// Length of the excess-base array
        delta_b_len: usize,
    },
}
