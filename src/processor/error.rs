/// Errors that can occur while processing a titration run
#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    /// Time and pH arrays differ in length
    #[error("Array length mismatch: time array has {time_len} elements, pH array has {ph_len} elements")]
    ArrayLengthMismatch {
        /// Length of the time array
        time_len: usize,
        /// Length of the pH array
        ph_len: usize,
    },

    /// Configuration value outside its physical range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
