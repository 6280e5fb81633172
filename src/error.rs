//! Error types for bellsplit.

/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, BellError>;

/// Errors raised by the detection and tuning pipelines.
#[derive(Debug, thiserror::Error)]
pub enum BellError {
    /// Filter cutoffs fall outside (0, 1) after normalization by the Nyquist rate.
    #[error(
        "invalid band {center_hz:.1} Hz ± {bandwidth_hz:.1} Hz at {sample_rate} Hz \
         (normalized cutoffs {low:.4}..{high:.4} must lie strictly inside 0..1)"
    )]
    InvalidBand {
        /// Requested center frequency.
        center_hz: f64,
        /// Requested half-bandwidth.
        bandwidth_hz: f64,
        /// Sample rate of the signal being filtered.
        sample_rate: u32,
        /// Normalized low cutoff.
        low: f64,
        /// Normalized high cutoff.
        high: f64,
    },

    /// No candidate frequency produced a single bell event.
    #[error("no bell signal detected across {candidates} candidate frequencies")]
    NoSignalDetected {
        /// Number of candidates that were evaluated.
        candidates: usize,
    },

    /// The signal is too short for the requested estimate.
    #[error("insufficient data: {samples} samples available, at least {required} required")]
    InsufficientData {
        /// Samples available.
        samples: usize,
        /// Samples required.
        required: usize,
    },

    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl BellError {
    /// True for errors that only invalidate a single candidate frequency.
    pub fn is_band_error(&self) -> bool {
        matches!(self, BellError::InvalidBand { .. })
    }
}
