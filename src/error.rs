//! Error types for spectral-carrier.

use thiserror::Error;

/// Result type alias for spectral-carrier operations.
pub type Result<T> = std::result::Result<T, SpectralError>;

/// Errors that can occur during spectral binding and carrier coding.
///
/// Every variant describes a problem with the caller's inputs or
/// configuration; none of them are transient.
#[derive(Debug, Error)]
pub enum SpectralError {
    /// Vector or spectrum dimension is not usable (N = 0).
    #[error("invalid dimension: {0} (expected N >= 1)")]
    InvalidDimension(usize),

    /// Dimension mismatch between operands.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimension.
        expected: usize,
        /// Actual dimension.
        actual: usize,
    },

    /// A transform strategy was asked to process a size it cannot handle.
    #[error("transform `{transform}` does not support dimension {dim}")]
    UnsupportedDimension {
        /// Name of the transform strategy.
        transform: &'static str,
        /// Requested dimension.
        dim: usize,
    },

    /// Plan name is not registered.
    #[error("unknown carrier plan: {0}")]
    UnknownPlan(String),

    /// Symbol payload exceeds the plan's carrier capacity.
    #[error("payload too large: {requested} symbols exceed carrier capacity {capacity}")]
    PayloadTooLarge {
        /// Number of symbols requested.
        requested: usize,
        /// Number of data carriers available.
        capacity: usize,
    },

    /// The dimension does not leave enough eligible bins for the plan.
    #[error("plan `{plan}` needs {required} carrier bins but dimension {dim} offers {available}")]
    InsufficientBins {
        /// Plan name.
        plan: String,
        /// Requested dimension.
        dim: usize,
        /// Bins the plan requires.
        required: usize,
        /// Eligible bins available at this dimension.
        available: usize,
    },

    /// A non-finite value was produced.
    #[error("numeric instability: non-finite value at index {index}")]
    NumericInstability {
        /// First offending index.
        index: usize,
    },

    /// Invalid value for ternary conversion.
    #[error("invalid ternary value: {0} (expected -1, 0, or +1)")]
    InvalidValue(i32),

    /// Invalid character in a trit string.
    #[error("invalid trit character: {0:?} (expected '-', '0', or '+')")]
    InvalidTritChar(char),

    /// Malformed placeholder component string.
    #[error("invalid placeholder spec: {0}")]
    InvalidPlaceholder(String),

    /// Invalid configuration parameter.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Manifest disagrees with the plan it names.
    #[error("manifest mismatch: {0}")]
    ManifestMismatch(String),

    /// Empty input where non-empty was required.
    #[error("empty input: {0}")]
    EmptyInput(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
