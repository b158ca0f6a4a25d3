//! Error types for growth estimation.

use thiserror::Error;

/// Result type for growth estimation.
pub type Result<T> = std::result::Result<T, GrowthError>;

/// Errors that can occur while trimming or fitting a series.
#[derive(Debug, Error, PartialEq)]
pub enum GrowthError {
    /// No observations left to work with
    #[error("Series is empty{}", .cutoff.map(|c| format!(" after applying cutoff {c}")).unwrap_or_default())]
    EmptySeries {
        /// Cutoff that removed every observation, if one was applied
        cutoff: Option<i64>,
    },

    /// The log of a count is undefined
    #[error("Non-positive value {value} at day offset {offset}; cannot take its logarithm")]
    NonPositiveValue {
        /// Day offset of the offending observation
        offset: i64,
        /// Offending count
        value: i64,
    },

    /// Too few observations for a regression
    #[error("Insufficient data: need at least {required} observations, got {actual}")]
    InsufficientData {
        /// Required number of observations
        required: usize,
        /// Actual number of observations
        actual: usize,
    },

    /// Slope is zero or negative, so there is no doubling time
    #[error("Series is not growing (slope {slope:.6}); doubling time is undefined")]
    NotGrowing {
        /// Fitted slope
        slope: f64,
    },

    /// Axis and values differ in length
    #[error("Length mismatch: {dates} dates, {values} values")]
    LengthMismatch {
        /// Number of dates
        dates: usize,
        /// Number of values
        values: usize,
    },

    /// Invalid parameter
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}
