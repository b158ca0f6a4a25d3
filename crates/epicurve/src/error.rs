//! Error types for repository operations.

use crate::metric::Metric;
use epicurve_data::DataError;
use epicurve_growth::GrowthError;
use epicurve_output::ChartError;
use thiserror::Error;

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, RepositoryError>;

/// Errors that can occur while pulling, loading or analysing series.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Feeds disagree on the length of the date axis
    #[error("Schema mismatch: {metric} feed has {actual} dates, other feeds have {expected}")]
    SchemaMismatch {
        /// Metric whose feed disagreed
        metric: Metric,
        /// Date count of the feeds already pulled
        expected: usize,
        /// Date count of the offending feed
        actual: usize,
    },

    /// Entity was never loaded
    #[error("'{key}' is not loaded")]
    NotLoaded {
        /// Requested key
        key: String,
    },

    /// Metric has no feed in this repository
    #[error("Metric {0} is not configured")]
    MetricNotConfigured(Metric),

    /// Feed retrieval, parsing or lookup error
    #[error(transparent)]
    Data(#[from] DataError),

    /// Trimming or fitting error
    #[error("{key}: {source}")]
    Growth {
        /// Entity the analysis failed for
        key: String,
        /// Underlying error
        source: GrowthError,
    },

    /// Chart backend error
    #[error("Chart error: {0}")]
    Chart(#[from] ChartError),
}
