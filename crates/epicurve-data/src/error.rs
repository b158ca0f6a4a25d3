//! Error types for data operations.

use std::time::Duration;
use thiserror::Error;

/// Result type for data operations.
pub type Result<T> = std::result::Result<T, DataError>;

/// Errors that can occur while pulling, parsing or querying a feed.
#[derive(Debug, Error)]
pub enum DataError {
    /// The server answered with a non-success status
    #[error("Fetch of {url} failed with HTTP status {status}")]
    Fetch {
        /// Requested URL
        url: String,
        /// Status code returned by the server
        status: u16,
    },

    /// Network error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The request did not complete within the configured timeout
    #[error("Request to {url} timed out after {timeout:?}")]
    Timeout {
        /// Requested URL
        url: String,
        /// Timeout that elapsed
        timeout: Duration,
    },

    /// Malformed feed content
    #[error("Parse error at line {line}, column {column}: {message}")]
    Parse {
        /// 1-based line in the feed
        line: usize,
        /// 0-based column in the row
        column: usize,
        /// What was wrong with the cell
        message: String,
    },

    /// CSV reader or writer error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Country name not present in the feed
    #[error("Unknown country '{country}'; available countries: {}", .available.join(", "))]
    UnknownCountry {
        /// Requested country (normalized)
        country: String,
        /// Every country known to the index
        available: Vec<String>,
    },

    /// Locale not reported for the given country
    #[error("Unknown locale '{locale}' in {country}; available locales: {}", .available.join(", "))]
    UnknownLocale {
        /// Country that was found
        country: String,
        /// Requested locale (normalized)
        locale: String,
        /// Locales reported for the country
        available: Vec<String>,
    },

    /// Two rows claim the same (country, locale) pair
    #[error("Duplicate locale '{locale}' in {country}: rows {existing} and {duplicate}")]
    DuplicateLocale {
        /// Country of the clashing rows
        country: String,
        /// Locale of the clashing rows (empty for country-level rows)
        locale: String,
        /// Row registered first
        existing: usize,
        /// Row that clashed
        duplicate: usize,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DataError {
    pub(crate) fn parse(line: usize, column: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            column,
            message: message.into(),
        }
    }
}
