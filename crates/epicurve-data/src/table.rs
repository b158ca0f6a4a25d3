//! In-memory time-series table.

use crate::error::{DataError, Result};
use crate::locale::{LocaleIndex, Resolution};
use chrono::NaiveDate;
use ndarray::{Array1, Array2, ArrayView1, Axis};
use serde::{Deserialize, Serialize};
use std::io::Write;

/// Descriptive columns of one feed row, kept as published.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowLabel {
    /// Sub-national region, empty when the row covers the whole country
    pub locale: String,
    /// Country or region name
    pub country: String,
    /// Latitude column (ignored by the analysis)
    pub lat: String,
    /// Longitude column (ignored by the analysis)
    pub long: String,
}

/// Cumulative counts for every locale of a feed on a shared date axis.
///
/// Rows follow the order of the feed; columns follow `dates`.
#[derive(Debug, Clone)]
pub struct TimeSeriesTable {
    dates: Vec<NaiveDate>,
    matrix: Array2<i64>,
    labels: Vec<RowLabel>,
    index: LocaleIndex,
}

impl TimeSeriesTable {
    /// Assemble a table from parsed parts.
    ///
    /// The caller guarantees `matrix` is `labels.len() x dates.len()` and that
    /// `index` was built from `labels`.
    pub(crate) fn from_parts(
        dates: Vec<NaiveDate>,
        matrix: Array2<i64>,
        labels: Vec<RowLabel>,
        index: LocaleIndex,
    ) -> Self {
        debug_assert_eq!(matrix.ncols(), dates.len());
        debug_assert_eq!(matrix.nrows(), labels.len());
        Self {
            dates,
            matrix,
            labels,
            index,
        }
    }

    /// Shared date axis.
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Count matrix (rows = locales, columns = dates).
    pub const fn matrix(&self) -> &Array2<i64> {
        &self.matrix
    }

    /// Locale index built while parsing.
    pub const fn index(&self) -> &LocaleIndex {
        &self.index
    }

    /// Descriptive columns of every row.
    pub fn labels(&self) -> &[RowLabel] {
        &self.labels
    }

    /// Number of locale rows.
    pub fn row_count(&self) -> usize {
        self.matrix.nrows()
    }

    /// Last date covered by the feed.
    pub fn last_date(&self) -> Option<NaiveDate> {
        self.dates.last().copied()
    }

    /// Counts of a single row.
    pub fn row(&self, row: usize) -> Option<ArrayView1<'_, i64>> {
        (row < self.matrix.nrows()).then(|| self.matrix.row(row))
    }

    /// Every known country.
    pub fn countries(&self) -> Vec<String> {
        self.index.countries()
    }

    /// Locales reported for a country.
    ///
    /// # Errors
    /// Returns [`DataError::UnknownCountry`] if the country is not in the feed.
    pub fn locales(&self, country: &str) -> Result<Vec<String>> {
        self.index
            .get(country)
            .map(|entry| entry.locales())
            .ok_or_else(|| DataError::UnknownCountry {
                country: crate::locale::normalize(country),
                available: self.index.countries(),
            })
    }

    /// Counts for a resolved set of rows, summed elementwise.
    pub fn extract(&self, resolution: &Resolution) -> Array1<i64> {
        self.matrix
            .select(Axis(0), resolution.rows())
            .sum_axis(Axis(0))
    }

    /// Counts for a country, or one of its locales.
    ///
    /// Without a locale, a regional country yields the sum of all its rows.
    ///
    /// # Errors
    /// Returns [`DataError::UnknownCountry`] or [`DataError::UnknownLocale`].
    pub fn series(&self, country: &str, locale: Option<&str>) -> Result<Array1<i64>> {
        let resolution = self.index.resolve(country, locale)?;
        Ok(self.extract(&resolution))
    }

    /// Write the table back out in the feed layout.
    ///
    /// # Errors
    /// Returns an error if the writer fails.
    pub fn write_csv<W: Write>(&self, writer: W, date_format: &str) -> Result<()> {
        let mut out = csv::Writer::from_writer(writer);

        let mut header = vec![
            "Province/State".to_string(),
            "Country/Region".to_string(),
            "Lat".to_string(),
            "Long".to_string(),
        ];
        header.extend(self.dates.iter().map(|d| d.format(date_format).to_string()));
        out.write_record(&header)?;

        for (label, counts) in self.labels.iter().zip(self.matrix.rows()) {
            let mut record = vec![
                label.locale.clone(),
                label.country.clone(),
                label.lat.clone(),
                label.long.clone(),
            ];
            record.extend(counts.iter().map(ToString::to_string));
            out.write_record(&record)?;
        }

        out.flush()?;
        Ok(())
    }
}
