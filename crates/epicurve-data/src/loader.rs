//! Feed retrieval and CSV parsing.
//!
//! A feed header carries four descriptive columns followed by one column per
//! date. Every data row has the locale in column 0, the country in column 1,
//! two ignored coordinate columns and then one integer count per date.

use crate::error::{DataError, Result};
use crate::locale::LocaleIndex;
use crate::table::{RowLabel, TimeSeriesTable};
use chrono::NaiveDate;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Index of the first date column.
pub const FIRST_DATE_COLUMN: usize = 4;

/// Date format used by the public feeds (`1/22/20`).
pub const DEFAULT_DATE_FORMAT: &str = "%m/%d/%y";

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// User agent sent with every request.
const USER_AGENT: &str = "epicurve/0.1";

/// Anything able to produce a [`TimeSeriesTable`] for a feed URL.
pub trait SeriesSource {
    /// Fetch and parse the feed at `url`.
    ///
    /// # Errors
    /// Returns an error if the feed cannot be retrieved or parsed.
    fn pull(&self, url: &str, date_format: &str) -> Result<TimeSeriesTable>;
}

impl<T: SeriesSource + ?Sized> SeriesSource for &T {
    fn pull(&self, url: &str, date_format: &str) -> Result<TimeSeriesTable> {
        (**self).pull(url, date_format)
    }
}

impl<T: SeriesSource + ?Sized> SeriesSource for Box<T> {
    fn pull(&self, url: &str, date_format: &str) -> Result<TimeSeriesTable> {
        (**self).pull(url, date_format)
    }
}

/// HTTP client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// Request timeout (default: 30s)
    pub timeout: Duration,
    /// User agent header
    pub user_agent: String,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            user_agent: USER_AGENT.to_string(),
        }
    }
}

/// Blocking HTTP feed source.
#[derive(Debug)]
pub struct HttpSource {
    client: reqwest::blocking::Client,
    timeout: Duration,
}

impl HttpSource {
    /// Build a client with the given configuration.
    ///
    /// # Errors
    /// Returns [`DataError::Network`] if the client cannot be built.
    pub fn new(config: LoaderConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(config.user_agent)
            .timeout(config.timeout)
            .build()
            .map_err(DataError::Network)?;

        Ok(Self {
            client,
            timeout: config.timeout,
        })
    }

    /// Download the body at `url`.
    ///
    /// # Errors
    /// - [`DataError::Timeout`] if the request exceeds the timeout
    /// - [`DataError::Fetch`] on a non-success status
    pub fn fetch_text(&self, url: &str) -> Result<String> {
        let timed_out = |err: reqwest::Error| {
            if err.is_timeout() {
                DataError::Timeout {
                    url: url.to_string(),
                    timeout: self.timeout,
                }
            } else {
                DataError::Network(err)
            }
        };

        let response = self.client.get(url).send().map_err(timed_out)?;
        let status = response.status();
        if !status.is_success() {
            return Err(DataError::Fetch {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().map_err(timed_out)
    }
}

impl SeriesSource for HttpSource {
    fn pull(&self, url: &str, date_format: &str) -> Result<TimeSeriesTable> {
        debug!(url, "pulling feed");
        let body = self.fetch_text(url)?;
        debug!(url, bytes = body.len(), "feed downloaded");
        parse_csv(&body, date_format)
    }
}

/// Parse a feed body into a [`TimeSeriesTable`].
///
/// # Errors
/// Returns [`DataError::Parse`] for a missing or malformed header, an
/// unparsable or out-of-order date, a short row or a non-integer count, and
/// [`DataError::DuplicateLocale`] if two rows claim the same locale.
pub fn parse_csv(text: &str, date_format: &str) -> Result<TimeSeriesTable> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());
    let mut records = reader.records();

    let header = records
        .next()
        .ok_or_else(|| DataError::parse(1, 0, "feed is empty"))??;
    if header.len() <= FIRST_DATE_COLUMN {
        return Err(DataError::parse(
            1,
            header.len(),
            format!("header has {} columns and no date columns", header.len()),
        ));
    }

    let dates = parse_dates(&header, date_format)?;
    let n_dates = dates.len();

    let mut counts: Vec<i64> = Vec::new();
    let mut labels = Vec::new();
    let mut index = LocaleIndex::new();

    for record in records {
        let record = record?;
        let line = record.position().map_or(labels.len() + 2, |p| p.line() as usize);
        let row = labels.len();

        if record.len() < FIRST_DATE_COLUMN + n_dates {
            return Err(DataError::parse(
                line,
                record.len(),
                format!(
                    "row has {} columns, header has {}",
                    record.len(),
                    FIRST_DATE_COLUMN + n_dates
                ),
            ));
        }

        for (offset, cell) in record.iter().skip(FIRST_DATE_COLUMN).take(n_dates).enumerate() {
            let value = cell.trim().parse::<i64>().map_err(|_| {
                DataError::parse(
                    line,
                    FIRST_DATE_COLUMN + offset,
                    format!("count '{cell}' is not an integer"),
                )
            })?;
            counts.push(value);
        }

        let label = RowLabel {
            locale: record[0].to_string(),
            country: record[1].to_string(),
            lat: record[2].to_string(),
            long: record[3].to_string(),
        };
        index.insert(&label.country, &label.locale, row)?;
        labels.push(label);
    }

    let matrix = Array2::from_shape_vec((labels.len(), n_dates), counts)
        .map_err(|e| DataError::parse(0, 0, e.to_string()))?;

    debug!(
        rows = labels.len(),
        dates = n_dates,
        countries = index.len(),
        "parsed feed"
    );

    Ok(TimeSeriesTable::from_parts(dates, matrix, labels, index))
}

fn parse_dates(header: &csv::StringRecord, date_format: &str) -> Result<Vec<NaiveDate>> {
    let mut dates: Vec<NaiveDate> = Vec::with_capacity(header.len() - FIRST_DATE_COLUMN);

    for (column, text) in header.iter().enumerate().skip(FIRST_DATE_COLUMN) {
        let date = NaiveDate::parse_from_str(text.trim(), date_format).map_err(|e| {
            DataError::parse(
                1,
                column,
                format!("date '{text}' does not match '{date_format}': {e}"),
            )
        })?;

        if let Some(previous) = dates.last()
            && *previous >= date
        {
            return Err(DataError::parse(
                1,
                column,
                format!("date {date} does not follow {previous}"),
            ));
        }
        dates.push(date);
    }

    Ok(dates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locale::Resolution;
    use ndarray::array;
    use rstest::rstest;

    const FEED: &str = "\
Province/State,Country/Region,Lat,Long,1/22/20,1/23/20,1/24/20,1/25/20
,Malaysia,4.2,101.9,0,3,4,4
Victoria,Australia,-37.8,144.9,1,2,3,4
New South Wales,Australia,-33.8,151.2,10,20,30,40
,\"Korea, South\",35.9,127.8,1,1,2,2
";

    #[test]
    fn test_shape_matches_feed() {
        let table = parse_csv(FEED, DEFAULT_DATE_FORMAT).unwrap();
        assert_eq!(table.dates().len(), 4);
        assert_eq!(table.matrix().ncols(), table.dates().len());
        assert_eq!(table.matrix().nrows(), 4);
        assert_eq!(table.index().row_count(), 4);
        assert_eq!(
            table.dates()[0],
            NaiveDate::from_ymd_opt(2020, 1, 22).unwrap()
        );
        assert_eq!(
            table.last_date(),
            NaiveDate::from_ymd_opt(2020, 1, 25)
        );
    }

    #[test]
    fn test_values_equal_source_literals() {
        let table = parse_csv(FEED, DEFAULT_DATE_FORMAT).unwrap();
        let expected = array![[0, 3, 4, 4], [1, 2, 3, 4], [10, 20, 30, 40], [1, 1, 2, 2]];
        assert_eq!(table.matrix(), &expected);
    }

    #[test]
    fn test_quoted_country_name() {
        let table = parse_csv(FEED, DEFAULT_DATE_FORMAT).unwrap();
        assert_eq!(
            table.index().resolve("korea, south", None).unwrap(),
            Resolution::Row(3)
        );
        assert_eq!(table.labels()[3].country, "Korea, South");
    }

    #[test]
    fn test_short_row_is_rejected() {
        let feed = "a,b,c,d,1/22/20,1/23/20\n,Malaysia,0,0,1\n";
        let err = parse_csv(feed, DEFAULT_DATE_FORMAT).unwrap_err();
        assert!(matches!(err, DataError::Parse { line: 2, .. }), "{err}");
    }

    #[rstest]
    #[case("1.5")]
    #[case("")]
    #[case("n/a")]
    fn test_non_integer_count_is_rejected(#[case] cell: &str) {
        let feed = format!("a,b,c,d,1/22/20,1/23/20\n,Malaysia,0,0,1,{cell}\n");
        let err = parse_csv(&feed, DEFAULT_DATE_FORMAT).unwrap_err();
        assert!(matches!(err, DataError::Parse { line: 2, column: 5, .. }), "{err}");
    }

    #[test]
    fn test_bad_date_is_rejected() {
        let feed = "a,b,c,d,1/22/20,2020-01-23\n,Malaysia,0,0,1,2\n";
        let err = parse_csv(feed, DEFAULT_DATE_FORMAT).unwrap_err();
        assert!(matches!(err, DataError::Parse { line: 1, column: 5, .. }), "{err}");
    }

    #[test]
    fn test_custom_date_format() {
        let feed = "a,b,c,d,2020-01-22,2020-01-23\n,Malaysia,0,0,1,2\n";
        let table = parse_csv(feed, "%Y-%m-%d").unwrap();
        assert_eq!(table.dates().len(), 2);
    }

    #[test]
    fn test_dates_must_increase() {
        let feed = "a,b,c,d,1/23/20,1/22/20\n,Malaysia,0,0,1,2\n";
        let err = parse_csv(feed, DEFAULT_DATE_FORMAT).unwrap_err();
        assert!(matches!(err, DataError::Parse { column: 5, .. }), "{err}");
    }

    #[test]
    fn test_header_without_dates() {
        let err = parse_csv("a,b,c,d\n", DEFAULT_DATE_FORMAT).unwrap_err();
        assert!(matches!(err, DataError::Parse { line: 1, .. }));
    }

    #[test]
    fn test_empty_feed() {
        let err = parse_csv("", DEFAULT_DATE_FORMAT).unwrap_err();
        assert!(matches!(err, DataError::Parse { line: 1, .. }));
    }

    #[test]
    fn test_header_only_feed() {
        let table = parse_csv("a,b,c,d,1/22/20\n", DEFAULT_DATE_FORMAT).unwrap();
        assert_eq!(table.row_count(), 0);
        assert!(table.index().is_empty());
    }

    #[test]
    fn test_loader_config_default() {
        let config = LoaderConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(!config.user_agent.is_empty());
    }
}
