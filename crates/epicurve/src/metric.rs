//! Metrics and the feeds backing them.

use derive_more::Display;
use epicurve_data::{DEFAULT_DATE_FORMAT, Feed, JHU_BASE_URL};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// A cumulative count published as its own feed.
#[derive(
    Debug, Display, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    /// Confirmed cases
    #[display("confirmed")]
    Confirmed,
    /// Deaths
    #[display("deaths")]
    Deaths,
    /// Recoveries
    #[display("recovered")]
    Recovered,
}

impl Metric {
    /// Every metric, in display order.
    pub const ALL: [Self; 3] = [Self::Confirmed, Self::Deaths, Self::Recovered];

    /// Feed publishing this metric.
    pub const fn feed(&self) -> Feed {
        match self {
            Self::Confirmed => Feed::Confirmed,
            Self::Deaths => Feed::Deaths,
            Self::Recovered => Feed::Recovered,
        }
    }

    /// Chart title.
    pub const fn title(&self) -> &'static str {
        match self {
            Self::Confirmed => "COVID-19 Confirmed Cases",
            Self::Deaths => "COVID-19 Deaths",
            Self::Recovered => "COVID-19 Recovered",
        }
    }

    /// Palette offset so one name gets a different colour per metric.
    pub const fn colour_offset(&self) -> i64 {
        match self {
            Self::Confirmed => 0,
            Self::Deaths => 1,
            Self::Recovered => 2,
        }
    }
}

/// Metric name that is not one of [`Metric::ALL`].
#[derive(Debug, Error)]
#[error("Unknown metric '{0}' (expected confirmed, deaths or recovered)")]
pub struct UnknownMetric(pub String);

impl FromStr for Metric {
    type Err = UnknownMetric;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "confirmed" | "cases" => Ok(Self::Confirmed),
            "deaths" | "dead" => Ok(Self::Deaths),
            "recovered" => Ok(Self::Recovered),
            other => Err(UnknownMetric(other.to_string())),
        }
    }
}

/// Where a metric is pulled from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricFeed {
    /// Metric carried by the feed
    pub metric: Metric,
    /// Feed URL
    pub url: String,
}

impl MetricFeed {
    /// Feed for `metric` under `base_url`.
    pub fn new(metric: Metric, base_url: &str) -> Self {
        Self {
            metric,
            url: metric.feed().url(base_url),
        }
    }
}

/// Repository configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryConfig {
    /// Feeds to pull, one per metric
    pub feeds: Vec<MetricFeed>,
    /// Date format of the feed headers (default: `%m/%d/%y`)
    pub date_format: String,
}

impl RepositoryConfig {
    /// Feeds for `metrics` under `base_url`.
    pub fn with_base_url(base_url: &str, metrics: &[Metric]) -> Self {
        Self {
            feeds: metrics
                .iter()
                .map(|&metric| MetricFeed::new(metric, base_url))
                .collect(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }

    /// Metrics configured, in feed order.
    pub fn metrics(&self) -> Vec<Metric> {
        self.feeds.iter().map(|feed| feed.metric).collect()
    }
}

impl Default for RepositoryConfig {
    /// Confirmed cases and deaths from the JHU CSSE feeds.
    fn default() -> Self {
        Self::with_base_url(JHU_BASE_URL, &[Metric::Confirmed, Metric::Deaths])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_metric_display_round_trips() {
        for metric in Metric::ALL {
            assert_eq!(metric.to_string().parse::<Metric>().unwrap(), metric);
        }
    }

    #[rstest]
    #[case("confirmed", Metric::Confirmed)]
    #[case("cases", Metric::Confirmed)]
    #[case(" Deaths ", Metric::Deaths)]
    #[case("dead", Metric::Deaths)]
    #[case("RECOVERED", Metric::Recovered)]
    fn test_metric_aliases(#[case] input: &str, #[case] expected: Metric) {
        assert_eq!(input.parse::<Metric>().unwrap(), expected);
    }

    #[rstest]
    #[case("hospitalised")]
    #[case("")]
    fn test_unknown_metric(#[case] input: &str) {
        assert!(input.parse::<Metric>().is_err());
    }

    #[test]
    fn test_default_config() {
        let config = RepositoryConfig::default();
        assert_eq!(config.metrics(), vec![Metric::Confirmed, Metric::Deaths]);
        assert_eq!(config.date_format, DEFAULT_DATE_FORMAT);
        assert!(config.feeds[0].url.ends_with("time_series_covid19_confirmed_global.csv"));
    }

    #[test]
    fn test_colour_offsets_are_distinct() {
        let offsets: Vec<i64> = Metric::ALL.iter().map(Metric::colour_offset).collect();
        assert_eq!(offsets, vec![0, 1, 2]);
    }
}
