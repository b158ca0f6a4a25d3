//! Known public feeds.

use serde::{Deserialize, Serialize};

/// Base URL of the JHU CSSE global time-series files.
pub const JHU_BASE_URL: &str = "https://github.com/CSSEGISandData/COVID-19/raw/master/csse_covid_19_data/csse_covid_19_time_series/";

/// Cumulative series published under [`JHU_BASE_URL`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Feed {
    /// Confirmed cases
    Confirmed,
    /// Deaths
    Deaths,
    /// Recoveries
    Recovered,
}

impl Feed {
    /// File name of the feed.
    pub const fn file_name(&self) -> &'static str {
        match self {
            Self::Confirmed => "time_series_covid19_confirmed_global.csv",
            Self::Deaths => "time_series_covid19_deaths_global.csv",
            Self::Recovered => "time_series_covid19_recovered_global.csv",
        }
    }

    /// Full URL of the feed under `base_url`.
    pub fn url(&self, base_url: &str) -> String {
        if base_url.ends_with('/') {
            format!("{base_url}{}", self.file_name())
        } else {
            format!("{base_url}/{}", self.file_name())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joins_base() {
        assert_eq!(
            Feed::Deaths.url("https://example.org/data"),
            "https://example.org/data/time_series_covid19_deaths_global.csv"
        );
        assert!(Feed::Confirmed.url(JHU_BASE_URL).ends_with("confirmed_global.csv"));
        assert!(!Feed::Confirmed.url(JHU_BASE_URL).contains("//time_series"));
    }
}
