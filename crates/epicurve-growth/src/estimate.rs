//! Trim, fit and derive growth metrics in one step.

use crate::error::{GrowthError, Result};
use crate::fit::{ExponentialFit, fit};
use crate::trim::{TrimOptions, TrimmedSeries, trim};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Growth analysis configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GrowthConfig {
    /// Minimum count for an observation to enter the fit (default: 100)
    pub cutoff: Option<i64>,

    /// Number of trailing observations to fit (default: all)
    pub window: Option<usize>,

    /// Days between infection and report used to project the current count
    /// forward from the last observation (default: 7)
    pub incubation_days: f64,
}

impl Default for GrowthConfig {
    fn default() -> Self {
        Self {
            cutoff: Some(100),
            window: None,
            incubation_days: 7.0,
        }
    }
}

impl GrowthConfig {
    /// Trim options carried by this configuration.
    pub const fn trim_options(&self) -> TrimOptions {
        TrimOptions {
            cutoff: self.cutoff,
            window: self.window,
        }
    }
}

/// Result of a growth analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthEstimate {
    /// Series the model was fitted to
    pub series: TrimmedSeries,
    /// Fitted model
    pub fit: ExponentialFit,
    /// Doubling time in days; `None` when the series is not growing
    pub doubling_time: Option<f64>,
    /// Fitted count `incubation_days` after the last observation
    pub projected: f64,
    /// Incubation assumption used for `projected`
    pub incubation_days: f64,
}

impl GrowthEstimate {
    /// Whether the fitted slope is positive.
    pub const fn is_growing(&self) -> bool {
        self.doubling_time.is_some()
    }

    /// Last observed count.
    pub fn last_value(&self) -> Option<i64> {
        self.series.values.last().copied()
    }
}

/// Trim a dated series, fit it and derive doubling time and projection.
///
/// # Errors
/// Any [`GrowthError`] from trimming or fitting. A non-growing series is not
/// an error here; it is reported through [`GrowthEstimate::doubling_time`].
pub fn analyze(
    dates: &[NaiveDate],
    values: &[i64],
    config: &GrowthConfig,
) -> Result<GrowthEstimate> {
    if !config.incubation_days.is_finite() {
        return Err(GrowthError::InvalidParameter(format!(
            "incubation days must be finite, got {}",
            config.incubation_days
        )));
    }

    let series = trim(dates, values, config.trim_options())?;
    let fit = fit(&series.offsets, &series.values)?;

    let doubling_time = match fit.doubling_time() {
        Ok(days) => Some(days),
        Err(GrowthError::NotGrowing { .. }) => None,
        Err(e) => return Err(e),
    };

    let last_offset = series
        .last_offset()
        .ok_or(GrowthError::EmptySeries {
            cutoff: config.cutoff,
        })?;
    let projected = fit.project(last_offset, config.incubation_days);

    Ok(GrowthEstimate {
        series,
        fit,
        doubling_time,
        projected,
        incubation_days: config.incubation_days,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::Days;

    fn days(n: u64) -> Vec<NaiveDate> {
        let start = NaiveDate::from_ymd_opt(2020, 3, 1).unwrap();
        (0..n).map(|d| start + Days::new(d)).collect()
    }

    #[test]
    fn test_growth_config_default() {
        let config = GrowthConfig::default();
        assert_eq!(config.cutoff, Some(100));
        assert_eq!(config.window, None);
        assert_eq!(config.incubation_days, 7.0);
    }

    #[test]
    fn test_analyze_doubling_series() {
        let dates = days(5);
        let estimate = analyze(&dates, &[10, 50, 100, 200, 400], &GrowthConfig::default()).unwrap();

        assert_eq!(estimate.series.values, vec![100, 200, 400]);
        assert_eq!(estimate.series.origin, dates[2]);
        assert!(estimate.is_growing());
        assert_relative_eq!(estimate.doubling_time.unwrap(), 1.0, epsilon = 1e-9);
        assert_relative_eq!(estimate.projected, 400.0 * 128.0, max_relative = 1e-9);
        assert_eq!(estimate.last_value(), Some(400));
    }

    #[test]
    fn test_analyze_with_window() {
        let dates = days(5);
        let config = GrowthConfig {
            cutoff: None,
            window: Some(2),
            incubation_days: 0.0,
        };
        let estimate = analyze(&dates, &[1, 2, 3, 300, 600], &config).unwrap();

        assert_eq!(estimate.series.offsets, vec![3, 4]);
        assert_relative_eq!(estimate.doubling_time.unwrap(), 1.0, epsilon = 1e-9);
        assert_relative_eq!(estimate.projected, 600.0, max_relative = 1e-9);
    }

    #[test]
    fn test_analyze_flat_series() {
        let dates = days(4);
        let estimate = analyze(&dates, &[120, 120, 120, 120], &GrowthConfig::default()).unwrap();

        assert!(!estimate.is_growing());
        assert_eq!(estimate.doubling_time, None);
        assert_relative_eq!(estimate.projected, 120.0, max_relative = 1e-9);
    }

    #[test]
    fn test_analyze_zero_counts_without_cutoff() {
        let dates = days(3);
        let config = GrowthConfig {
            cutoff: None,
            ..Default::default()
        };
        let err = analyze(&dates, &[0, 1, 2], &config).unwrap_err();
        assert_eq!(err, GrowthError::NonPositiveValue { offset: 0, value: 0 });
    }

    #[test]
    fn test_analyze_below_cutoff() {
        let dates = days(3);
        let err = analyze(&dates, &[1, 2, 3], &GrowthConfig::default()).unwrap_err();
        assert_eq!(err, GrowthError::EmptySeries { cutoff: Some(100) });
    }

    #[test]
    fn test_invalid_incubation() {
        let dates = days(3);
        let config = GrowthConfig {
            incubation_days: f64::NAN,
            ..Default::default()
        };
        assert!(matches!(
            analyze(&dates, &[100, 200, 400], &config),
            Err(GrowthError::InvalidParameter(_))
        ));
    }
}
