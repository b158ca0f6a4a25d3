//! Cutoff and window trimming of a dated series.
//!
//! Trimming runs in a fixed order:
//! 1. cutoff: drop every observation below the cutoff
//! 2. rebase: day offsets start at the first retained observation
//! 3. window: keep the trailing `window` observations, offsets unchanged

use crate::error::{GrowthError, Result};
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// Trimming options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrimOptions {
    /// Minimum count an observation needs to be kept
    pub cutoff: Option<i64>,
    /// Number of trailing observations to keep
    pub window: Option<usize>,
}

impl TrimOptions {
    /// Options with a cutoff only.
    pub const fn cutoff(cutoff: i64) -> Self {
        Self {
            cutoff: Some(cutoff),
            window: None,
        }
    }

    /// Add a trailing window.
    pub const fn with_window(mut self, window: usize) -> Self {
        self.window = Some(window);
        self
    }
}

/// Series after trimming, on a day-offset axis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrimmedSeries {
    /// Date of offset 0
    pub origin: NaiveDate,
    /// Days since `origin`, one per value
    pub offsets: Vec<i64>,
    /// Retained counts
    pub values: Vec<i64>,
}

impl TrimmedSeries {
    /// Calendar dates of the retained observations.
    ///
    /// Offsets produced by [`trim`] are never negative.
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.offsets
            .iter()
            .map(|&offset| self.origin + Days::new(offset.unsigned_abs()))
            .collect()
    }

    /// Offset of the last retained observation.
    pub fn last_offset(&self) -> Option<i64> {
        self.offsets.last().copied()
    }

    /// Number of retained observations.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether nothing was retained.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Trim a dated series by cutoff and trailing window.
///
/// Without a cutoff the origin is the first input date.
///
/// # Errors
/// - [`GrowthError::LengthMismatch`] if `dates` and `values` differ in length
/// - [`GrowthError::EmptySeries`] if the input is empty or no value meets the cutoff
/// - [`GrowthError::InvalidParameter`] for a zero window or dates that are
///   not strictly increasing
pub fn trim(dates: &[NaiveDate], values: &[i64], options: TrimOptions) -> Result<TrimmedSeries> {
    if dates.len() != values.len() {
        return Err(GrowthError::LengthMismatch {
            dates: dates.len(),
            values: values.len(),
        });
    }
    if options.window == Some(0) {
        return Err(GrowthError::InvalidParameter(
            "window must keep at least one observation".to_string(),
        ));
    }

    if let Some(pair) = dates.windows(2).find(|pair| pair[0] >= pair[1]) {
        return Err(GrowthError::InvalidParameter(format!(
            "dates must be strictly increasing, {} is followed by {}",
            pair[0], pair[1]
        )));
    }

    let kept: Vec<(NaiveDate, i64)> = dates
        .iter()
        .copied()
        .zip(values.iter().copied())
        .filter(|&(_, value)| options.cutoff.is_none_or(|cutoff| value >= cutoff))
        .collect();

    let origin = kept
        .first()
        .map(|&(date, _)| date)
        .ok_or(GrowthError::EmptySeries {
            cutoff: options.cutoff,
        })?;

    let skip = options
        .window
        .map_or(0, |window| kept.len().saturating_sub(window));

    let (offsets, values) = kept
        .into_iter()
        .skip(skip)
        .map(|(date, value)| ((date - origin).num_days(), value))
        .unzip();

    Ok(TrimmedSeries {
        origin,
        offsets,
        values,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn days(n: u64) -> Vec<NaiveDate> {
        let start = NaiveDate::from_ymd_opt(2020, 3, 1).unwrap();
        (0..n).map(|d| start + Days::new(d)).collect()
    }

    #[test]
    fn test_cutoff_rebases_offsets() {
        let dates = days(4);
        let trimmed = trim(&dates, &[50, 100, 150, 300], TrimOptions::cutoff(100)).unwrap();

        assert_eq!(trimmed.values, vec![100, 150, 300]);
        assert_eq!(trimmed.offsets, vec![0, 1, 2]);
        assert_eq!(trimmed.origin, dates[1]);
        assert_eq!(trimmed.dates(), dates[1..].to_vec());
    }

    #[test]
    fn test_window_after_cutoff_keeps_offsets() {
        let dates = days(4);
        let options = TrimOptions::cutoff(100).with_window(2);
        let trimmed = trim(&dates, &[50, 100, 150, 300], options).unwrap();

        assert_eq!(trimmed.values, vec![150, 300]);
        assert_eq!(trimmed.offsets, vec![1, 2]);
        assert_eq!(trimmed.last_offset(), Some(2));
    }

    #[test]
    fn test_no_options_is_identity() {
        let dates = days(3);
        let trimmed = trim(&dates, &[0, 1, 2], TrimOptions::default()).unwrap();

        assert_eq!(trimmed.values, vec![0, 1, 2]);
        assert_eq!(trimmed.offsets, vec![0, 1, 2]);
        assert_eq!(trimmed.origin, dates[0]);
    }

    #[test]
    fn test_window_without_cutoff() {
        let dates = days(5);
        let trimmed = trim(&dates, &[1, 2, 3, 4, 5], TrimOptions::default().with_window(2)).unwrap();

        assert_eq!(trimmed.values, vec![4, 5]);
        assert_eq!(trimmed.offsets, vec![3, 4]);
    }

    #[rstest]
    #[case(10)]
    #[case(4)]
    fn test_window_larger_than_series(#[case] window: usize) {
        let dates = days(4);
        let trimmed = trim(&dates, &[1, 2, 3, 4], TrimOptions::default().with_window(window)).unwrap();
        assert_eq!(trimmed.len(), 4);
    }

    #[test]
    fn test_cutoff_removes_everything() {
        let dates = days(3);
        let err = trim(&dates, &[1, 2, 3], TrimOptions::cutoff(100)).unwrap_err();
        assert_eq!(err, GrowthError::EmptySeries { cutoff: Some(100) });
    }

    #[test]
    fn test_empty_input() {
        let err = trim(&[], &[], TrimOptions::default()).unwrap_err();
        assert_eq!(err, GrowthError::EmptySeries { cutoff: None });
    }

    #[test]
    fn test_zero_window() {
        let dates = days(2);
        let err = trim(&dates, &[1, 2], TrimOptions::default().with_window(0)).unwrap_err();
        assert!(matches!(err, GrowthError::InvalidParameter(_)));
    }

    #[test]
    fn test_length_mismatch() {
        let dates = days(2);
        let err = trim(&dates, &[1, 2, 3], TrimOptions::default()).unwrap_err();
        assert_eq!(err, GrowthError::LengthMismatch { dates: 2, values: 3 });
    }

    #[test]
    fn test_gaps_in_dates_are_counted_in_days() {
        let start = NaiveDate::from_ymd_opt(2020, 3, 1).unwrap();
        let dates = vec![start, start + Days::new(2), start + Days::new(7)];
        let trimmed = trim(&dates, &[10, 20, 40], TrimOptions::default()).unwrap();
        assert_eq!(trimmed.offsets, vec![0, 2, 7]);
    }

    #[rstest]
    #[case(&[1, 3, 2])]
    #[case(&[1, 1, 2])]
    fn test_unordered_dates_are_rejected(#[case] day_offsets: &[u64]) {
        let start = NaiveDate::from_ymd_opt(2020, 3, 1).unwrap();
        let dates: Vec<NaiveDate> = day_offsets.iter().map(|&d| start + Days::new(d)).collect();
        let err = trim(&dates, &[10, 20, 40], TrimOptions::default()).unwrap_err();
        assert!(matches!(err, GrowthError::InvalidParameter(_)), "{err}");
    }
}
