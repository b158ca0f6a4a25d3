//! Log-linear least squares fit
//!
//! Models a cumulative count as `N(t) = exp(b + k * t)` and estimates `k` and
//! `b` by ordinary least squares of `ln N` on the day offset `t`.
//!
//! Doubling time follows from the slope: `T_d = ln 2 / k`.

use crate::error::{GrowthError, Result};
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::f64::consts::LN_2;

/// Fitted exponential growth model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExponentialFit {
    /// Growth rate `k` per day
    pub slope: f64,
    /// `ln N` at offset 0
    pub intercept: f64,
    /// Coefficient of determination of the log-linear fit
    pub r_squared: f64,
}

impl ExponentialFit {
    /// Days for the fitted quantity to double.
    ///
    /// # Errors
    /// Returns [`GrowthError::NotGrowing`] when the slope is zero or negative.
    pub fn doubling_time(&self) -> Result<f64> {
        if self.slope > 0.0 {
            Ok(LN_2 / self.slope)
        } else {
            Err(GrowthError::NotGrowing { slope: self.slope })
        }
    }

    /// Fitted value at a (possibly fractional) day offset.
    pub fn predict(&self, offset: f64) -> f64 {
        (self.intercept + self.slope * offset).exp()
    }

    /// Fitted value `incubation_days` after `last_offset`.
    pub fn project(&self, last_offset: i64, incubation_days: f64) -> f64 {
        self.predict(last_offset as f64 + incubation_days)
    }
}

/// Fit `ln(values)` against `offsets` by ordinary least squares.
///
/// # Errors
/// - [`GrowthError::LengthMismatch`] if the inputs differ in length
/// - [`GrowthError::InsufficientData`] with fewer than two observations
/// - [`GrowthError::NonPositiveValue`] if any value is zero or negative
/// - [`GrowthError::InvalidParameter`] if every offset is the same
pub fn fit(offsets: &[i64], values: &[i64]) -> Result<ExponentialFit> {
    if offsets.len() != values.len() {
        return Err(GrowthError::LengthMismatch {
            dates: offsets.len(),
            values: values.len(),
        });
    }
    if values.len() < 2 {
        return Err(GrowthError::InsufficientData {
            required: 2,
            actual: values.len(),
        });
    }
    if let Some((&offset, &value)) = offsets.iter().zip(values).find(|&(_, &v)| v <= 0) {
        return Err(GrowthError::NonPositiveValue { offset, value });
    }

    let x: Array1<f64> = offsets.iter().map(|&t| t as f64).collect();
    let y: Array1<f64> = values.iter().map(|&v| (v as f64).ln()).collect();

    let n = x.len() as f64;
    let x_mean = x.sum() / n;
    let y_mean = y.sum() / n;

    let dx = &x - x_mean;
    let dy = &y - y_mean;

    let sxx = dx.dot(&dx);
    if sxx == 0.0 {
        return Err(GrowthError::InvalidParameter(
            "offsets must not all be equal".to_string(),
        ));
    }
    let sxy = dx.dot(&dy);
    let syy = dy.dot(&dy);

    let slope = sxy / sxx;
    let intercept = y_mean - slope * x_mean;

    // A constant series is explained perfectly by a flat line
    let r_squared = if syy == 0.0 {
        1.0
    } else {
        (sxy * sxy) / (sxx * syy)
    };

    Ok(ExponentialFit {
        slope,
        intercept,
        r_squared,
    })
}
