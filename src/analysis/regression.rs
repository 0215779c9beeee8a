use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

use crate::error::TrendError;

/// Ordinary least-squares line `y = slope * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    /// Coefficient of determination of the fit (1.0 for an exact fit)
    pub r_squared: f64,
    /// Number of points the line was fitted to
    pub sample_size: usize,
}

impl LinearFit {
    /// Evaluate the fitted line at `x`.
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Fit a first-degree polynomial to `(x, y)` by ordinary least squares.
///
/// # Examples
///
/// ```
/// use case_trend::analysis::fit_line;
///
/// let fit = fit_line(&[0.0, 1.0, 2.0], &[1.0, 3.0, 5.0]).unwrap();
/// assert!((fit.slope - 2.0).abs() < 1e-12);
/// assert!((fit.intercept - 1.0).abs() < 1e-12);
/// ```
pub fn fit_line(x: &[f64], y: &[f64]) -> Result<LinearFit, TrendError> {
    if x.len() != y.len() {
        return Err(TrendError::FitError(format!(
            "x and y lengths differ ({} vs {})",
            x.len(),
            y.len()
        )));
    }
    let n = x.len();
    if n < 2 {
        return Err(TrendError::InsufficientData(format!(
            "Need at least 2 points to fit a line, got {n}"
        )));
    }
    if x.iter().chain(y.iter()).any(|v| !v.is_finite()) {
        return Err(TrendError::FitError(
            "Cannot fit a line through non-finite values".to_string(),
        ));
    }

    let var_x = x.variance();
    if var_x <= 0.0 {
        return Err(TrendError::InsufficientData(
            "All x values are identical; slope is undefined".to_string(),
        ));
    }

    let slope = x.covariance(y) / var_x;
    let intercept = y.mean() - slope * x.mean();

    let y_mean = y.mean();
    let ss_tot: f64 = y.iter().map(|v| (v - y_mean).powi(2)).sum();
    let ss_res: f64 = x
        .iter()
        .zip(y)
        .map(|(xi, yi)| (yi - (slope * xi + intercept)).powi(2))
        .sum();
    let r_squared = if ss_tot > 0.0 {
        1.0 - ss_res / ss_tot
    } else {
        1.0
    };

    Ok(LinearFit {
        slope,
        intercept,
        r_squared,
        sample_size: n,
    })
}
