use serde::{Deserialize, Serialize};

use super::regression::{fit_line, LinearFit};
use crate::error::TrendError;

/// Curve family fitted to a window of cumulative counts.
///
/// Each family is a straight line in its own transformed space: the
/// exponential model fits `log10(y) = a*x + b`, the linear model fits
/// `y = a*x + b` directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendModel {
    /// Log-linear fit, projected as `10^(a*x + b)`
    #[default]
    Exponential,
    /// Plain linear fit, projected as `a*x + b`
    Linear,
}

impl TrendModel {
    /// Map an observed value into the space the line is fitted in.
    pub fn transform(&self, y: f64) -> Result<f64, TrendError> {
        match self {
            TrendModel::Exponential => {
                if y <= 0.0 {
                    return Err(TrendError::FitError(format!(
                        "Exponential fit needs positive counts, got {y}"
                    )));
                }
                Ok(y.log10())
            }
            TrendModel::Linear => Ok(y),
        }
    }

    /// Map a value on the fitted line back to a case count.
    pub fn inverse(&self, v: f64) -> f64 {
        match self {
            TrendModel::Exponential => 10f64.powf(v),
            TrendModel::Linear => v,
        }
    }

    /// Fit this model to `(x, y)`.
    pub fn fit(&self, x: &[f64], y: &[f64]) -> Result<TrendFit, TrendError> {
        let transformed = y
            .iter()
            .map(|&v| self.transform(v))
            .collect::<Result<Vec<f64>, _>>()?;
        let line = fit_line(x, &transformed)?;
        Ok(TrendFit { model: *self, line })
    }
}

impl std::fmt::Display for TrendModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrendModel::Exponential => write!(f, "exponential"),
            TrendModel::Linear => write!(f, "linear"),
        }
    }
}

impl std::str::FromStr for TrendModel {
    type Err = TrendError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "exponential" | "exp" | "log-linear" => Ok(TrendModel::Exponential),
            "linear" | "lin" => Ok(TrendModel::Linear),
            _ => Err(TrendError::ParseError(format!(
                "Unknown trend model: '{s}'. Use: exponential or linear"
            ))),
        }
    }
}

/// A fitted trend: the model plus its line in transformed space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendFit {
    pub model: TrendModel,
    pub line: LinearFit,
}

impl TrendFit {
    /// Projected case count at observation index `x`, unclamped.
    pub fn predict(&self, x: f64) -> f64 {
        self.model.inverse(self.line.predict(x))
    }

    /// Day-over-day multiplicative growth, e.g. 0.25 for +25%/day.
    ///
    /// Only meaningful for the exponential model.
    pub fn daily_growth_rate(&self) -> Option<f64> {
        match self.model {
            TrendModel::Exponential => Some(10f64.powf(self.line.slope) - 1.0),
            TrendModel::Linear => None,
        }
    }

    /// Cases added per day under the linear model.
    pub fn daily_increment(&self) -> Option<f64> {
        match self.model {
            TrendModel::Linear => Some(self.line.slope),
            TrendModel::Exponential => None,
        }
    }

    /// Days for the projected count to double; `None` unless growing exponentially.
    pub fn doubling_time_days(&self) -> Option<f64> {
        match self.model {
            TrendModel::Exponential if self.line.slope > 0.0 => {
                Some(2f64.log10() / self.line.slope)
            }
            _ => None,
        }
    }
}
