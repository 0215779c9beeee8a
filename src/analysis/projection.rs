use std::ops::Range;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::trend::{TrendFit, TrendModel};
use crate::error::TrendError;
use crate::models::CaseSeries;

/// Which contiguous slice of the series a window covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WindowSpan {
    /// The most recent `days` observations.
    Trailing { days: usize },
    /// Observations `start..end` by index.
    Range { start: usize, end: usize },
}

impl WindowSpan {
    /// Resolve to an index range over a series of `len` observations.
    ///
    /// A trailing window longer than the series is an error, so a label like
    /// "Last 21 days" always describes 21 fitted observations.
    pub fn resolve(&self, len: usize) -> Result<Range<usize>, TrendError> {
        match *self {
            WindowSpan::Trailing { days } => {
                if days == 0 {
                    return Err(TrendError::InsufficientData(
                        "Trailing window must cover at least one day".to_string(),
                    ));
                }
                if days > len {
                    return Err(TrendError::InsufficientData(format!(
                        "Trailing window of {days} days exceeds the series, only {len} loaded"
                    )));
                }
                Ok(len - days..len)
            }
            WindowSpan::Range { start, end } => {
                if start >= end || end > len {
                    return Err(TrendError::InsufficientData(format!(
                        "Window {start}..{end} is empty or outside the {len} loaded observations"
                    )));
                }
                Ok(start..end)
            }
        }
    }
}

/// One configured trend fit: a slice of history, a model, and a label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitWindow {
    #[serde(flatten)]
    pub span: WindowSpan,
    #[serde(default)]
    pub model: TrendModel,
    #[serde(default)]
    pub label: Option<String>,
}

impl FitWindow {
    pub fn trailing(days: usize, model: TrendModel) -> Self {
        Self {
            span: WindowSpan::Trailing { days },
            model,
            label: None,
        }
    }

    pub fn range(start: usize, end: usize, model: TrendModel) -> Self {
        Self {
            span: WindowSpan::Range { start, end },
            model,
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Legend label: the configured one, or one derived from the span.
    pub fn display_label(&self) -> String {
        if let Some(label) = &self.label {
            return label.clone();
        }
        let base = match self.span {
            WindowSpan::Trailing { days } => format!("Last {days} days"),
            WindowSpan::Range { start, end } => format!("Days {start}-{}", end.saturating_sub(1)),
        };
        match self.model {
            TrendModel::Exponential => base,
            TrendModel::Linear => format!("{base} (linear)"),
        }
    }
}

/// Fixed parameters every projection is computed against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectionSettings {
    /// Ceiling on any projected total
    pub population: f64,
    /// Projections run up to, not including, this date
    pub horizon: NaiveDate,
}

impl ProjectionSettings {
    pub fn new(population: f64, horizon: NaiveDate) -> Self {
        Self {
            population,
            horizon,
        }
    }

    /// Share of the population, in percent.
    pub fn percent_of_population(&self, value: f64) -> f64 {
        value / self.population * 100.0
    }
}

/// A single day of a projected trend.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectedPoint {
    pub date: NaiveDate,
    /// Projected cumulative cases, clamped to `[0, population]`
    pub value: f64,
    /// `value` as a percentage of the population
    pub percent: f64,
}

/// A fitted window projected forward to the horizon date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projection {
    pub label: String,
    pub fit: TrendFit,
    /// First date of the fitted window, which is also the first projected date
    pub window_start: NaiveDate,
    /// Number of observations the fit used
    pub window_len: usize,
    pub population: f64,
    pub points: Vec<ProjectedPoint>,
}

impl Projection {
    pub fn model(&self) -> TrendModel {
        self.fit.model
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.points.iter().map(|p| p.date).collect()
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }

    pub fn percents(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.percent).collect()
    }

    /// Projected value on a given date, if it falls inside the projection.
    pub fn value_on(&self, date: NaiveDate) -> Option<f64> {
        let offset = (date - self.window_start).num_days();
        if offset < 0 {
            return None;
        }
        self.points.get(offset as usize).map(|p| p.value)
    }

    /// Last projected day (the day before the horizon).
    pub fn final_point(&self) -> Option<&ProjectedPoint> {
        self.points.last()
    }

    /// First date on which the projection hits the population ceiling.
    pub fn saturation_date(&self) -> Option<NaiveDate> {
        self.points
            .iter()
            .find(|p| p.value >= self.population)
            .map(|p| p.date)
    }
}

/// Resolve `window` against `series` and fit its model over the slice.
pub(crate) fn fit_window(
    series: &CaseSeries,
    window: &FitWindow,
) -> Result<(Range<usize>, TrendFit), TrendError> {
    let range = window.span.resolve(series.len())?;
    let observations = series.window(range.clone())?;
    let x: Vec<f64> = range.clone().map(|i| i as f64).collect();
    let y: Vec<f64> = observations.iter().map(|o| o.cases_f64()).collect();
    let fit = window.model.fit(&x, &y)?;
    Ok((range, fit))
}

/// Fit `window` over `series` and project it daily to the horizon.
///
/// X values are observation indices over the whole series, so a projected
/// date `d` is evaluated at `window_start_index + (d - window_start_date)`.
/// Projected values are clamped to `[0, population]` after the fit; the
/// line itself is not refitted.
pub fn project(
    series: &CaseSeries,
    window: &FitWindow,
    settings: &ProjectionSettings,
) -> Result<Projection, TrendError> {
    if !(settings.population.is_finite() && settings.population > 0.0) {
        return Err(TrendError::ValidationError(format!(
            "Population must be a positive number, got {}",
            settings.population
        )));
    }

    let (range, fit) = fit_window(series, window)?;
    let observations = series.window(range.clone())?;

    let label = window.display_label();
    tracing::debug!(
        label = %label,
        model = %fit.model,
        slope = fit.line.slope,
        intercept = fit.line.intercept,
        r_squared = fit.line.r_squared,
        "fitted trend window"
    );

    let window_start = observations[0].date;
    let points: Vec<ProjectedPoint> = window_start
        .iter_days()
        .take_while(|date| *date < settings.horizon)
        .enumerate()
        .map(|(offset, date)| {
            let raw = fit.predict((range.start + offset) as f64);
            let value = raw.max(0.0).min(settings.population);
            ProjectedPoint {
                date,
                value,
                percent: settings.percent_of_population(value),
            }
        })
        .collect();

    let projection = Projection {
        label,
        fit,
        window_start,
        window_len: observations.len(),
        population: settings.population,
        points,
    };

    if let Some(date) = projection.saturation_date() {
        tracing::warn!(
            label = %projection.label,
            %date,
            "projection reaches the population ceiling"
        );
    }

    Ok(projection)
}
