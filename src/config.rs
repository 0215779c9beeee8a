use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::analysis::{FitWindow, ProjectionSettings, TrendModel};
use crate::error::TrendError;

pub const DEFAULT_INPUT: &str = "data.csv";
pub const DEFAULT_OUTPUT: &str = "index.html";
pub const DEFAULT_PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

/// Everything a report run needs: where to read and write, the fitting
/// constants, and the chart text.
///
/// Loaded from TOML; any key left out takes its default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Case table to read
    pub input: PathBuf,
    /// HTML chart to write
    pub output: PathBuf,
    /// Year attached to the `day-month` dates in the table
    pub year: i32,
    /// Ceiling on projected totals
    pub population: f64,
    /// Projections stop the day before this date
    pub horizon: NaiveDate,
    pub title: String,
    /// Attribution shown under the title and as a chart annotation
    pub source: String,
    pub plotly_cdn: String,
    pub windows: Vec<FitWindow>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            output: PathBuf::from(DEFAULT_OUTPUT),
            year: 2020,
            population: 330_000_000.0,
            horizon: NaiveDate::from_ymd_opt(2020, 4, 30).unwrap_or_default(),
            title: "Total coronavirus cases in the USA".to_string(),
            source: "https://www.worldometers.info/coronavirus/country/us/".to_string(),
            plotly_cdn: DEFAULT_PLOTLY_CDN.to_string(),
            windows: vec![
                FitWindow::trailing(21, TrendModel::Exponential),
                FitWindow::trailing(7, TrendModel::Exponential),
            ],
        }
    }
}

impl ReportConfig {
    /// Read a TOML config file and validate it.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TrendError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_toml(&content)?;
        tracing::info!(path = %path.as_ref().display(), "loaded report config");
        Ok(config)
    }

    /// Parse and validate a TOML document.
    pub fn from_toml(content: &str) -> Result<Self, TrendError> {
        let config: ReportConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), TrendError> {
        if !(self.population.is_finite() && self.population > 0.0) {
            return Err(TrendError::ValidationError(format!(
                "population must be positive, got {}",
                self.population
            )));
        }
        if self.windows.is_empty() {
            return Err(TrendError::ValidationError(
                "at least one fit window is required".to_string(),
            ));
        }
        if NaiveDate::from_ymd_opt(self.year, 1, 1).is_none() {
            return Err(TrendError::ValidationError(format!(
                "year {} is out of range",
                self.year
            )));
        }
        Ok(())
    }

    pub fn projection_settings(&self) -> ProjectionSettings {
        ProjectionSettings::new(self.population, self.horizon)
    }
}
