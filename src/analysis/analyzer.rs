use super::projection::fit_window;
use crate::analysis::{project, FitWindow, Projection, ProjectionSettings, TrendFit};
use crate::error::TrendError;
use crate::models::CaseSeries;

/// Runs every configured window against one loaded series.
pub struct TrendAnalyzer<'a> {
    series: &'a CaseSeries,
    settings: ProjectionSettings,
}

impl<'a> TrendAnalyzer<'a> {
    pub fn new(series: &'a CaseSeries, settings: ProjectionSettings) -> Self {
        Self { series, settings }
    }

    pub fn settings(&self) -> &ProjectionSettings {
        &self.settings
    }

    /// Fit a window without projecting it.
    pub fn fit(&self, window: &FitWindow) -> Result<TrendFit, TrendError> {
        fit_window(self.series, window).map(|(_, fit)| fit)
    }

    /// Project a single window to the horizon.
    pub fn project(&self, window: &FitWindow) -> Result<Projection, TrendError> {
        project(self.series, window, &self.settings)
    }

    /// Project every window, in order. The first failure aborts the run.
    pub fn project_all(&self, windows: &[FitWindow]) -> Result<Vec<Projection>, TrendError> {
        windows.iter().map(|w| self.project(w)).collect()
    }
}
