mod analyzer;
mod projection;
mod regression;
mod trend;

pub use analyzer::TrendAnalyzer;
pub use projection::{
    project, FitWindow, ProjectedPoint, Projection, ProjectionSettings, WindowSpan,
};
pub use regression::{fit_line, LinearFit};
pub use trend::{TrendFit, TrendModel};
