pub mod analysis;
pub mod config;
pub mod error;
pub mod io;
pub mod models;
pub mod pipeline;
pub mod visualization;

pub use analysis::{FitWindow, Projection, ProjectionSettings, TrendAnalyzer, TrendModel};
pub use config::ReportConfig;
pub use error::TrendError;
pub use io::ProjectionWriter;
pub use models::{CaseSeries, Observation};
pub use pipeline::{fit_report, run_report, ReportRun};
