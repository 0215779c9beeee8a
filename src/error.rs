use thiserror::Error;

/// Errors that can occur while loading, fitting, or rendering case trends.
#[derive(Error, Debug)]
pub enum TrendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Fit error: {0}")]
    FitError(String),

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Viewer error: {0}")]
    Viewer(String),
}

impl From<opener::OpenError> for TrendError {
    fn from(e: opener::OpenError) -> Self {
        TrendError::Viewer(e.to_string())
    }
}
