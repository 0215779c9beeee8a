use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::error::TrendError;

/// Where a rendered chart is shown after it is written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Viewer {
    /// The platform's default handler for HTML files
    #[default]
    System,
    /// Write the file only
    None,
}

impl Viewer {
    /// Open `path` in this viewer. Returns whether anything was launched.
    pub fn open(&self, path: &Path) -> Result<bool, TrendError> {
        match self {
            Viewer::System => {
                opener::open(path)?;
                tracing::info!(path = %path.display(), "opened chart in system viewer");
                Ok(true)
            }
            Viewer::None => {
                tracing::debug!(path = %path.display(), "viewer disabled, not opening chart");
                Ok(false)
            }
        }
    }
}

impl FromStr for Viewer {
    type Err = TrendError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "system" | "default" => Ok(Viewer::System),
            "none" | "off" => Ok(Viewer::None),
            _ => Err(TrendError::ParseError(format!("Unknown viewer: {s}"))),
        }
    }
}

impl fmt::Display for Viewer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Viewer::System => write!(f, "system"),
            Viewer::None => write!(f, "none"),
        }
    }
}
