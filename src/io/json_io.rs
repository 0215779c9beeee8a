use std::path::Path;

use crate::analysis::Projection;
use crate::error::TrendError;

/// Write projections, including their fitted coefficients, to a JSON file.
pub fn write_projections_json(
    projections: &[Projection],
    path: impl AsRef<Path>,
    pretty: bool,
) -> Result<(), TrendError> {
    let content = if pretty {
        serde_json::to_string_pretty(projections)?
    } else {
        serde_json::to_string(projections)?
    };
    std::fs::write(path.as_ref(), content)?;
    tracing::info!(path = %path.as_ref().display(), "wrote projection JSON");
    Ok(())
}

/// Read projections previously written by [`write_projections_json`].
#[cfg(test)]
pub(crate) fn read_projections_json(
    path: impl AsRef<Path>,
) -> Result<Vec<Projection>, TrendError> {
    let content = std::fs::read_to_string(path.as_ref())?;
    Ok(serde_json::from_str(&content)?)
}
