mod csv_io;
mod json_io;

use std::path::Path;

use crate::analysis::Projection;
use crate::error::TrendError;

pub use csv_io::{
    parse_day_month, projection_rows, read_csv, read_csv_from_bytes, write_projections_csv,
    ProjectionRow,
};
pub use json_io::write_projections_json;

#[cfg(test)]
pub(crate) use json_io::read_projections_json;

/// Trait for exporting fitted projections to a file.
pub trait ProjectionWriter {
    fn write(&self, projections: &[Projection], path: &Path) -> Result<(), TrendError>;
}

/// CSV export: one row per projected day.
pub struct CsvFormat;

impl ProjectionWriter for CsvFormat {
    fn write(&self, projections: &[Projection], path: &Path) -> Result<(), TrendError> {
        write_projections_csv(projections, path)
    }
}

/// JSON export: full projections including fit coefficients.
#[derive(Default)]
pub struct JsonFormat {
    pub pretty: bool,
}

impl ProjectionWriter for JsonFormat {
    fn write(&self, projections: &[Projection], path: &Path) -> Result<(), TrendError> {
        write_projections_json(projections, path, self.pretty)
    }
}

/// Pick an export format from the file extension.
pub fn writer_for_path(
    path: &Path,
    pretty: bool,
) -> Result<Box<dyn ProjectionWriter>, TrendError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match ext.as_str() {
        "csv" => Ok(Box::new(CsvFormat)),
        "json" => Ok(Box::new(JsonFormat { pretty })),
        _ => Err(TrendError::ValidationError(format!(
            "Unsupported export format: .{ext}. Use .csv or .json"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{project, FitWindow, ProjectionSettings, TrendModel};
    use chrono::NaiveDate;

    fn sample_projections() -> Vec<Projection> {
        let series =
            read_csv_from_bytes(b"date,cases\n1-Mar,100\n2-Mar,150\n3-Mar,210\n", 2020).unwrap();
        let settings =
            ProjectionSettings::new(1e6, NaiveDate::from_ymd_opt(2020, 3, 6).unwrap());
        vec![project(&series, &FitWindow::trailing(3, TrendModel::Linear), &settings).unwrap()]
    }

    #[test]
    fn test_csv_trait_writes_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let writer: &dyn ProjectionWriter = &CsvFormat;
        writer.write(&sample_projections(), &path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        // header plus Mar 1..Mar 5
        assert_eq!(content.lines().count(), 6);
    }

    #[test]
    fn test_json_trait_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        let writer: &dyn ProjectionWriter = &JsonFormat { pretty: true };
        writer.write(&sample_projections(), &path).unwrap();
        let loaded = read_projections_json(&path).unwrap();
        assert_eq!(loaded[0].points.len(), 5);
    }

    #[test]
    fn test_writer_for_path() {
        assert!(writer_for_path(Path::new("a.csv"), false).is_ok());
        assert!(writer_for_path(Path::new("a.JSON"), true).is_ok());
        assert!(matches!(
            writer_for_path(Path::new("a.xlsx"), false),
            Err(TrendError::ValidationError(_))
        ));
    }

    #[test]
    fn test_json_format_default() {
        assert!(!JsonFormat::default().pretty);
    }
}
