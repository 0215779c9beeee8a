use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::analysis::{Projection, TrendModel};
use crate::error::TrendError;
use crate::models::{CaseSeries, Observation};

/// Flat CSV row for an exported projection point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionRow {
    pub label: String,
    pub model: TrendModel,
    pub date: NaiveDate,
    pub value: f64,
    pub percent: f64,
}

/// Parse a `<day>-<Mon>` cell such as `15-Mar` into a date in `year`.
pub fn parse_day_month(cell: &str, year: i32) -> Result<NaiveDate, TrendError> {
    NaiveDate::parse_from_str(&format!("{cell}-{year}"), "%d-%b-%Y")
        .map_err(|e| TrendError::ParseError(format!("Invalid date '{cell}': {e}")))
}

fn parse_case_records<R: Read>(
    rdr: &mut csv::Reader<R>,
    year: i32,
) -> Result<Vec<Observation>, TrendError> {
    let mut observations = Vec::new();

    for result in rdr.records() {
        let record = result?;
        if record.len() != 2 {
            let line = record.position().map(|p| p.line()).unwrap_or_default();
            return Err(TrendError::ParseError(format!(
                "Line {line}: expected 2 columns (date, cases), found {}",
                record.len()
            )));
        }
        let (date_cell, cases): (String, u64) = record.deserialize(None)?;
        observations.push(Observation::new(parse_day_month(&date_cell, year)?, cases));
    }

    Ok(observations)
}

fn case_reader_builder() -> csv::ReaderBuilder {
    let mut builder = csv::ReaderBuilder::new();
    builder
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All);
    builder
}

/// Read a cumulative case table from a CSV file.
///
/// The first row is a header and is skipped. Every other row must be
/// `<day>-<Mon>,<count>`; any malformed row fails the whole load.
pub fn read_csv(path: impl AsRef<Path>, year: i32) -> Result<CaseSeries, TrendError> {
    let path = path.as_ref();
    let mut rdr = case_reader_builder().from_path(path)?;
    let series = CaseSeries::new(parse_case_records(&mut rdr, year)?)?;
    tracing::info!(
        path = %path.display(),
        observations = series.len(),
        first = %series.first_date(),
        last = %series.last_date(),
        "loaded case table"
    );
    Ok(series)
}

/// Read a cumulative case table from CSV bytes.
pub fn read_csv_from_bytes(data: &[u8], year: i32) -> Result<CaseSeries, TrendError> {
    let mut rdr = case_reader_builder().from_reader(data);
    CaseSeries::new(parse_case_records(&mut rdr, year)?)
}

/// Flatten projections into one row per projected day.
pub fn projection_rows(projections: &[Projection]) -> Vec<ProjectionRow> {
    projections
        .iter()
        .flat_map(|proj| {
            proj.points.iter().map(move |p| ProjectionRow {
                label: proj.label.clone(),
                model: proj.model(),
                date: p.date,
                value: p.value,
                percent: p.percent,
            })
        })
        .collect()
}

/// Write projections to a CSV file, one row per projected day.
pub fn write_projections_csv(
    projections: &[Projection],
    path: impl AsRef<Path>,
) -> Result<(), TrendError> {
    let mut wtr = csv::Writer::from_path(path.as_ref())?;
    for row in projection_rows(projections) {
        wtr.serialize(&row)?;
    }
    wtr.flush()?;
    tracing::info!(path = %path.as_ref().display(), "wrote projection CSV");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{project, FitWindow, ProjectionSettings};

    const SAMPLE: &str = "date,cases\n1-Mar,75\n2-Mar,100\n3-Mar,124\n4-Mar,158\n";

    fn day(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2020, m, d).unwrap()
    }

    #[test]
    fn test_parse_day_month() {
        assert_eq!(parse_day_month("15-Mar", 2020).unwrap(), day(3, 15));
        assert_eq!(parse_day_month("01-Apr", 2020).unwrap(), day(4, 1));
        assert_eq!(
            parse_day_month("7-jan", 2021).unwrap(),
            NaiveDate::from_ymd_opt(2021, 1, 7).unwrap()
        );
    }

    #[test]
    fn test_parse_day_month_rejects_garbage() {
        assert!(matches!(parse_day_month("Mar-15", 2020), Err(TrendError::ParseError(_))));
        assert!(parse_day_month("31-Feb", 2020).is_err());
        assert!(parse_day_month("", 2020).is_err());
    }

    #[test]
    fn test_read_from_bytes() {
        let series = read_csv_from_bytes(SAMPLE.as_bytes(), 2020).unwrap();
        assert_eq!(series.len(), 4);
        assert_eq!(series.first_date(), day(3, 1));
        assert_eq!(series.last_date(), day(3, 4));
        assert_eq!(series.counts(), vec![75, 100, 124, 158]);
    }

    #[test]
    fn test_header_is_discarded() {
        // A header that looks like data is still skipped.
        let series = read_csv_from_bytes(b"29-Feb,10\n1-Mar,75\n", 2020).unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(series.first_date(), day(3, 1));
    }

    #[test]
    fn test_whitespace_trimmed() {
        let series = read_csv_from_bytes(b"date,cases\n 1-Mar , 75 \n", 2020).unwrap();
        assert_eq!(series.counts(), vec![75]);
    }

    #[test]
    fn test_wrong_arity_fails() {
        let err = read_csv_from_bytes(b"date,cases\n1-Mar,75,9\n", 2020).unwrap_err();
        assert!(matches!(err, TrendError::ParseError(_)));
        let err = read_csv_from_bytes(b"date,cases\n1-Mar\n", 2020).unwrap_err();
        assert!(matches!(err, TrendError::ParseError(_)));
    }

    #[test]
    fn test_non_numeric_count_fails() {
        let err = read_csv_from_bytes(b"date,cases\n1-Mar,many\n", 2020).unwrap_err();
        assert!(matches!(err, TrendError::Csv(_)));
    }

    #[test]
    fn test_negative_count_fails() {
        assert!(read_csv_from_bytes(b"date,cases\n1-Mar,-4\n", 2020).is_err());
    }

    #[test]
    fn test_out_of_order_fails() {
        let err = read_csv_from_bytes(b"date,cases\n2-Mar,75\n1-Mar,80\n", 2020).unwrap_err();
        assert!(matches!(err, TrendError::ValidationError(_)));
    }

    #[test]
    fn test_header_only_fails() {
        let err = read_csv_from_bytes(b"date,cases\n", 2020).unwrap_err();
        assert!(matches!(err, TrendError::InsufficientData(_)));
    }

    #[test]
    fn test_missing_file_fails() {
        let err = read_csv("/nonexistent/data.csv", 2020).unwrap_err();
        assert!(matches!(err, TrendError::Csv(_)));
    }

    #[test]
    fn test_read_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.csv");
        std::fs::write(&path, SAMPLE).unwrap();
        let series = read_csv(&path, 2020).unwrap();
        assert_eq!(series.len(), 4);
    }

    #[test]
    fn test_write_projection_csv() {
        let series = read_csv_from_bytes(SAMPLE.as_bytes(), 2020).unwrap();
        let settings = ProjectionSettings::new(1e6, day(3, 8));
        let window = FitWindow::trailing(4, TrendModel::Linear);
        let proj = project(&series, &window, &settings).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("projections.csv");
        write_projections_csv(&[proj], &path).unwrap();

        let mut rdr = csv::Reader::from_path(&path).unwrap();
        let headers = rdr.headers().unwrap().clone();
        assert_eq!(
            headers.iter().collect::<Vec<_>>(),
            vec!["label", "model", "date", "value", "percent"]
        );
        let rows: Vec<ProjectionRow> = rdr.deserialize().map(|r| r.unwrap()).collect();
        // Mar 1 through Mar 7
        assert_eq!(rows.len(), 7);
        assert_eq!(rows[0].date, day(3, 1));
        assert_eq!(rows[0].model, TrendModel::Linear);
        assert_eq!(rows[0].label, "Last 4 days (linear)");
    }
}
