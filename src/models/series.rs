use std::ops::Range;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::Observation;
use crate::error::TrendError;

/// An ordered, immutable time series of cumulative case counts.
///
/// Dates are strictly increasing; this is checked on construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "Vec<Observation>", into = "Vec<Observation>")]
pub struct CaseSeries {
    observations: Vec<Observation>,
}

impl CaseSeries {
    /// Build a series, rejecting empty input and out-of-order dates.
    ///
    /// # Examples
    ///
    /// ```
    /// use case_trend::{CaseSeries, Observation};
    /// use chrono::NaiveDate;
    ///
    /// let day = |d| NaiveDate::from_ymd_opt(2020, 3, d).unwrap();
    /// let series = CaseSeries::new(vec![
    ///     Observation::new(day(1), 100),
    ///     Observation::new(day(2), 200),
    /// ])
    /// .unwrap();
    /// assert_eq!(series.len(), 2);
    /// assert_eq!(series.last_date(), day(2));
    /// ```
    pub fn new(observations: Vec<Observation>) -> Result<Self, TrendError> {
        if observations.is_empty() {
            return Err(TrendError::InsufficientData(
                "Case table contains no observations".to_string(),
            ));
        }
        for pair in observations.windows(2) {
            if pair[1].date <= pair[0].date {
                return Err(TrendError::ValidationError(format!(
                    "Dates must be strictly increasing: {} follows {}",
                    pair[1].date, pair[0].date
                )));
            }
        }
        Ok(Self { observations })
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// All observation dates, in order.
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.observations.iter().map(|o| o.date).collect()
    }

    /// All cumulative counts, in order.
    pub fn counts(&self) -> Vec<u64> {
        self.observations.iter().map(|o| o.cases).collect()
    }

    pub fn first_date(&self) -> NaiveDate {
        self.observations[0].date
    }

    pub fn last_date(&self) -> NaiveDate {
        self.observations[self.observations.len() - 1].date
    }

    /// Most recent cumulative count.
    pub fn latest_cases(&self) -> u64 {
        self.observations[self.observations.len() - 1].cases
    }

    /// A contiguous slice of observations by index.
    pub fn window(&self, range: Range<usize>) -> Result<&[Observation], TrendError> {
        if range.start >= range.end || range.end > self.len() {
            return Err(TrendError::InsufficientData(format!(
                "Window {}..{} is empty or outside the {} loaded observations",
                range.start,
                range.end,
                self.len()
            )));
        }
        Ok(&self.observations[range])
    }
}

impl TryFrom<Vec<Observation>> for CaseSeries {
    type Error = TrendError;

    fn try_from(observations: Vec<Observation>) -> Result<Self, Self::Error> {
        Self::new(observations)
    }
}

impl From<CaseSeries> for Vec<Observation> {
    fn from(series: CaseSeries) -> Self {
        series.observations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2020, 3, d).unwrap()
    }

    fn sample_series() -> CaseSeries {
        CaseSeries::new(vec![
            Observation::new(day(1), 75),
            Observation::new(day(2), 100),
            Observation::new(day(3), 124),
            Observation::new(day(4), 158),
        ])
        .unwrap()
    }

    #[test]
    fn test_empty_series_rejected() {
        let err = CaseSeries::new(vec![]).unwrap_err();
        assert!(matches!(err, TrendError::InsufficientData(_)));
    }

    #[test]
    fn test_out_of_order_rejected() {
        let err = CaseSeries::new(vec![
            Observation::new(day(2), 100),
            Observation::new(day(1), 75),
        ])
        .unwrap_err();
        assert!(matches!(err, TrendError::ValidationError(_)));
    }

    #[test]
    fn test_duplicate_date_rejected() {
        let err = CaseSeries::new(vec![
            Observation::new(day(2), 100),
            Observation::new(day(2), 120),
        ])
        .unwrap_err();
        assert!(matches!(err, TrendError::ValidationError(_)));
    }

    #[test]
    fn test_accessors() {
        let series = sample_series();
        assert_eq!(series.len(), 4);
        assert!(!series.is_empty());
        assert_eq!(series.first_date(), day(1));
        assert_eq!(series.last_date(), day(4));
        assert_eq!(series.latest_cases(), 158);
        assert_eq!(series.dates().len(), series.counts().len());
        assert_eq!(series.counts(), vec![75, 100, 124, 158]);
    }

    #[test]
    fn test_window_slice() {
        let series = sample_series();
        let w = series.window(1..3).unwrap();
        assert_eq!(w.len(), 2);
        assert_eq!(w[0].date, day(2));
        assert_eq!(w[1].cases, 124);
    }

    #[test]
    fn test_window_out_of_range() {
        let series = sample_series();
        assert!(series.window(2..9).is_err());
        assert!(series.window(3..3).is_err());
    }

    #[test]
    fn test_deserialize_validates_order() {
        let json = r#"[{"date":"2020-03-02","cases":10},{"date":"2020-03-01","cases":5}]"#;
        assert!(serde_json::from_str::<CaseSeries>(json).is_err());

        let json = r#"[{"date":"2020-03-01","cases":5},{"date":"2020-03-02","cases":10}]"#;
        let series: CaseSeries = serde_json::from_str(json).unwrap();
        assert_eq!(series.len(), 2);
    }
}
