use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single dated cumulative case count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    /// Calendar day of the report
    pub date: NaiveDate,
    /// Cumulative number of cases reported up to and including `date`
    pub cases: u64,
}

impl Observation {
    pub fn new(date: NaiveDate, cases: u64) -> Self {
        Self { date, cases }
    }

    /// Case count as a float, for fitting.
    pub fn cases_f64(&self) -> f64 {
        self.cases as f64
    }
}

impl std::fmt::Display for Observation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.date.format("%b-%d"), self.cases)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_uses_month_day() {
        let obs = Observation::new(NaiveDate::from_ymd_opt(2020, 3, 15).unwrap(), 3499);
        assert_eq!(obs.to_string(), "Mar-15: 3499");
    }

    #[test]
    fn test_cases_f64() {
        let obs = Observation::new(NaiveDate::from_ymd_opt(2020, 3, 1).unwrap(), 75);
        assert_eq!(obs.cases_f64(), 75.0);
    }

    #[test]
    fn test_json_roundtrip() {
        let obs = Observation::new(NaiveDate::from_ymd_opt(2020, 4, 2).unwrap(), 245_000);
        let json = serde_json::to_string(&obs).unwrap();
        assert!(json.contains("2020-04-02"));
        let back: Observation = serde_json::from_str(&json).unwrap();
        assert_eq!(back, obs);
    }
}
