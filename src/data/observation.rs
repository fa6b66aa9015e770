use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SeriesError {
    #[error("Price series needs at least 2 observations, got {len}")]
    TooShort { len: usize },
    #[error("Dates must be strictly ascending: {current} at index {index} follows {previous}")]
    NonMonotonicDate {
        index: usize,
        previous: NaiveDate,
        current: NaiveDate,
    },
    #[error("Close price must be positive: {close} at index {index}")]
    NonPositiveClose { index: usize, close: f64 },
    #[error("Invalid range at index {index}: high ({high}) < low ({low})")]
    InvalidHighLow { index: usize, high: f64, low: f64 },
    #[error("Missing required column: {column}")]
    MissingColumn { column: String },
}

//a single trading day of the underlying contract
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Observation {
    pub date: NaiveDate,
    pub close: f64,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub pct_change: Option<f64>,
}

impl Observation {
    //creates a close-only observation
    pub fn close_only(date: NaiveDate, close: f64) -> Self {
        Observation {
            date,
            close,
            high: None,
            low: None,
            pct_change: None,
        }
    }

    //creates an observation carrying the day's high/low range
    pub fn with_range(date: NaiveDate, high: f64, low: f64, close: f64) -> Self {
        Observation {
            date,
            close,
            high: Some(high),
            low: Some(low),
            pct_change: None,
        }
    }

    //returns the range (high - low) when both sides are known
    pub fn range(&self) -> Option<f64> {
        match (self.high, self.low) {
            (Some(high), Some(low)) => Some(high - low),
            _ => None,
        }
    }
}

//validated daily history: two or more days, ascending dates, positive closes, high >= low
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    observations: Vec<Observation>,
}

impl PriceSeries {
    pub fn new(observations: Vec<Observation>) -> Result<Self, SeriesError> {
        if observations.len() < 2 {
            return Err(SeriesError::TooShort {
                len: observations.len(),
            });
        }

        for (index, obs) in observations.iter().enumerate() {
            if obs.close.is_nan() || obs.close <= 0.0 {
                return Err(SeriesError::NonPositiveClose {
                    index,
                    close: obs.close,
                });
            }

            if let (Some(high), Some(low)) = (obs.high, obs.low) {
                if high < low {
                    return Err(SeriesError::InvalidHighLow { index, high, low });
                }
            }

            if index > 0 {
                let previous = observations[index - 1].date;
                if obs.date <= previous {
                    return Err(SeriesError::NonMonotonicDate {
                        index,
                        previous,
                        current: obs.date,
                    });
                }
            }
        }

        Ok(PriceSeries { observations })
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    //always false once constructed, kept for clippy's len_without_is_empty
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn get(&self, index: usize) -> Option<&Observation> {
        self.observations.get(index)
    }

    pub fn closes(&self) -> Vec<f64> {
        self.observations.iter().map(|o| o.close).collect()
    }

    pub fn first_date(&self) -> NaiveDate {
        self.observations[0].date
    }

    pub fn last_date(&self) -> NaiveDate {
        self.observations[self.observations.len() - 1].date
    }

    //returns (highs, lows), failing if any day lacks either value
    pub fn ranges(&self) -> Result<(Vec<f64>, Vec<f64>), SeriesError> {
        let mut highs = Vec::with_capacity(self.len());
        let mut lows = Vec::with_capacity(self.len());

        for obs in &self.observations {
            let high = obs.high.ok_or_else(|| SeriesError::MissingColumn {
                column: "high".to_string(),
            })?;
            let low = obs.low.ok_or_else(|| SeriesError::MissingColumn {
                column: "low".to_string(),
            })?;
            highs.push(high);
            lows.push(low);
        }

        Ok((highs, lows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 1, d).unwrap()
    }

    #[test]
    fn test_that_single_observation_is_rejected() {
        let err = PriceSeries::new(vec![Observation::close_only(day(1), 100.0)]).unwrap_err();
        assert_eq!(err, SeriesError::TooShort { len: 1 });
    }

    #[test]
    fn test_that_unordered_dates_are_rejected() {
        let err = PriceSeries::new(vec![
            Observation::close_only(day(3), 100.0),
            Observation::close_only(day(2), 101.0),
        ])
        .unwrap_err();
        assert!(matches!(err, SeriesError::NonMonotonicDate { index: 1, .. }));
    }

    #[test]
    fn test_that_duplicate_dates_are_rejected() {
        let err = PriceSeries::new(vec![
            Observation::close_only(day(2), 100.0),
            Observation::close_only(day(2), 101.0),
        ])
        .unwrap_err();
        assert!(matches!(err, SeriesError::NonMonotonicDate { .. }));
    }

    #[test]
    fn test_that_calendar_gaps_are_tolerated() {
        let series = PriceSeries::new(vec![
            Observation::close_only(day(2), 100.0),
            Observation::close_only(day(9), 101.0),
            Observation::close_only(day(30), 99.0),
        ])
        .unwrap();
        assert_eq!(series.len(), 3);
        assert_eq!(series.closes(), vec![100.0, 101.0, 99.0]);
    }

    #[test]
    fn test_that_non_positive_close_is_rejected() {
        let err = PriceSeries::new(vec![
            Observation::close_only(day(1), 100.0),
            Observation::close_only(day(2), 0.0),
        ])
        .unwrap_err();
        assert!(matches!(err, SeriesError::NonPositiveClose { index: 1, .. }));
    }

    #[test]
    fn test_that_inverted_range_is_rejected() {
        let err = PriceSeries::new(vec![
            Observation::with_range(day(1), 99.0, 101.0, 100.0),
            Observation::with_range(day(2), 102.0, 100.0, 101.0),
        ])
        .unwrap_err();
        assert!(matches!(err, SeriesError::InvalidHighLow { index: 0, .. }));
    }

    #[test]
    fn test_that_ranges_require_high_and_low() {
        let series = PriceSeries::new(vec![
            Observation::with_range(day(1), 101.0, 99.0, 100.0),
            Observation::close_only(day(2), 101.0),
        ])
        .unwrap();
        assert!(matches!(
            series.ranges(),
            Err(SeriesError::MissingColumn { .. })
        ));
    }
}
