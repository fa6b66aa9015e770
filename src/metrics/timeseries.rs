use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

//a point in the equity curve
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EquityPoint {
    pub date: NaiveDate,
    pub equity: f64,
    pub drawdown: f64,
    pub returns: f64,
}

//calculates the equity curve with drawdowns measured from the running peak
pub fn calculate_equity_curve(
    dates: &[NaiveDate],
    equity_values: &[f64],
    initial_capital: f64,
) -> Vec<EquityPoint> {
    let mut curve = Vec::with_capacity(dates.len());
    let mut peak = initial_capital;
    let mut prev_equity = initial_capital;

    for (i, (&date, &equity)) in dates.iter().zip(equity_values.iter()).enumerate() {
        if equity > peak {
            peak = equity;
        }

        let drawdown = if peak > 0.0 {
            (peak - equity) / peak
        } else {
            0.0
        };

        let returns = if i == 0 {
            0.0
        } else {
            (equity - prev_equity) / prev_equity
        };

        curve.push(EquityPoint {
            date,
            equity,
            drawdown,
            returns,
        });
        prev_equity = equity;
    }

    curve
}

//calculates maximum drawdown from equity curve
pub fn max_drawdown(equity_curve: &[EquityPoint]) -> f64 {
    equity_curve
        .iter()
        .map(|point| point.drawdown)
        .fold(0.0, f64::max)
}

//calculates day-over-day returns from equity values
pub fn calculate_returns(equity_values: &[f64]) -> Vec<f64> {
    equity_values
        .windows(2)
        .map(|w| (w[1] - w[0]) / w[0])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dates(n: u32) -> Vec<NaiveDate> {
        (1..=n)
            .map(|d| NaiveDate::from_ymd_opt(2022, 8, d).unwrap())
            .collect()
    }

    #[test]
    fn test_that_drawdown_tracks_running_peak() {
        let equity = [100.0, 120.0, 90.0, 130.0];
        let curve = calculate_equity_curve(&dates(4), &equity, 100.0);

        assert_eq!(curve[1].drawdown, 0.0);
        assert!((curve[2].drawdown - 0.25).abs() < 1e-12);
        assert_eq!(curve[3].drawdown, 0.0);
        assert!((max_drawdown(&curve) - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_that_returns_are_relative_to_previous_day() {
        let returns = calculate_returns(&[100.0, 110.0, 99.0]);
        assert_eq!(returns.len(), 2);
        assert!((returns[0] - 0.1).abs() < 1e-12);
        assert!((returns[1] + 0.1).abs() < 1e-12);
        assert!(calculate_returns(&[100.0]).is_empty());
    }
}
