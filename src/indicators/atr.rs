use crate::data::{PriceSeries, SeriesError};

//raw true range for every day, day 0 is the plain high-low range
//a gap below the previous close measures to the low, a gap above to the high
pub fn true_range(highs: &[f64], lows: &[f64], closes: &[f64]) -> Vec<f64> {
    let mut tr = Vec::with_capacity(closes.len());

    for i in 0..closes.len() {
        let value = if i == 0 {
            highs[0] - lows[0]
        } else if highs[i] < closes[i - 1] {
            closes[i - 1] - lows[i]
        } else if lows[i] > closes[i - 1] {
            highs[i] - closes[i - 1]
        } else {
            highs[i] - lows[i]
        };
        tr.push(value);
    }

    tr
}

//smooths the raw true range with a simple trailing mean
//indices before window-1 keep the raw value
pub fn average_true_range(highs: &[f64], lows: &[f64], closes: &[f64], window: usize) -> Vec<f64> {
    let raw = true_range(highs, lows, closes);
    let mut out = raw.clone();

    if window == 0 {
        return out;
    }

    for i in window - 1..raw.len() {
        out[i] = raw[i + 1 - window..=i].iter().sum::<f64>() / window as f64;
    }

    out
}

//average true range of a series that carries high/low columns
pub fn atr(series: &PriceSeries, window: usize) -> Result<Vec<f64>, SeriesError> {
    let (highs, lows) = series.ranges()?;
    let closes = series.closes();
    Ok(average_true_range(&highs, &lows, &closes, window))
}
