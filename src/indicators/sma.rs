//helper function to calculate the arithmetic mean
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

//mean of the window values ending at index, inclusive
//before the window fills the raw value is returned, no partial averaging
pub fn trailing_mean(values: &[f64], index: usize, window: usize) -> f64 {
    if window <= 1 || index + 1 < window {
        return values[index];
    }
    let start = index + 1 - window;
    values[start..=index].iter().sum::<f64>() / window as f64
}

//simple moving average over the whole series
pub fn sma(prices: &[f64], window: usize) -> Vec<f64> {
    (0..prices.len())
        .map(|i| trailing_mean(prices, i, window))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_that_mean_handles_empty_input() {
        assert_eq!(mean(&[]), None);
        assert_eq!(mean(&[2.0, 4.0]), Some(3.0));
    }

    #[test]
    fn test_that_warm_up_returns_raw_prices() {
        let prices = [10.0, 20.0, 30.0, 40.0, 50.0];
        let out = sma(&prices, 3);
        assert_eq!(out.len(), prices.len());
        assert_eq!(out[0], 10.0);
        assert_eq!(out[1], 20.0);
    }

    #[test]
    fn test_that_full_windows_are_averaged() {
        let prices = [10.0, 20.0, 30.0, 40.0, 50.0];
        let out = sma(&prices, 3);
        assert_eq!(out[2], 20.0);
        assert_eq!(out[3], 30.0);
        assert_eq!(out[4], 40.0);
    }

    #[test]
    fn test_that_every_index_matches_definition() {
        let prices: Vec<f64> = (0..40).map(|i| 3500.0 + ((i * 37) % 23) as f64).collect();
        let window = 7;
        let out = sma(&prices, window);

        for i in 0..prices.len() {
            if i < window - 1 {
                assert_eq!(out[i], prices[i]);
            } else {
                let expected = mean(&prices[i + 1 - window..=i]).unwrap();
                assert!((out[i] - expected).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_that_window_longer_than_series_is_raw() {
        let prices = [1.0, 2.0, 3.0];
        assert_eq!(sma(&prices, 10), prices.to_vec());
        assert_eq!(sma(&prices, 1), prices.to_vec());
    }
}
