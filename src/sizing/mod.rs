pub mod equity_curve;
pub mod fixed_fractional;
pub mod fixed_ratio;
pub mod trend_following;
pub mod volatility;

use crate::config::{RuleParams, SimulationConfiguration};
use crate::data::PriceSeries;
use crate::engine::SimulationError;
use crate::indicators::{atr, sma};
use crate::metrics::MarginUnit;

pub use equity_curve::EquityCurveRule;
pub use fixed_fractional::{fractional_contracts, FixedFractionalRule};
pub use fixed_ratio::FixedRatioRule;
pub use trend_following::{cross_signal, CrossSignal, TrendFollowingRule};
pub use volatility::VolatilityRule;

//what a rule sees on each simulated day, after that day's equity is marked
pub struct SizingContext<'a> {
    pub day_index: usize,
    pub total_asset: f64,
    pub price: f64,
    pub previous_contracts: u32,
    //total asset for days 0..=day_index
    pub equity_history: &'a [f64],
}

//money-management interface that all sizing rules implement
//returning none means the formula is undefined for that day (nan or infinite)
pub trait SizingRule: Send {
    //contract count held from day 0, sized from initial capital
    fn initial_contracts(&mut self, initial_capital: f64) -> Option<u32>;

    //contract count to hold from this day on
    fn next_contracts(&mut self, ctx: &SizingContext) -> Option<u32>;

    //returns the rule name
    fn name(&self) -> &str;

    //latest rolling average of equity, for rules that track one
    fn rolling_average(&self) -> Option<f64> {
        None
    }

    //unit of the used-margin column
    fn margin_unit(&self) -> MarginUnit {
        MarginUnit::Fraction
    }
}

//truncates a raw sizing value toward zero, negatives floor to zero contracts
//nan, infinities and counts past u32::MAX have no contract count and yield None
pub fn truncate_contracts(raw: f64) -> Option<u32> {
    if !raw.is_finite() || raw.trunc() > u32::MAX as f64 {
        return None;
    }
    if raw <= 0.0 {
        return Some(0);
    }
    Some(raw.trunc() as u32)
}

//builds the configured rule, computing the indicator series it needs
pub fn build_rule(
    config: &SimulationConfiguration,
    series: &PriceSeries,
) -> Result<Box<dyn SizingRule>, SimulationError> {
    config.validate()?;

    let rule: Box<dyn SizingRule> = match &config.rule_params {
        RuleParams::FixedFractional(p) => Box::new(FixedFractionalRule::new(p.clone())),
        RuleParams::EquityCurveFiltered(p) => Box::new(EquityCurveRule::new(p.clone())),
        RuleParams::FixedRatio(p) => {
            Box::new(FixedRatioRule::new(p.clone(), config.initial_capital))
        }
        RuleParams::VolatilityProportional(p) => {
            let atr = atr(series, p.atr_window)?;
            Box::new(VolatilityRule::new(p.clone(), atr))
        }
        RuleParams::TrendFollowing(p) => {
            let closes = series.closes();
            let slow = sma(&closes, p.slow_window);
            let fast = sma(&closes, p.fast_window);
            Box::new(TrendFollowingRule::new(p.clone(), slow, fast))
        }
    };

    log::debug!("Built sizing rule {}", rule.name());
    Ok(rule)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_that_truncation_never_rounds() {
        assert_eq!(truncate_contracts(10.999), Some(10));
        assert_eq!(truncate_contracts(10.0), Some(10));
        assert_eq!(truncate_contracts(0.4), Some(0));
    }

    #[test]
    fn test_that_negative_sizing_floors_to_zero() {
        assert_eq!(truncate_contracts(-3.7), Some(0));
    }

    #[test]
    fn test_that_undefined_sizing_is_none() {
        assert_eq!(truncate_contracts(f64::INFINITY), None);
        assert_eq!(truncate_contracts(f64::NAN), None);
    }

    #[test]
    fn test_that_counts_past_u32_range_are_not_clamped() {
        assert_eq!(truncate_contracts(u32::MAX as f64), Some(u32::MAX));
        assert_eq!(truncate_contracts(u32::MAX as f64 + 0.5), Some(u32::MAX));
        assert_eq!(truncate_contracts(1e11), None);
    }
}
