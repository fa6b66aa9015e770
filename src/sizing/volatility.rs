use crate::config::VolatilityParams;
use crate::metrics::MarginUnit;
use crate::sizing::{truncate_contracts, SizingContext, SizingRule};

//volatility proportional sizing
//risks a fixed fraction of equity against one average true range per contract
#[derive(Debug, Clone)]
pub struct VolatilityRule {
    params: VolatilityParams,
    atr: Vec<f64>,
}

impl VolatilityRule {
    pub fn new(params: VolatilityParams, atr: Vec<f64>) -> Self {
        VolatilityRule { params, atr }
    }

    fn contracts_at(&self, day_index: usize, equity: f64) -> Option<u32> {
        let atr = *self.atr.get(day_index)?;
        truncate_contracts(
            (equity * self.params.volatility_fraction) / (atr * self.params.value_per_point),
        )
    }
}

impl SizingRule for VolatilityRule {
    fn initial_contracts(&mut self, initial_capital: f64) -> Option<u32> {
        self.contracts_at(0, initial_capital)
    }

    fn next_contracts(&mut self, ctx: &SizingContext) -> Option<u32> {
        self.contracts_at(ctx.day_index, ctx.total_asset)
    }

    fn name(&self) -> &str {
        "Volatility Proportional"
    }

    //reported in percent, unlike the other rules
    fn margin_unit(&self) -> MarginUnit {
        MarginUnit::Percent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(atr: Vec<f64>) -> VolatilityRule {
        VolatilityRule::new(
            VolatilityParams {
                volatility_fraction: 0.02,
                value_per_point: 10.0,
                atr_window: 2,
            },
            atr,
        )
    }

    #[test]
    fn test_that_day_zero_uses_first_atr() {
        let mut rule = rule(vec![40.0, 25.0]);
        //100000 * 0.02 / (40 * 10) = 5
        assert_eq!(rule.initial_contracts(100000.0), Some(5));
    }

    #[test]
    fn test_that_lower_volatility_sizes_up() {
        let mut rule = rule(vec![40.0, 25.0]);
        let history = [100000.0, 100000.0];
        let ctx = SizingContext {
            day_index: 1,
            total_asset: 100000.0,
            price: 3500.0,
            previous_contracts: 5,
            equity_history: &history,
        };
        assert_eq!(rule.next_contracts(&ctx), Some(8));
        assert_eq!(rule.margin_unit(), MarginUnit::Percent);
    }

    #[test]
    fn test_that_zero_atr_is_undefined() {
        let mut rule = rule(vec![0.0, 0.0]);
        assert_eq!(rule.initial_contracts(100000.0), None);
    }
}
