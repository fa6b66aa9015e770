use crate::config::FixedRatioParams;
use crate::sizing::{truncate_contracts, SizingContext, SizingRule};

//fixed ratio sizing: n contracts need delta * n * (n - 1) / 2 of profit
//below the starting capital the rule keeps a single contract
#[derive(Debug, Clone)]
pub struct FixedRatioRule {
    params: FixedRatioParams,
    initial_capital: f64,
}

impl FixedRatioRule {
    pub fn new(params: FixedRatioParams, initial_capital: f64) -> Self {
        FixedRatioRule {
            params,
            initial_capital,
        }
    }

    pub fn contracts_for(&self, total_asset: f64) -> Option<u32> {
        let profit = total_asset - self.initial_capital;
        if profit < 0.0 {
            return Some(1);
        }
        truncate_contracts(0.5 * (1.0 + (1.0 + 8.0 * profit / self.params.delta).sqrt()))
    }
}

impl SizingRule for FixedRatioRule {
    fn initial_contracts(&mut self, _initial_capital: f64) -> Option<u32> {
        Some(1)
    }

    fn next_contracts(&mut self, ctx: &SizingContext) -> Option<u32> {
        self.contracts_for(ctx.total_asset)
    }

    fn name(&self) -> &str {
        "Fixed Ratio"
    }
}
