use crate::config::FixedFractionalParams;
use crate::sizing::{truncate_contracts, SizingContext, SizingRule};

//risk a fixed fraction of equity per contract's assumed worst loss
pub fn fractional_contracts(equity: f64, risk_fraction: f64, loss_limit: f64) -> Option<u32> {
    truncate_contracts(equity * risk_fraction / loss_limit)
}

//fixed fractional sizing
//holds floor(equity * f / loss_limit) contracts, resized every day
#[derive(Debug, Clone)]
pub struct FixedFractionalRule {
    params: FixedFractionalParams,
}

impl FixedFractionalRule {
    pub fn new(params: FixedFractionalParams) -> Self {
        FixedFractionalRule { params }
    }
}

impl SizingRule for FixedFractionalRule {
    fn initial_contracts(&mut self, initial_capital: f64) -> Option<u32> {
        fractional_contracts(
            initial_capital,
            self.params.risk_fraction,
            self.params.loss_limit,
        )
    }

    fn next_contracts(&mut self, ctx: &SizingContext) -> Option<u32> {
        fractional_contracts(
            ctx.total_asset,
            self.params.risk_fraction,
            self.params.loss_limit,
        )
    }

    fn name(&self) -> &str {
        "Fixed Fractional"
    }
}
