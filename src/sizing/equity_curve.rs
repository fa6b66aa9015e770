use crate::config::EquityCurveParams;
use crate::indicators::trailing_mean;
use crate::sizing::{fractional_contracts, SizingContext, SizingRule};

//equity curve trading
//sizes like fixed fractional, but stands aside while equity sits below
//its own trailing average (the account is in a drawdown)
#[derive(Debug, Clone)]
pub struct EquityCurveRule {
    params: EquityCurveParams,

    //state
    last_average: Option<f64>,
}

impl EquityCurveRule {
    pub fn new(params: EquityCurveParams) -> Self {
        EquityCurveRule {
            params,
            last_average: None,
        }
    }
}

impl SizingRule for EquityCurveRule {
    fn initial_contracts(&mut self, initial_capital: f64) -> Option<u32> {
        self.last_average = Some(initial_capital);
        fractional_contracts(
            initial_capital,
            self.params.risk_fraction,
            self.params.loss_limit,
        )
    }

    fn next_contracts(&mut self, ctx: &SizingContext) -> Option<u32> {
        let average = trailing_mean(ctx.equity_history, ctx.day_index, self.params.window);
        self.last_average = Some(average);

        if average > ctx.total_asset {
            return Some(0);
        }

        fractional_contracts(
            ctx.total_asset,
            self.params.risk_fraction,
            self.params.loss_limit,
        )
    }

    fn name(&self) -> &str {
        "Equity Curve Filtered"
    }

    fn rolling_average(&self) -> Option<f64> {
        self.last_average
    }
}
