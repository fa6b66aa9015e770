use crate::config::TrendFollowingParams;
use crate::sizing::{fractional_contracts, SizingContext, SizingRule};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrossSignal {
    //size up with fixed fractional
    Enter,
    //flatten
    Exit,
}

//cross check for day i >= 1, today's slow average against yesterday's fast one
//enter when slow was above fast yesterday and is now below it, exit mirrors that
pub fn cross_signal(slow: &[f64], fast: &[f64], i: usize) -> Option<CrossSignal> {
    if i == 0 {
        return None;
    }
    let (prev_slow, slow_now, prev_fast) = (*slow.get(i - 1)?, *slow.get(i)?, *fast.get(i - 1)?);

    if prev_slow > prev_fast && slow_now < prev_fast {
        return Some(CrossSignal::Enter);
    }
    if prev_slow < prev_fast && slow_now > prev_fast {
        return Some(CrossSignal::Exit);
    }
    None
}

//moving average cross strategy
//enters on a cross, flattens on the opposite cross and otherwise holds
#[derive(Debug, Clone)]
pub struct TrendFollowingRule {
    params: TrendFollowingParams,
    slow: Vec<f64>,
    fast: Vec<f64>,
}

impl TrendFollowingRule {
    pub fn new(params: TrendFollowingParams, slow: Vec<f64>, fast: Vec<f64>) -> Self {
        TrendFollowingRule { params, slow, fast }
    }
}

impl SizingRule for TrendFollowingRule {
    fn initial_contracts(&mut self, initial_capital: f64) -> Option<u32> {
        fractional_contracts(
            initial_capital,
            self.params.risk_fraction,
            self.params.loss_limit,
        )
    }

    fn next_contracts(&mut self, ctx: &SizingContext) -> Option<u32> {
        if ctx.day_index >= self.slow.len() || ctx.day_index >= self.fast.len() {
            return None;
        }

        match cross_signal(&self.slow, &self.fast, ctx.day_index) {
            Some(CrossSignal::Enter) => fractional_contracts(
                ctx.total_asset,
                self.params.risk_fraction,
                self.params.loss_limit,
            ),
            Some(CrossSignal::Exit) => Some(0),
            None => Some(ctx.previous_contracts),
        }
    }

    fn name(&self) -> &str {
        "Trend Following"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> TrendFollowingParams {
        TrendFollowingParams {
            risk_fraction: 0.3,
            loss_limit: 6700.0,
            slow_window: 3,
            fast_window: 2,
        }
    }

    fn ctx(day_index: usize, previous_contracts: u32, history: &[f64]) -> SizingContext<'_> {
        SizingContext {
            day_index,
            total_asset: 1000000.0,
            price: 3800.0,
            previous_contracts,
            equity_history: history,
        }
    }

    #[test]
    fn test_that_day_zero_is_fixed_fractional() {
        let mut rule = TrendFollowingRule::new(params(), vec![1.0], vec![1.0]);
        //1000000 * 0.3 / 6700 = 44.77
        assert_eq!(rule.initial_contracts(1000000.0), Some(44));
    }

    #[test]
    fn test_that_no_cross_holds_previous_count() {
        let slow = vec![100.0, 100.5, 101.0];
        let fast = vec![99.0, 99.5, 100.0];
        let mut rule = TrendFollowingRule::new(params(), slow, fast);
        let history = [1000000.0; 3];

        assert_eq!(rule.next_contracts(&ctx(1, 17, &history)), Some(17));
        assert_eq!(rule.next_contracts(&ctx(2, 0, &history)), Some(0));
    }

    #[test]
    fn test_that_downward_slow_cross_enters() {
        let slow = vec![101.0, 99.0];
        let fast = vec![100.0, 100.0];
        let mut rule = TrendFollowingRule::new(params(), slow, fast);
        let history = [1000000.0; 2];

        assert_eq!(cross_signal(&rule.slow, &rule.fast, 1), Some(CrossSignal::Enter));
        assert_eq!(rule.next_contracts(&ctx(1, 0, &history)), Some(44));
    }

    #[test]
    fn test_that_upward_slow_cross_exits() {
        let slow = vec![99.0, 101.0];
        let fast = vec![100.0, 100.0];
        let mut rule = TrendFollowingRule::new(params(), slow, fast);
        let history = [1000000.0; 2];

        assert_eq!(rule.next_contracts(&ctx(1, 44, &history)), Some(0));
    }

    #[test]
    fn test_that_cross_compares_against_yesterdays_fast_average() {
        //slow drops below yesterday's fast (100) but stays above today's fast (98)
        let slow = vec![101.0, 99.0];
        let fast = vec![100.0, 98.0];
        assert_eq!(cross_signal(&slow, &fast, 1), Some(CrossSignal::Enter));

        //slow ends below today's fast (102) but never crossed yesterday's level
        let slow = vec![101.0, 101.5];
        let fast = vec![100.0, 102.0];
        assert_eq!(cross_signal(&slow, &fast, 1), None);
    }

    #[test]
    fn test_that_day_zero_has_no_signal() {
        assert_eq!(cross_signal(&[1.0], &[2.0], 0), None);
    }
}
