use serde::{Deserialize, Serialize};

//represents the single traded futures contract
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuturesContract {
    //contract symbol (eg rb, hc, i)
    pub symbol: String,

    //units per contract (eg 10 tons for rebar)
    pub multiplier: f64,

    //fraction of notional value posted as margin
    pub margin_ratio: f64,
}

impl FuturesContract {
    //creates a new futurescontract
    pub fn new(symbol: String, multiplier: f64, margin_ratio: f64) -> Self {
        FuturesContract {
            symbol,
            multiplier,
            margin_ratio,
        }
    }

    //calculates pnl of holding `quantity` contracts through a price move
    pub fn pnl_from_price_move(&self, price_diff: f64, quantity: u32) -> f64 {
        quantity as f64 * self.multiplier * price_diff
    }

    //calculates the notional value of a position
    pub fn notional_value(&self, price: f64, quantity: u32) -> f64 {
        quantity as f64 * self.multiplier * price
    }

    //share of equity tied up as margin
    pub fn margin_utilization(&self, price: f64, quantity: u32, equity: f64) -> f64 {
        quantity as f64 * self.multiplier * price * self.margin_ratio / equity
    }

    //notional position value over equity
    pub fn leverage(&self, price: f64, quantity: u32, equity: f64) -> f64 {
        self.notional_value(price, quantity) / equity
    }

    //helper to create a shfe rebar contract
    pub fn rebar() -> Self {
        FuturesContract::new(
            "RB".to_string(),
            10.0, //tons per contract
            0.16, //margin ratio
        )
    }
}
