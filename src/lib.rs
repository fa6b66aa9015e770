//a Rust-based position sizing simulator for single-instrument futures strategies

pub mod config;
pub mod data;
pub mod engine;
pub mod indicators;
pub mod instrument;
pub mod metrics;
pub mod sizing;

//prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{
        ColumnNames, ConfigError, ContractConfig, EquityCurveParams, FixedFractionalParams,
        FixedRatioParams, RuleParams, RuleType, SimulationConfiguration, TrendFollowingParams,
        VolatilityParams,
    };
    pub use crate::data::{load_csv, Observation, PriceSeries, SeriesError};
    pub use crate::engine::{
        simulate, EngineConfig, RunMetadata, SimulationEngine, SimulationError, SimulationState,
    };
    pub use crate::indicators::{atr, sma};
    pub use crate::instrument::FuturesContract;
    pub use crate::metrics::{
        calculate_equity_curve, EquityPoint, MarginUnit, ResultRow, ResultTable, RunSummary,
    };
    pub use crate::sizing::{build_rule, SizingContext, SizingRule};
}
