pub mod sim_config;

pub use sim_config::{
    ColumnNames, ConfigError, ContractConfig, EquityCurveParams, FixedFractionalParams,
    FixedRatioParams, RuleParams, RuleType, SimulationConfiguration, TrendFollowingParams,
    VolatilityParams,
};
