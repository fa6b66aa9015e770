use crate::engine::{EngineConfig, RunMetadata};
use crate::instrument::FuturesContract;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Parameter {name} must be positive and finite, got {value}")]
    NonPositive { name: &'static str, value: f64 },
    #[error("Parameter {name} must be non-negative and finite, got {value}")]
    Negative { name: &'static str, value: f64 },
    #[error("Window {name} must be at least 1")]
    ZeroWindow { name: &'static str },
    #[error("Margin ratio must lie in (0, 1], got {0}")]
    MarginRatioOutOfRange(f64),
}

pub(crate) fn require_positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { name, value })
    }
}

//zero is allowed, the rule then sizes to zero contracts
fn require_non_negative(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { name, value })
    }
}

pub(crate) fn require_margin_ratio(margin_ratio: f64) -> Result<(), ConfigError> {
    if margin_ratio > 0.0 && margin_ratio <= 1.0 {
        Ok(())
    } else {
        Err(ConfigError::MarginRatioOutOfRange(margin_ratio))
    }
}

fn require_window(name: &'static str, window: usize) -> Result<(), ConfigError> {
    if window == 0 {
        return Err(ConfigError::ZeroWindow { name });
    }
    Ok(())
}

//money-management rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleType {
    FixedFractional,
    EquityCurveFiltered,
    FixedRatio,
    VolatilityProportional,
    TrendFollowing,
}

impl RuleType {
    pub const ALL: [RuleType; 5] = [
        RuleType::FixedFractional,
        RuleType::EquityCurveFiltered,
        RuleType::FixedRatio,
        RuleType::VolatilityProportional,
        RuleType::TrendFollowing,
    ];

    //parse rule type from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "ff" | "fixed_fractional" => Some(RuleType::FixedFractional),
            "equity" | "equity_curve" | "equity_curve_filtered" => {
                Some(RuleType::EquityCurveFiltered)
            }
            "fr" | "fixed_ratio" => Some(RuleType::FixedRatio),
            "vol" | "volatility" | "volatility_proportional" => {
                Some(RuleType::VolatilityProportional)
            }
            "trend" | "ma_cross" | "trend_following" => Some(RuleType::TrendFollowing),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            RuleType::FixedFractional => "Fixed Fractional",
            RuleType::EquityCurveFiltered => "Equity Curve Filtered",
            RuleType::FixedRatio => "Fixed Ratio",
            RuleType::VolatilityProportional => "Volatility Proportional",
            RuleType::TrendFollowing => "Trend Following",
        }
    }
}

impl fmt::Display for RuleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

//fixed fractional parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixedFractionalParams {
    pub risk_fraction: f64,
    pub loss_limit: f64,
}

impl Default for FixedFractionalParams {
    fn default() -> Self {
        FixedFractionalParams {
            risk_fraction: 0.1,
            loss_limit: 1250.0,
        }
    }
}

impl FixedFractionalParams {
    fn validate(&self) -> Result<(), ConfigError> {
        require_non_negative("risk_fraction", self.risk_fraction)?;
        require_positive("loss_limit", self.loss_limit)
    }
}

//fixed fractional sizing gated by the equity curve's own moving average
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquityCurveParams {
    pub risk_fraction: f64,
    pub loss_limit: f64,
    pub window: usize,
}

impl Default for EquityCurveParams {
    fn default() -> Self {
        EquityCurveParams {
            risk_fraction: 0.1,
            loss_limit: 1250.0,
            window: 30,
        }
    }
}

//fixed ratio parameters
//delta is the profit per contract required before adding one more
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixedRatioParams {
    pub delta: f64,
}

impl Default for FixedRatioParams {
    fn default() -> Self {
        FixedRatioParams { delta: 20000.0 }
    }
}

//volatility proportional parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolatilityParams {
    pub volatility_fraction: f64,
    pub value_per_point: f64,
    pub atr_window: usize,
}

impl Default for VolatilityParams {
    fn default() -> Self {
        VolatilityParams {
            volatility_fraction: 0.02,
            value_per_point: 10.0,
            atr_window: 50,
        }
    }
}

//moving-average cross parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendFollowingParams {
    pub risk_fraction: f64,
    pub loss_limit: f64,
    pub slow_window: usize,
    pub fast_window: usize,
}

impl Default for TrendFollowingParams {
    fn default() -> Self {
        TrendFollowingParams {
            risk_fraction: 0.3,
            loss_limit: 6700.0,
            slow_window: 75,
            fast_window: 40,
        }
    }
}

//rule-specific parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum RuleParams {
    FixedFractional(FixedFractionalParams),
    EquityCurveFiltered(EquityCurveParams),
    FixedRatio(FixedRatioParams),
    VolatilityProportional(VolatilityParams),
    TrendFollowing(TrendFollowingParams),
}

impl RuleParams {
    //default parameter set for a rule
    pub fn default_for(rule_type: RuleType) -> Self {
        match rule_type {
            RuleType::FixedFractional => RuleParams::FixedFractional(Default::default()),
            RuleType::EquityCurveFiltered => RuleParams::EquityCurveFiltered(Default::default()),
            RuleType::FixedRatio => RuleParams::FixedRatio(Default::default()),
            RuleType::VolatilityProportional => {
                RuleParams::VolatilityProportional(Default::default())
            }
            RuleType::TrendFollowing => RuleParams::TrendFollowing(Default::default()),
        }
    }

    pub fn rule_type(&self) -> RuleType {
        match self {
            RuleParams::FixedFractional(_) => RuleType::FixedFractional,
            RuleParams::EquityCurveFiltered(_) => RuleType::EquityCurveFiltered,
            RuleParams::FixedRatio(_) => RuleType::FixedRatio,
            RuleParams::VolatilityProportional(_) => RuleType::VolatilityProportional,
            RuleParams::TrendFollowing(_) => RuleType::TrendFollowing,
        }
    }

    //rejects parameters that leave the rule's formula undefined
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            RuleParams::FixedFractional(p) => p.validate(),
            RuleParams::EquityCurveFiltered(p) => {
                require_non_negative("risk_fraction", p.risk_fraction)?;
                require_positive("loss_limit", p.loss_limit)?;
                require_window("window", p.window)
            }
            RuleParams::FixedRatio(p) => require_positive("delta", p.delta),
            RuleParams::VolatilityProportional(p) => {
                require_non_negative("volatility_fraction", p.volatility_fraction)?;
                require_positive("value_per_point", p.value_per_point)?;
                require_window("atr_window", p.atr_window)
            }
            RuleParams::TrendFollowing(p) => {
                require_non_negative("risk_fraction", p.risk_fraction)?;
                require_positive("loss_limit", p.loss_limit)?;
                require_window("slow_window", p.slow_window)?;
                require_window("fast_window", p.fast_window)
            }
        }
    }

    //compact one-line rendering used in run metadata
    pub fn describe(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| format!("{:?}", self))
    }
}

//csv header labels for the price file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnNames {
    pub date: String,
    pub high: String,
    pub low: String,
    pub close: String,
    pub pct_change: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        ColumnNames {
            date: "date".to_string(),
            high: "high".to_string(),
            low: "low".to_string(),
            close: "close".to_string(),
            pct_change: "pct_change".to_string(),
        }
    }
}

//contract configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractConfig {
    pub symbol: String,
    //units per contract (eg tons of rebar)
    pub contract_multiplier: f64,
    pub margin_ratio: f64,
}

impl ContractConfig {
    //converts to a FuturesContract
    pub fn to_futures_contract(&self) -> FuturesContract {
        FuturesContract::new(
            self.symbol.clone(),
            self.contract_multiplier,
            self.margin_ratio,
        )
    }

    fn validate(&self) -> Result<(), ConfigError> {
        require_positive("contract_multiplier", self.contract_multiplier)?;
        require_margin_ratio(self.margin_ratio)
    }
}

impl Default for ContractConfig {
    fn default() -> Self {
        ContractConfig {
            symbol: "RB".to_string(),
            contract_multiplier: 10.0,
            margin_ratio: 0.16,
        }
    }
}

//complete run configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfiguration {
    //data
    pub data_path: PathBuf,
    #[serde(default)]
    pub columns: ColumnNames,

    //contract specification
    pub contract: ContractConfig,

    //account settings
    pub initial_capital: f64,

    //sizing rule
    pub rule_params: RuleParams,

    //optional output path
    #[serde(default)]
    pub output_csv: Option<PathBuf>,
}

impl Default for SimulationConfiguration {
    fn default() -> Self {
        SimulationConfiguration {
            data_path: PathBuf::from("data.csv"),
            columns: ColumnNames::default(),
            contract: ContractConfig::default(),
            initial_capital: 100000.0,
            rule_params: RuleParams::FixedFractional(FixedFractionalParams::default()),
            output_csv: None,
        }
    }
}

impl SimulationConfiguration {
    //load configuration from a JSON file
    pub fn from_json_file(path: &PathBuf) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: SimulationConfiguration = serde_json::from_str(&contents)?;
        Ok(config)
    }

    //save configuration to a JSON file
    pub fn to_json_file(&self, path: &PathBuf) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn rule_type(&self) -> RuleType {
        self.rule_params.rule_type()
    }

    //checks every run parameter before a simulation starts
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_positive("initial_capital", self.initial_capital)?;
        self.contract.validate()?;
        self.rule_params.validate()
    }

    //same configuration with another rule's parameters
    pub fn with_rule(&self, rule_params: RuleParams) -> Self {
        SimulationConfiguration {
            rule_params,
            ..self.clone()
        }
    }

    pub fn metadata(&self) -> RunMetadata {
        RunMetadata {
            symbol: self.contract.symbol.clone(),
            rule: self.rule_type(),
            parameters: self.rule_params.describe(),
        }
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            initial_capital: self.initial_capital,
            contract: self.contract.to_futures_contract(),
            metadata: self.metadata(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_that_default_configuration_is_valid() {
        let config = SimulationConfiguration::default();
        assert!(config.validate().is_ok());
        for rule in RuleType::ALL {
            assert!(RuleParams::default_for(rule).validate().is_ok());
            assert_eq!(RuleParams::default_for(rule).rule_type(), rule);
        }
    }

    #[test]
    fn test_that_zero_loss_limit_is_rejected() {
        let params = RuleParams::FixedFractional(FixedFractionalParams {
            risk_fraction: 0.1,
            loss_limit: 0.0,
        });
        assert_eq!(
            params.validate(),
            Err(ConfigError::NonPositive {
                name: "loss_limit",
                value: 0.0
            })
        );
    }

    #[test]
    fn test_that_zero_fractions_are_allowed_but_negatives_are_not() {
        let params = RuleParams::FixedFractional(FixedFractionalParams {
            risk_fraction: 0.0,
            loss_limit: 1250.0,
        });
        assert!(params.validate().is_ok());

        let params = RuleParams::VolatilityProportional(VolatilityParams {
            volatility_fraction: 0.0,
            ..Default::default()
        });
        assert!(params.validate().is_ok());

        let params = RuleParams::TrendFollowing(TrendFollowingParams {
            risk_fraction: -0.1,
            ..Default::default()
        });
        assert_eq!(
            params.validate(),
            Err(ConfigError::Negative {
                name: "risk_fraction",
                value: -0.1
            })
        );

        let params = RuleParams::EquityCurveFiltered(EquityCurveParams {
            risk_fraction: f64::INFINITY,
            ..Default::default()
        });
        assert!(matches!(
            params.validate(),
            Err(ConfigError::Negative { .. })
        ));
    }

    #[test]
    fn test_that_zero_delta_is_rejected() {
        let params = RuleParams::FixedRatio(FixedRatioParams { delta: 0.0 });
        assert!(matches!(
            params.validate(),
            Err(ConfigError::NonPositive { name: "delta", .. })
        ));
    }

    #[test]
    fn test_that_zero_windows_are_rejected() {
        let params = RuleParams::TrendFollowing(TrendFollowingParams {
            fast_window: 0,
            ..Default::default()
        });
        assert_eq!(
            params.validate(),
            Err(ConfigError::ZeroWindow {
                name: "fast_window"
            })
        );

        let params = RuleParams::VolatilityProportional(VolatilityParams {
            atr_window: 0,
            ..Default::default()
        });
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_that_contract_and_capital_are_checked() {
        let mut config = SimulationConfiguration::default();
        config.contract.margin_ratio = 1.5;
        assert_eq!(
            config.validate(),
            Err(ConfigError::MarginRatioOutOfRange(1.5))
        );

        let mut config = SimulationConfiguration::default();
        config.initial_capital = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_that_rule_names_parse() {
        assert_eq!(RuleType::parse("FF"), Some(RuleType::FixedFractional));
        assert_eq!(RuleType::parse("equity"), Some(RuleType::EquityCurveFiltered));
        assert_eq!(RuleType::parse("fixed_ratio"), Some(RuleType::FixedRatio));
        assert_eq!(RuleType::parse("vol"), Some(RuleType::VolatilityProportional));
        assert_eq!(RuleType::parse("ma_cross"), Some(RuleType::TrendFollowing));
        assert_eq!(RuleType::parse("martingale"), None);
    }

    #[test]
    fn test_that_configuration_survives_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let config = SimulationConfiguration::default()
            .with_rule(RuleParams::default_for(RuleType::TrendFollowing));
        config.to_json_file(&path).unwrap();

        let loaded = SimulationConfiguration::from_json_file(&path).unwrap();
        assert_eq!(loaded.rule_params, config.rule_params);
        assert_eq!(loaded.contract, config.contract);

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"rule\": \"trend_following\""));
    }
}
