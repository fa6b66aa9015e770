use crate::config::sim_config::{require_margin_ratio, require_positive};
use crate::config::{ConfigError, RuleType, SimulationConfiguration};
use crate::data::{PriceSeries, SeriesError};
use crate::instrument::FuturesContract;
use crate::metrics::{ResultRow, ResultTable};
use crate::sizing::{build_rule, SizingContext, SizingRule};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

//identifies a run in error reports
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunMetadata {
    pub symbol: String,
    pub rule: RuleType,
    pub parameters: String,
}

impl fmt::Display for RunMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "symbol={} rule={} params={}",
            self.symbol, self.rule, self.parameters
        )
    }
}

#[derive(Error, Debug)]
pub enum SimulationError {
    #[error(transparent)]
    Input(#[from] SeriesError),
    #[error(transparent)]
    Parameter(#[from] ConfigError),
    #[error("Total asset {total_asset} is not positive on day {day} ({date}), used asset and lever ratio are undefined [{metadata}]")]
    NumericDegeneracy {
        day: usize,
        date: NaiveDate,
        total_asset: f64,
        metadata: RunMetadata,
    },
    #[error("Sizing rule produced no representable contract count on day {day} ({date}) [{metadata}]")]
    UndefinedSizing {
        day: usize,
        date: NaiveDate,
        metadata: RunMetadata,
    },
}

impl SimulationError {
    //day index that stopped the run, if the failure happened inside the loop
    pub fn day(&self) -> Option<usize> {
        match self {
            SimulationError::NumericDegeneracy { day, .. }
            | SimulationError::UndefinedSizing { day, .. } => Some(*day),
            _ => None,
        }
    }
}

//configuration for a simulation run
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub initial_capital: f64,
    pub contract: FuturesContract,
    pub metadata: RunMetadata,
}

impl EngineConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        require_positive("initial_capital", self.initial_capital)?;
        require_positive("contract_multiplier", self.contract.multiplier)?;
        require_margin_ratio(self.contract.margin_ratio)
    }
}

//account state at the close of one simulated day
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationState {
    pub day_index: usize,
    pub total_asset: f64,
    pub contract_count: u32,
    pub used_asset: f64,
    pub lever_ratio: f64,
    pub rolling_average_asset: Option<f64>,
}

//day-by-day equity and position simulation
//day 0 starts from the initial capital with the rule's seed position, every later day
//realizes yesterday's contracts over the close-to-close move before asking the rule
//states are only ever appended in day order
pub struct SimulationEngine<'a> {
    config: EngineConfig,
    series: &'a PriceSeries,
    states: Vec<SimulationState>,
}

impl<'a> SimulationEngine<'a> {
    //creates a new simulation engine over a borrowed price series
    pub fn new(config: EngineConfig, series: &'a PriceSeries) -> Self {
        SimulationEngine {
            config,
            series,
            states: Vec::with_capacity(series.len()),
        }
    }

    //runs the simulation with the given sizing rule
    pub fn run(&mut self, rule: &mut dyn SizingRule) -> Result<ResultTable, SimulationError> {
        self.config.validate()?;
        if self.series.len() < 2 {
            return Err(SeriesError::TooShort {
                len: self.series.len(),
            }
            .into());
        }

        log::info!(
            "Simulating {} days of {} with {} ({} to {})",
            self.series.len(),
            self.config.contract.symbol,
            rule.name(),
            self.series.first_date(),
            self.series.last_date()
        );

        self.states.clear();
        let observations = self.series.observations();
        let contract = &self.config.contract;
        let scale = rule.margin_unit().scale();
        let capital = self.config.initial_capital;

        let mut equity_history = Vec::with_capacity(observations.len());
        equity_history.push(capital);

        //day 0
        let first = &observations[0];
        let contracts = rule
            .initial_contracts(capital)
            .ok_or_else(|| self.undefined_sizing(0))?;
        self.states.push(SimulationState {
            day_index: 0,
            total_asset: capital,
            contract_count: contracts,
            used_asset: scale * contract.margin_utilization(first.close, contracts, capital),
            lever_ratio: contract.leverage(first.close, contracts, capital),
            rolling_average_asset: rule.rolling_average(),
        });

        //main simulation loop
        for i in 1..observations.len() {
            let today = &observations[i];
            let (prev_total, prev_contracts) = {
                let prev = &self.states[i - 1];
                (prev.total_asset, prev.contract_count)
            };

            let price_move = today.close - observations[i - 1].close;
            let pnl = contract.pnl_from_price_move(price_move, prev_contracts);
            let total_asset = prev_total + pnl;

            if total_asset.is_nan() || total_asset <= 0.0 {
                return Err(SimulationError::NumericDegeneracy {
                    day: i,
                    date: today.date,
                    total_asset,
                    metadata: self.config.metadata.clone(),
                });
            }
            equity_history.push(total_asset);

            let ctx = SizingContext {
                day_index: i,
                total_asset,
                price: today.close,
                previous_contracts: prev_contracts,
                equity_history: &equity_history,
            };
            let contracts = rule
                .next_contracts(&ctx)
                .ok_or_else(|| self.undefined_sizing(i))?;

            if contracts != prev_contracts {
                log::debug!(
                    "{} day {}: {} -> {} contracts at equity {:.2}",
                    today.date,
                    i,
                    prev_contracts,
                    contracts,
                    total_asset
                );
            }

            self.states.push(SimulationState {
                day_index: i,
                total_asset,
                contract_count: contracts,
                used_asset: scale
                    * contract.margin_utilization(today.close, contracts, total_asset),
                lever_ratio: contract.leverage(today.close, contracts, total_asset),
                rolling_average_asset: rule.rolling_average(),
            });
        }

        let table = self.build_table(rule);
        if let Some(last) = self.states.last() {
            log::info!(
                "{} finished with total asset {:.2} holding {} contracts",
                rule.name(),
                last.total_asset,
                last.contract_count
            );
        }

        Ok(table)
    }

    fn undefined_sizing(&self, day: usize) -> SimulationError {
        SimulationError::UndefinedSizing {
            day,
            date: self.series.observations()[day].date,
            metadata: self.config.metadata.clone(),
        }
    }

    fn build_table(&self, rule: &dyn SizingRule) -> ResultTable {
        let rows = self
            .series
            .observations()
            .iter()
            .zip(self.states.iter())
            .map(|(obs, state)| ResultRow {
                date: obs.date,
                close: obs.close,
                contract_count: state.contract_count,
                total_asset: state.total_asset,
                used_asset: state.used_asset,
                lever_ratio: state.lever_ratio,
                rolling_average_asset: state.rolling_average_asset,
            })
            .collect();

        ResultTable::new(rule.name().to_string(), rule.margin_unit(), rows)
    }

    //per-day states of the last run
    pub fn states(&self) -> &[SimulationState] {
        &self.states
    }

    //returns a reference to the contract
    pub fn contract(&self) -> &FuturesContract {
        &self.config.contract
    }
}

//validates the configuration, builds its rule and runs it over the series
pub fn simulate(
    config: &SimulationConfiguration,
    series: &PriceSeries,
) -> Result<ResultTable, SimulationError> {
    let mut rule = build_rule(config, series)?;
    let mut engine = SimulationEngine::new(config.engine_config(), series);
    engine.run(rule.as_mut())
}
