use crate::config::RuleType;
use crate::metrics::result_table::ResultTable;
use crate::metrics::timeseries::{calculate_equity_curve, calculate_returns, max_drawdown};
use chrono::NaiveDate;
use indexmap::IndexMap;
use prettytable::{Cell, Row, Table};
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

//summary of one simulated run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub rule: String,
    pub days: usize,
    pub initial_capital: f64,
    pub final_asset: f64,
    pub total_return_pct: f64,
    pub max_asset: f64,
    pub max_asset_date: NaiveDate,
    pub max_benefit_pct: f64,
    pub min_asset: f64,
    pub min_asset_date: NaiveDate,
    pub min_benefit_pct: f64,
    pub max_drawdown: f64,
    pub sharpe_ratio: f64,
    pub exposure: f64,
    pub max_contracts: u32,
    pub max_lever_ratio: f64,
}

//profit relative to starting capital, in percent
pub fn benefit_pct(asset: f64, initial_capital: f64) -> f64 {
    (asset - initial_capital) * 100.0 / initial_capital
}

impl RunSummary {
    //returns none for an empty table
    pub fn from_table(table: &ResultTable, initial_capital: f64) -> Option<Self> {
        let rows = table.rows();
        let first = rows.first()?;
        let last = rows.last()?;

        //first occurrence wins on ties
        let mut max_row = first;
        let mut min_row = first;
        for row in rows {
            if row.total_asset > max_row.total_asset {
                max_row = row;
            }
            if row.total_asset < min_row.total_asset {
                min_row = row;
            }
        }

        let equity = table.total_assets();
        let curve = calculate_equity_curve(&table.dates(), &equity, initial_capital);
        let returns = calculate_returns(&equity);

        let in_market = rows.iter().filter(|r| r.contract_count > 0).count();

        Some(RunSummary {
            rule: table.rule.clone(),
            days: rows.len(),
            initial_capital,
            final_asset: last.total_asset,
            total_return_pct: benefit_pct(last.total_asset, initial_capital),
            max_asset: max_row.total_asset,
            max_asset_date: max_row.date,
            max_benefit_pct: benefit_pct(max_row.total_asset, initial_capital),
            min_asset: min_row.total_asset,
            min_asset_date: min_row.date,
            min_benefit_pct: benefit_pct(min_row.total_asset, initial_capital),
            max_drawdown: max_drawdown(&curve),
            sharpe_ratio: calculate_sharpe_ratio(&returns),
            exposure: in_market as f64 / rows.len() as f64,
            max_contracts: rows.iter().map(|r| r.contract_count).max().unwrap_or(0),
            max_lever_ratio: rows.iter().map(|r| r.lever_ratio).fold(0.0, f64::max),
        })
    }

    //prints metrics in a formatted table
    pub fn pretty_print_table(&self) {
        let mut table = Table::new();

        table.add_row(Row::new(vec![Cell::new("Metric"), Cell::new("Value")]));

        let rows = [
            ("Rule", self.rule.clone()),
            ("Trading Days", format!("{}", self.days)),
            ("Initial Capital", format!("{:.2}", self.initial_capital)),
            (
                "Final Asset",
                format!("{:.2} ({:.2}%)", self.final_asset, self.total_return_pct),
            ),
            (
                "Max Asset",
                format!(
                    "{:.2} on {} ({:.2}%)",
                    self.max_asset, self.max_asset_date, self.max_benefit_pct
                ),
            ),
            (
                "Min Asset",
                format!(
                    "{:.2} on {} ({:.2}%)",
                    self.min_asset, self.min_asset_date, self.min_benefit_pct
                ),
            ),
            ("Max Drawdown", format!("{:.2}%", self.max_drawdown * 100.0)),
            ("Sharpe Ratio", format!("{:.3}", self.sharpe_ratio)),
            ("Exposure", format!("{:.2}%", self.exposure * 100.0)),
            ("Max Contracts", format!("{}", self.max_contracts)),
            ("Max Lever Ratio", format!("{:.3}", self.max_lever_ratio)),
        ];

        for (name, value) in rows {
            table.add_row(Row::new(vec![Cell::new(name), Cell::new(&value)]));
        }

        table.printstd();
    }
}

//side-by-side table of several runs, failed runs show their error
pub fn comparison_table(runs: &IndexMap<RuleType, Result<RunSummary, String>>) -> Table {
    let mut table = Table::new();

    table.add_row(Row::new(vec![
        Cell::new("Rule"),
        Cell::new("Final Asset"),
        Cell::new("Return"),
        Cell::new("Max Drawdown"),
        Cell::new("Sharpe"),
        Cell::new("Exposure"),
        Cell::new("Max Contracts"),
    ]));

    for (rule, run) in runs {
        let cells = match run {
            Ok(s) => vec![
                Cell::new(rule.name()),
                Cell::new(&format!("{:.2}", s.final_asset)),
                Cell::new(&format!("{:.2}%", s.total_return_pct)),
                Cell::new(&format!("{:.2}%", s.max_drawdown * 100.0)),
                Cell::new(&format!("{:.3}", s.sharpe_ratio)),
                Cell::new(&format!("{:.2}%", s.exposure * 100.0)),
                Cell::new(&format!("{}", s.max_contracts)),
            ],
            Err(e) => vec![Cell::new(rule.name()), Cell::new(&format!("failed: {}", e))],
        };
        table.add_row(Row::new(cells));
    }

    table
}

fn calculate_sharpe_ratio(returns: &[f64]) -> f64 {
    if returns.len() < 2 {
        return 0.0;
    }

    let mean = returns.mean();
    let std_dev = returns.std_dev();

    if std_dev == 0.0 || !std_dev.is_finite() {
        return 0.0;
    }

    //annualize assuming daily returns
    (mean / std_dev) * (252.0_f64).sqrt()
}
