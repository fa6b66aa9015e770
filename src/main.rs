use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use futsize::metrics::summary::comparison_table;
use futsize::prelude::*;
use indexmap::IndexMap;
use rayon::prelude::*;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "futsize")]
#[command(about = "Position sizing simulator for single-instrument futures", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    //simulate one sizing rule
    Run {
        //path to json configuration (defaults used when absent)
        #[arg(long)]
        config: Option<PathBuf>,

        //path to csv price file, overrides the configuration
        #[arg(long)]
        data: Option<PathBuf>,

        //sizing rule (ff, equity, fr, vol, trend), default parameters for it
        #[arg(long)]
        rule: Option<String>,

        //initial capital, overrides the configuration
        #[arg(long)]
        initial_capital: Option<f64>,

        //output path for the result table csv
        #[arg(long)]
        output_csv: Option<PathBuf>,
    },
    //simulate every sizing rule over the same data
    Compare {
        #[arg(long)]
        config: Option<PathBuf>,

        #[arg(long)]
        data: Option<PathBuf>,
    },
    //write the default configuration as json
    InitConfig {
        #[arg(long, default_value = "futsize.json")]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            data,
            rule,
            initial_capital,
            output_csv,
        } => {
            let mut configuration = load_configuration(config, data)?;

            if let Some(rule_name) = rule {
                let rule_type = RuleType::parse(&rule_name)
                    .ok_or_else(|| anyhow::anyhow!("Unknown rule: {}", rule_name))?;
                if rule_type != configuration.rule_type() {
                    configuration.rule_params = RuleParams::default_for(rule_type);
                }
            }
            if let Some(capital) = initial_capital {
                configuration.initial_capital = capital;
            }
            if output_csv.is_some() {
                configuration.output_csv = output_csv;
            }

            run_simulation(&configuration)?;
        }
        Commands::Compare { config, data } => {
            let configuration = load_configuration(config, data)?;
            compare_rules(&configuration)?;
        }
        Commands::InitConfig { output } => {
            SimulationConfiguration::default()
                .to_json_file(&output)
                .context(format!("Failed to write configuration to {:?}", output))?;
            println!("Default configuration written to {:?}", output);
        }
    }

    Ok(())
}

fn load_configuration(
    config_path: Option<PathBuf>,
    data: Option<PathBuf>,
) -> Result<SimulationConfiguration> {
    let mut configuration = match config_path {
        Some(path) => SimulationConfiguration::from_json_file(&path)
            .context(format!("Failed to load configuration from {:?}", path))?,
        None => SimulationConfiguration::default(),
    };

    if let Some(data) = data {
        configuration.data_path = data;
    }

    configuration
        .validate()
        .context("Invalid run parameters")?;

    Ok(configuration)
}

fn load_series(configuration: &SimulationConfiguration) -> Result<PriceSeries> {
    println!("Loading data from {:?}...", configuration.data_path);
    let series = load_csv(&configuration.data_path, &configuration.columns).context(format!(
        "Failed to load data from {:?}",
        configuration.data_path
    ))?;

    println!("Loaded {} observations", series.len());
    println!(
        "Date range: {} to {}\n",
        series.first_date(),
        series.last_date()
    );

    Ok(series)
}

fn run_simulation(configuration: &SimulationConfiguration) -> Result<()> {
    println!("Futsize Position Sizing Simulator");
    println!("=================================\n");

    let series = load_series(configuration)?;

    let contract = &configuration.contract;
    println!(
        "Contract: {} (multiplier: {}, margin ratio: {})",
        contract.symbol, contract.contract_multiplier, contract.margin_ratio
    );
    println!("Rule: {}", configuration.rule_type());
    println!("Parameters: {}", configuration.rule_params.describe());
    println!("Initial capital: {:.2}\n", configuration.initial_capital);

    let table = simulate(configuration, &series)?;

    println!("Simulation Results");
    println!("==================\n");
    match RunSummary::from_table(&table, configuration.initial_capital) {
        Some(summary) => summary.pretty_print_table(),
        None => println!("No simulated days"),
    }

    if let Some(path) = &configuration.output_csv {
        table.write_csv(path)?;
        println!("\nResult table saved to {:?}", path);
    }

    Ok(())
}

fn compare_rules(configuration: &SimulationConfiguration) -> Result<()> {
    println!("Futsize Rule Comparison");
    println!("=======================\n");

    let series = load_series(configuration)?;
    let configured = configuration.rule_type();

    //each run owns its rule and state, only the price series is shared
    let runs: Vec<(RuleType, Result<RunSummary, String>)> = RuleType::ALL[..]
        .par_iter()
        .map(|&rule_type| {
            let params = if rule_type == configured {
                configuration.rule_params.clone()
            } else {
                RuleParams::default_for(rule_type)
            };
            let run_config = configuration.with_rule(params);

            let summary = simulate(&run_config, &series)
                .map_err(|e| e.to_string())
                .and_then(|table| {
                    RunSummary::from_table(&table, run_config.initial_capital)
                        .ok_or_else(|| "no simulated days".to_string())
                });
            (rule_type, summary)
        })
        .collect();

    let runs: IndexMap<RuleType, Result<RunSummary, String>> = runs.into_iter().collect();
    comparison_table(&runs).printstd();

    Ok(())
}
