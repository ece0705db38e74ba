//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::svg_report_adapter::{format_summary, SvgReportAdapter};
use crate::domain::backtest::{self, StrategyConfig};
use crate::domain::config_validation::{
    parse_date, validate_backtest_config, validate_strategy_config,
};
use crate::domain::error::SmacrossError;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::PricePort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "smacross", about = "SMA-crossover strategy backtester")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a backtest
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        /// Write the signal chart to this SVG file
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long)]
        symbol: Option<String>,
        #[arg(long)]
        dry_run: bool,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// List symbols available in the data directory
    ListSymbols {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Show the data range on disk for a symbol
    Info {
        #[arg(long)]
        symbol: String,
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Backtest {
            config,
            output,
            symbol,
            dry_run,
        } => run_backtest(&config, output.as_deref(), symbol.as_deref(), dry_run),
        Command::Validate { config } => run_validate(&config),
        Command::ListSymbols { config } => run_list_symbols(&config),
        Command::Info { symbol, config } => run_info(&symbol, &config),
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = SmacrossError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

/// Assemble the validated per-run parameter record from config.
pub fn build_config(
    adapter: &dyn ConfigPort,
    symbol_override: Option<&str>,
) -> Result<StrategyConfig, SmacrossError> {
    let symbol = match symbol_override {
        Some(s) => s.to_string(),
        None => adapter.get_string("backtest", "symbol").ok_or_else(|| {
            SmacrossError::ConfigMissing {
                section: "backtest".into(),
                key: "symbol".into(),
            }
        })?,
    };

    let start_str = adapter.get_string("backtest", "start_date");
    let end_str = adapter.get_string("backtest", "end_date");
    let start_date = parse_date(start_str.as_deref(), "start_date")?;
    let end_date = parse_date(end_str.as_deref(), "end_date")?;

    Ok(StrategyConfig {
        symbol,
        start_date,
        end_date,
        short_window: adapter.get_int("strategy", "short_window", 0) as usize,
        long_window: adapter.get_int("strategy", "long_window", 0) as usize,
        initial_cash: adapter.get_double("backtest", "initial_cash", 0.0),
        max_shares_per_buy: adapter.get_int("strategy", "max_shares_per_buy", 0),
    })
}

/// Data directory configured under `[data] csv_dir` (default `stockdata`).
pub fn resolve_csv_dir(adapter: &dyn ConfigPort) -> PathBuf {
    adapter
        .get_string("data", "csv_dir")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("stockdata"))
}

fn run_backtest(
    config_path: &Path,
    output_path: Option<&Path>,
    symbol_override: Option<&str>,
    dry_run: bool,
) -> ExitCode {
    // Stage 1: Load and validate config
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = validate_backtest_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }
    if let Err(e) = validate_strategy_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    // Stage 2: Build the strategy parameters
    let config = match build_config(&adapter, symbol_override) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    if dry_run {
        println!(
            "{}: {} to {}, SMA {}/{}, initial cash {:.2}, max {} shares per buy",
            config.symbol,
            config.start_date,
            config.end_date,
            config.short_window,
            config.long_window,
            config.initial_cash,
            config.max_shares_per_buy,
        );
        return ExitCode::SUCCESS;
    }

    // Stages 3-5: Load prices, run, report
    let data_port = CsvAdapter::new(resolve_csv_dir(&adapter));
    run_backtest_pipeline(&data_port, &config, output_path)
}

/// Fetch prices, run the engine and simulator, print the summary, and
/// optionally render the chart. Split out so tests can drive it with a
/// mock data port.
pub fn run_backtest_pipeline(
    data_port: &dyn PricePort,
    config: &StrategyConfig,
    output_path: Option<&Path>,
) -> ExitCode {
    eprintln!(
        "Fetching {} from {} to {}",
        config.symbol, config.start_date, config.end_date
    );
    let bars = match data_port.fetch_prices(&config.symbol, config.start_date, config.end_date) {
        Ok(b) => b,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    if bars.is_empty() {
        let err = SmacrossError::NoData {
            symbol: config.symbol.clone(),
        };
        eprintln!("error: {err}");
        return (&err).into();
    }

    eprintln!("Running backtest over {} bars", bars.len());
    let result = match backtest::run_backtest(&bars, config) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    print!("{}", format_summary(&result));

    if let Some(path) = output_path {
        let reporter = SvgReportAdapter::new();
        if let Err(e) = reporter.write(&result, config, path) {
            eprintln!("error: {e}");
            return (&e).into();
        }
        eprintln!("Wrote chart to {}", path.display());
    }

    ExitCode::SUCCESS
}

fn run_validate(config_path: &Path) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = validate_backtest_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }
    if let Err(e) = validate_strategy_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    println!("Configuration is valid.");
    ExitCode::SUCCESS
}

fn run_list_symbols(config_path: &Path) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let data_port = CsvAdapter::new(resolve_csv_dir(&adapter));
    match data_port.list_symbols() {
        Ok(symbols) => {
            for symbol in symbols {
                println!("{symbol}");
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn run_info(symbol: &str, config_path: &Path) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let data_port = CsvAdapter::new(resolve_csv_dir(&adapter));
    match data_port.get_data_range(symbol) {
        Ok(Some((first, last, count))) => {
            println!("{symbol}: {count} bars from {first} to {last}");
            ExitCode::SUCCESS
        }
        Ok(None) => {
            let err = SmacrossError::NoData {
                symbol: symbol.to_string(),
            };
            eprintln!("error: {err}");
            (&err).into()
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}
