//! CLI definition and dispatch.

use std::path::PathBuf;
use std::process::ExitCode;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::fetch::fetch_many;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::backtest::{BacktestConfig, BacktestResult, run_backtest_many};
use crate::domain::config_validation::{parse_symbols, validate_config};
use crate::domain::error::TurtleError;
use crate::domain::ledger::CostModel;
use crate::domain::strategy::TurtleParams;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;

#[derive(Parser, Debug)]
#[command(name = "turtletrader", about = "Turtle channel-breakout backtester")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a backtest over the configured symbols
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        /// Backtest a single symbol instead of the configured list
        #[arg(long)]
        symbol: Option<String>,
        /// Override the CSV data directory from the config
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },
    /// List symbols available in the data directory
    ListSymbols {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },
    /// Show data range for configured symbol(s)
    Info {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        symbol: Option<String>,
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Backtest {
            config,
            symbol,
            data_dir,
        } => run_backtest_cmd(&config, symbol.as_deref(), data_dir),
        Command::ListSymbols { config, data_dir } => run_list_symbols(config.as_ref(), data_dir),
        Command::Info {
            config,
            symbol,
            data_dir,
        } => run_info(&config, symbol.as_deref(), data_dir),
        Command::Validate { config } => run_validate(&config),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        eprintln!("error: {e}");
        ExitCode::from(&e)
    })
}

/// Strategy parameters from the `[strategy]` section; absent keys take the
/// classic turtle defaults.
pub fn build_params(config: &dyn ConfigPort) -> TurtleParams {
    let defaults = TurtleParams::default();
    TurtleParams {
        entry_window: config.get_int("strategy", "entry_window", defaults.entry_window as i64)
            as usize,
        exit_window: config.get_int("strategy", "exit_window", defaults.exit_window as i64)
            as usize,
        atr_window: config.get_int("strategy", "atr_window", defaults.atr_window as i64) as usize,
        atr_multiplier: config.get_double("strategy", "atr_multiplier", defaults.atr_multiplier),
        risk_percent: config.get_double("strategy", "risk_percent", defaults.risk_percent),
    }
}

pub fn build_backtest_config(config: &dyn ConfigPort) -> BacktestConfig {
    BacktestConfig {
        initial_capital: config.get_double("backtest", "initial_capital", 100_000.0),
        contract_size: config.get_double("backtest", "contract_size", 1.0),
        cost_model: CostModel {
            commission_rate: config.get_double("backtest", "commission_rate", 0.0),
            slippage_rate: config.get_double("backtest", "slippage_rate", 0.0),
        },
    }
}

fn parse_config_date(config: &dyn ConfigPort, key: &str) -> Result<NaiveDate, TurtleError> {
    let value = config
        .get_string("backtest", key)
        .ok_or_else(|| TurtleError::ConfigMissing {
            section: "backtest".into(),
            key: key.into(),
        })?;
    NaiveDate::parse_from_str(&value, "%Y-%m-%d").map_err(|_| TurtleError::ConfigInvalid {
        section: "backtest".into(),
        key: key.into(),
        reason: "invalid date format (expected YYYY-MM-DD)".into(),
    })
}

/// `--symbol` overrides the configured list.
pub fn resolve_symbols(
    symbol_override: Option<&str>,
    config: &dyn ConfigPort,
) -> Result<Vec<String>, TurtleError> {
    if let Some(s) = symbol_override {
        return parse_symbols(s);
    }
    match config
        .get_string("backtest", "symbols")
        .or_else(|| config.get_string("backtest", "symbol"))
    {
        Some(s) => parse_symbols(&s),
        None => Err(TurtleError::ConfigMissing {
            section: "backtest".into(),
            key: "symbols".into(),
        }),
    }
}

/// `--data-dir` overrides the `data_dir` config key.
fn resolve_data_dir(
    data_dir_override: Option<PathBuf>,
    config: &dyn ConfigPort,
) -> Result<PathBuf, TurtleError> {
    if let Some(dir) = data_dir_override {
        return Ok(dir);
    }
    config
        .get_string("backtest", "data_dir")
        .map(PathBuf::from)
        .ok_or_else(|| TurtleError::ConfigMissing {
            section: "backtest".into(),
            key: "data_dir".into(),
        })
}

fn run_backtest_cmd(
    config_path: &PathBuf,
    symbol_override: Option<&str>,
    data_dir_override: Option<PathBuf>,
) -> ExitCode {
    // Stage 1: Load and validate config
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    if let Err(e) = validate_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    // Stage 2: Resolve run settings
    let params = build_params(&adapter);
    let bt_config = build_backtest_config(&adapter);

    let (start_date, end_date) = match (
        parse_config_date(&adapter, "start_date"),
        parse_config_date(&adapter, "end_date"),
    ) {
        (Ok(s), Ok(e)) => (s, e),
        (Err(e), _) | (_, Err(e)) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let symbols = match resolve_symbols(symbol_override, &adapter) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let data_dir = match resolve_data_dir(data_dir_override, &adapter) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let max_concurrent = adapter.get_int("backtest", "max_concurrent_fetches", 4).max(1) as usize;

    // Stage 3: Fetch data
    eprintln!(
        "Fetching {} symbols from {} ({} to {})",
        symbols.len(),
        data_dir.display(),
        start_date,
        end_date,
    );
    let data_port = CsvAdapter::new(data_dir);
    let data = fetch_many(&data_port, &symbols, start_date, end_date, max_concurrent);

    if data.is_empty() {
        eprintln!("error: no symbols with data to backtest");
        return ExitCode::from(5);
    }

    // Stage 4: Run the backtest
    eprintln!("Running backtest: {} of {} symbols", data.len(), symbols.len());
    let results = run_backtest_many(&data, &params, &bt_config);

    // Stage 5: Print per-symbol report, in the configured symbol order
    for symbol in &symbols {
        if let Some(result) = results.get(symbol) {
            print_result(result);
        }
    }

    ExitCode::SUCCESS
}

fn print_result(result: &BacktestResult) {
    println!("=== {} ===", result.symbol);

    match result.performance() {
        Some(summary) => {
            for (key, value) in summary.entries() {
                println!("{:<22} {}", key, value);
            }
        }
        None => {
            println!("{:<22} {:.2}", "initial_capital", result.initial_capital);
            println!("{:<22} {:.2}", "final_capital", result.final_capital);
            println!("no trades generated");
        }
    }

    const MAX_SHOWN: usize = 5;
    if !result.trades.is_empty() {
        println!("trades (showing {} of {}):", MAX_SHOWN.min(result.trades.len()), result.trades.len());
        for trade in result.trades.iter().take(MAX_SHOWN) {
            let side = if trade.signed_position > 0.0 { "long" } else { "short" };
            println!(
                "  {} -> {}  {:<5} qty {:.2}  entry {:.2} exit {:.2}  profit {:+.2} ({:+.2}%)",
                trade.entry_date,
                trade.exit_date,
                side,
                trade.signed_position.abs(),
                trade.entry_price,
                trade.exit_price,
                trade.profit,
                trade.return_pct,
            );
        }
    }
    println!();
}

fn run_list_symbols(config_path: Option<&PathBuf>, data_dir_override: Option<PathBuf>) -> ExitCode {
    let data_dir = match (data_dir_override, config_path) {
        (Some(dir), _) => dir,
        (None, Some(path)) => {
            let config = match load_config(path) {
                Ok(c) => c,
                Err(code) => return code,
            };
            match resolve_data_dir(None, &config) {
                Ok(d) => d,
                Err(e) => {
                    eprintln!("error: {e}");
                    return (&e).into();
                }
            }
        }
        (None, None) => {
            eprintln!("error: --data-dir or --config is required for list-symbols");
            return ExitCode::from(1);
        }
    };

    let adapter = CsvAdapter::new(data_dir);
    let symbols = match adapter.list_symbols() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    if symbols.is_empty() {
        eprintln!("No symbols found");
    } else {
        for symbol in &symbols {
            println!("{}", symbol);
        }
        eprintln!("{} symbols found", symbols.len());
    }
    ExitCode::SUCCESS
}

fn run_info(
    config_path: &PathBuf,
    symbol_override: Option<&str>,
    data_dir_override: Option<PathBuf>,
) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let symbols = match resolve_symbols(symbol_override, &config) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let data_dir = match resolve_data_dir(data_dir_override, &config) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let adapter = CsvAdapter::new(data_dir);
    for symbol in &symbols {
        match adapter.get_data_range(symbol) {
            Ok(Some((min_date, max_date, count))) => {
                println!("{}: {} bars, {} to {}", symbol, count, min_date, max_date);
            }
            Ok(None) => {
                eprintln!("{}: no data found", symbol);
            }
            Err(e) => {
                eprintln!("error querying {}: {}", symbol, e);
            }
        }
    }
    ExitCode::SUCCESS
}

fn run_validate(config_path: &PathBuf) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = validate_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    let params = build_params(&adapter);
    eprintln!("\nStrategy parameters:");
    eprintln!("  entry_window:   {}", params.entry_window);
    eprintln!("  exit_window:    {}", params.exit_window);
    eprintln!("  atr_window:     {}", params.atr_window);
    eprintln!("  atr_multiplier: {}", params.atr_multiplier);
    eprintln!("  risk_percent:   {}", params.risk_percent);

    match resolve_symbols(None, &adapter) {
        Ok(symbols) => eprintln!("  symbols:        {}", symbols.join(", ")),
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    }

    eprintln!("\nConfiguration is valid");
    ExitCode::SUCCESS
}
