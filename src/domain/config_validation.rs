//! Configuration validation.
//!
//! Validates all config fields before any data is fetched, so a bad config
//! fails fast instead of mid-run.

use std::collections::HashSet;

use chrono::NaiveDate;

use crate::domain::error::TurtleError;
use crate::ports::config_port::ConfigPort;

pub fn validate_config(config: &dyn ConfigPort) -> Result<(), TurtleError> {
    validate_initial_capital(config)?;
    validate_contract_size(config)?;
    validate_commission_rate(config)?;
    validate_slippage_rate(config)?;
    validate_dates(config)?;
    validate_symbols(config)?;
    validate_max_concurrent_fetches(config)?;
    validate_windows(config)?;
    validate_atr_multiplier(config)?;
    validate_risk_percent(config)?;
    Ok(())
}

/// Comma-separated symbol list: tokens trimmed and uppercased, empty tokens
/// and duplicates rejected.
pub fn parse_symbols(input: &str) -> Result<Vec<String>, TurtleError> {
    let mut symbols = Vec::new();
    let mut seen = HashSet::new();

    for token in input.split(',') {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(TurtleError::ConfigInvalid {
                section: "backtest".to_string(),
                key: "symbols".to_string(),
                reason: "empty token in symbol list".to_string(),
            });
        }
        let symbol = trimmed.to_uppercase();
        if seen.contains(&symbol) {
            return Err(TurtleError::ConfigInvalid {
                section: "backtest".to_string(),
                key: "symbols".to_string(),
                reason: format!("duplicate symbol: {}", symbol),
            });
        }
        seen.insert(symbol.clone());
        symbols.push(symbol);
    }

    Ok(symbols)
}

fn validate_initial_capital(config: &dyn ConfigPort) -> Result<(), TurtleError> {
    let value = config.get_double("backtest", "initial_capital", 0.0);
    if value <= 0.0 {
        return Err(TurtleError::ConfigInvalid {
            section: "backtest".to_string(),
            key: "initial_capital".to_string(),
            reason: "initial_capital must be positive".to_string(),
        });
    }
    Ok(())
}

fn validate_contract_size(config: &dyn ConfigPort) -> Result<(), TurtleError> {
    let value = config.get_double("backtest", "contract_size", 1.0);
    if value <= 0.0 {
        return Err(TurtleError::ConfigInvalid {
            section: "backtest".to_string(),
            key: "contract_size".to_string(),
            reason: "contract_size must be positive".to_string(),
        });
    }
    Ok(())
}

fn validate_commission_rate(config: &dyn ConfigPort) -> Result<(), TurtleError> {
    let value = config.get_double("backtest", "commission_rate", 0.0);
    if value < 0.0 {
        return Err(TurtleError::ConfigInvalid {
            section: "backtest".to_string(),
            key: "commission_rate".to_string(),
            reason: "commission_rate must be non-negative".to_string(),
        });
    }
    Ok(())
}

fn validate_slippage_rate(config: &dyn ConfigPort) -> Result<(), TurtleError> {
    let value = config.get_double("backtest", "slippage_rate", 0.0);
    if value < 0.0 {
        return Err(TurtleError::ConfigInvalid {
            section: "backtest".to_string(),
            key: "slippage_rate".to_string(),
            reason: "slippage_rate must be non-negative".to_string(),
        });
    }
    Ok(())
}

fn validate_dates(config: &dyn ConfigPort) -> Result<(), TurtleError> {
    let start_str = config.get_string("backtest", "start_date");
    let end_str = config.get_string("backtest", "end_date");

    let start_date = parse_date(start_str.as_deref(), "start_date")?;
    let end_date = parse_date(end_str.as_deref(), "end_date")?;

    if start_date >= end_date {
        return Err(TurtleError::ConfigInvalid {
            section: "backtest".to_string(),
            key: "start_date".to_string(),
            reason: "start_date must be before end_date".to_string(),
        });
    }
    Ok(())
}

fn parse_date(value: Option<&str>, field: &str) -> Result<NaiveDate, TurtleError> {
    match value {
        None => Err(TurtleError::ConfigMissing {
            section: "backtest".to_string(),
            key: field.to_string(),
        }),
        Some(s) => {
            NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| TurtleError::ConfigInvalid {
                section: "backtest".to_string(),
                key: field.to_string(),
                reason: format!("invalid {} format, expected YYYY-MM-DD", field),
            })
        }
    }
}

fn validate_symbols(config: &dyn ConfigPort) -> Result<(), TurtleError> {
    let list = config
        .get_string("backtest", "symbols")
        .or_else(|| config.get_string("backtest", "symbol"));
    match list {
        Some(s) if !s.trim().is_empty() => parse_symbols(&s).map(|_| ()),
        _ => Err(TurtleError::ConfigMissing {
            section: "backtest".to_string(),
            key: "symbols".to_string(),
        }),
    }
}

fn validate_max_concurrent_fetches(config: &dyn ConfigPort) -> Result<(), TurtleError> {
    let value = config.get_int("backtest", "max_concurrent_fetches", 4);
    if value < 1 {
        return Err(TurtleError::ConfigInvalid {
            section: "backtest".to_string(),
            key: "max_concurrent_fetches".to_string(),
            reason: "max_concurrent_fetches must be at least 1".to_string(),
        });
    }
    Ok(())
}

fn validate_windows(config: &dyn ConfigPort) -> Result<(), TurtleError> {
    for key in ["entry_window", "exit_window", "atr_window"] {
        let default = match key {
            "entry_window" => 20,
            "exit_window" => 10,
            _ => 20,
        };
        let value = config.get_int("strategy", key, default);
        if value < 2 {
            return Err(TurtleError::ConfigInvalid {
                section: "strategy".to_string(),
                key: key.to_string(),
                reason: format!("{} must be at least 2", key),
            });
        }
    }
    Ok(())
}

fn validate_atr_multiplier(config: &dyn ConfigPort) -> Result<(), TurtleError> {
    let value = config.get_double("strategy", "atr_multiplier", 2.0);
    if value <= 0.0 {
        return Err(TurtleError::ConfigInvalid {
            section: "strategy".to_string(),
            key: "atr_multiplier".to_string(),
            reason: "atr_multiplier must be positive".to_string(),
        });
    }
    Ok(())
}

fn validate_risk_percent(config: &dyn ConfigPort) -> Result<(), TurtleError> {
    let value = config.get_double("strategy", "risk_percent", 0.01);
    if value <= 0.0 || value > 1.0 {
        return Err(TurtleError::ConfigInvalid {
            section: "strategy".to_string(),
            key: "risk_percent".to_string(),
            reason: "risk_percent must be between 0 and 1".to_string(),
        });
    }
    Ok(())
}
