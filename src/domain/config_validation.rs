//! Configuration validation.
//!
//! Every field is checked before a backtest runs; the first bad value fails
//! the run with a config error.

use crate::domain::error::SmacrossError;
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;

pub fn validate_backtest_config(config: &dyn ConfigPort) -> Result<(), SmacrossError> {
    validate_symbol(config)?;
    validate_dates(config)?;
    validate_initial_cash(config)?;
    Ok(())
}

pub fn validate_strategy_config(config: &dyn ConfigPort) -> Result<(), SmacrossError> {
    validate_window(config, "short_window")?;
    validate_window(config, "long_window")?;
    validate_max_shares(config)?;
    Ok(())
}

fn validate_symbol(config: &dyn ConfigPort) -> Result<(), SmacrossError> {
    match config.get_string("backtest", "symbol") {
        Some(s) if !s.trim().is_empty() => Ok(()),
        _ => Err(SmacrossError::ConfigMissing {
            section: "backtest".to_string(),
            key: "symbol".to_string(),
        }),
    }
}

fn validate_dates(config: &dyn ConfigPort) -> Result<(), SmacrossError> {
    let start_str = config.get_string("backtest", "start_date");
    let end_str = config.get_string("backtest", "end_date");

    let start_date = parse_date(start_str.as_deref(), "start_date")?;
    let end_date = parse_date(end_str.as_deref(), "end_date")?;

    if start_date >= end_date {
        return Err(SmacrossError::ConfigInvalid {
            section: "backtest".to_string(),
            key: "start_date".to_string(),
            reason: "start_date must be before end_date".to_string(),
        });
    }
    Ok(())
}

pub fn parse_date(value: Option<&str>, field: &str) -> Result<NaiveDate, SmacrossError> {
    match value {
        None => Err(SmacrossError::ConfigMissing {
            section: "backtest".to_string(),
            key: field.to_string(),
        }),
        Some(s) => {
            NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| SmacrossError::ConfigInvalid {
                section: "backtest".to_string(),
                key: field.to_string(),
                reason: format!("invalid {} format, expected YYYY-MM-DD", field),
            })
        }
    }
}

fn validate_initial_cash(config: &dyn ConfigPort) -> Result<(), SmacrossError> {
    let value = config.get_double("backtest", "initial_cash", 0.0);
    if value <= 0.0 {
        return Err(SmacrossError::ConfigInvalid {
            section: "backtest".to_string(),
            key: "initial_cash".to_string(),
            reason: "initial_cash must be positive".to_string(),
        });
    }
    Ok(())
}

// long_window > short_window is conventional but deliberately not enforced.
fn validate_window(config: &dyn ConfigPort, key: &str) -> Result<(), SmacrossError> {
    let value = config.get_int("strategy", key, 0);
    if value < 1 {
        return Err(SmacrossError::ConfigInvalid {
            section: "strategy".to_string(),
            key: key.to_string(),
            reason: format!("{} must be a positive integer", key),
        });
    }
    Ok(())
}

fn validate_max_shares(config: &dyn ConfigPort) -> Result<(), SmacrossError> {
    let value = config.get_int("strategy", "max_shares_per_buy", 0);
    if value < 1 {
        return Err(SmacrossError::ConfigInvalid {
            section: "strategy".to_string(),
            key: "max_shares_per_buy".to_string(),
            reason: "max_shares_per_buy must be a positive integer".to_string(),
        });
    }
    Ok(())
}
