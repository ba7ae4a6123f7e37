//! Configuration validation.
//!
//! Validates the `[ledger]`, `[forecast]` and `[data]` sections before any
//! command runs. Missing optional keys fall back to their defaults.

use crate::domain::error::StockcastError;
use crate::domain::ledger::DEFAULT_STARTING_CASH;
use crate::domain::range_params::DisplayRange;
use crate::ports::config_port::ConfigPort;

pub const DEFAULT_RANGE: &str = "1M";

pub fn validate_ledger_config(config: &dyn ConfigPort) -> Result<(), StockcastError> {
    validate_starting_cash(config)
}

pub fn validate_forecast_config(config: &dyn ConfigPort) -> Result<(), StockcastError> {
    validate_range(config)?;
    validate_sentiment(config)?;
    validate_horizon_divisor(config)?;
    Ok(())
}

pub fn validate_data_config(config: &dyn ConfigPort) -> Result<(), StockcastError> {
    match config.get_string("data", "path") {
        Some(s) if !s.trim().is_empty() => Ok(()),
        _ => Err(StockcastError::ConfigMissing {
            section: "data".to_string(),
            key: "path".to_string(),
        }),
    }
}

fn validate_starting_cash(config: &dyn ConfigPort) -> Result<(), StockcastError> {
    let value = config.get_double("ledger", "starting_cash", DEFAULT_STARTING_CASH);
    if !value.is_finite() || value <= 0.0 {
        return Err(StockcastError::ConfigInvalid {
            section: "ledger".to_string(),
            key: "starting_cash".to_string(),
            reason: "starting_cash must be positive".to_string(),
        });
    }
    Ok(())
}

fn validate_range(config: &dyn ConfigPort) -> Result<(), StockcastError> {
    let Some(label) = config.get_string("forecast", "range") else {
        return Ok(());
    };
    label
        .parse::<DisplayRange>()
        .map(|_| ())
        .map_err(|_| StockcastError::ConfigInvalid {
            section: "forecast".to_string(),
            key: "range".to_string(),
            reason: format!("unknown range '{label}' (expected 1W, 1M, 3M, 6M, 1Y, 5Y or MAX)"),
        })
}

fn validate_sentiment(config: &dyn ConfigPort) -> Result<(), StockcastError> {
    let value = config.get_double("forecast", "sentiment", 0.0);
    if !(-1.0..=1.0).contains(&value) {
        return Err(StockcastError::ConfigInvalid {
            section: "forecast".to_string(),
            key: "sentiment".to_string(),
            reason: "sentiment must be between -1 and 1".to_string(),
        });
    }
    Ok(())
}

fn validate_horizon_divisor(config: &dyn ConfigPort) -> Result<(), StockcastError> {
    let value = config.get_int("forecast", "horizon_divisor", 5);
    if value < 1 {
        return Err(StockcastError::ConfigInvalid {
            section: "forecast".to_string(),
            key: "horizon_divisor".to_string(),
            reason: "horizon_divisor must be at least 1".to_string(),
        });
    }
    Ok(())
}
