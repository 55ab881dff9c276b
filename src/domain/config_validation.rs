//! Configuration validation.
//!
//! Runs on the fully resolved configs (file values plus CLI overrides)
//! before any data is loaded.

use crate::domain::backtest::BacktestConfig;
use crate::domain::error::TraderError;
use crate::domain::strategy::TechnicalConfig;

/// One century of calendar days.
pub const MAX_WARMUP_DAYS: i64 = 36_500;

pub fn validate_backtest_config(config: &BacktestConfig) -> Result<(), TraderError> {
    validate_symbol(config)?;
    validate_dates(config)?;
    validate_starting_cash(config)?;
    validate_costs(config)?;
    validate_analysis(config)?;
    Ok(())
}

pub fn validate_technical_config(config: &TechnicalConfig) -> Result<(), TraderError> {
    validate_rsi(config)?;
    validate_macd(config)?;
    validate_bollinger(config)?;
    if !(0..=MAX_WARMUP_DAYS).contains(&config.warmup_days) {
        return Err(TraderError::invalid(
            "technical",
            "warmup_days",
            format!("warmup_days must be in [0, {MAX_WARMUP_DAYS}]"),
        ));
    }
    Ok(())
}

fn validate_symbol(config: &BacktestConfig) -> Result<(), TraderError> {
    if config.symbol.trim().is_empty() {
        return Err(TraderError::ConfigMissing {
            section: "backtest".to_string(),
            key: "symbol".to_string(),
        });
    }
    Ok(())
}

fn validate_dates(config: &BacktestConfig) -> Result<(), TraderError> {
    if config.start_date > config.end_date {
        return Err(TraderError::invalid(
            "backtest",
            "start_date",
            format!(
                "start_date {} is after end_date {}",
                config.start_date, config.end_date
            ),
        ));
    }
    Ok(())
}

fn validate_starting_cash(config: &BacktestConfig) -> Result<(), TraderError> {
    if !(config.starting_cash > 0.0) || !config.starting_cash.is_finite() {
        return Err(TraderError::invalid(
            "backtest",
            "starting_cash",
            "starting_cash must be positive",
        ));
    }
    Ok(())
}

fn validate_costs(config: &BacktestConfig) -> Result<(), TraderError> {
    if !(config.fixed_cost >= 0.0) {
        return Err(TraderError::invalid(
            "backtest",
            "fixed_cost",
            "fixed_cost must be non-negative",
        ));
    }
    if !(config.floating_cost >= 0.0) {
        return Err(TraderError::invalid(
            "backtest",
            "floating_cost",
            "floating_cost must be non-negative",
        ));
    }
    Ok(())
}

fn validate_analysis(config: &BacktestConfig) -> Result<(), TraderError> {
    if !(config.annualization_factor > 0.0) {
        return Err(TraderError::invalid(
            "backtest",
            "annualization_factor",
            "annualization_factor must be positive",
        ));
    }
    if !config.risk_free_rate.is_finite() {
        return Err(TraderError::invalid(
            "backtest",
            "risk_free_rate",
            "risk_free_rate must be a finite number",
        ));
    }
    Ok(())
}

fn validate_rsi(config: &TechnicalConfig) -> Result<(), TraderError> {
    if config.rsi_period == 0 {
        return Err(TraderError::invalid(
            "technical",
            "rsi_period",
            "rsi_period must be at least 1",
        ));
    }
    for (key, value) in [
        ("rsi_overbought", config.rsi_overbought),
        ("rsi_oversold", config.rsi_oversold),
    ] {
        if !(0.0..=100.0).contains(&value) {
            return Err(TraderError::invalid(
                "technical",
                key,
                format!("{key} must be between 0 and 100"),
            ));
        }
    }
    if config.rsi_oversold >= config.rsi_overbought {
        return Err(TraderError::invalid(
            "technical",
            "rsi_oversold",
            "rsi_oversold must be below rsi_overbought",
        ));
    }
    Ok(())
}

fn validate_macd(config: &TechnicalConfig) -> Result<(), TraderError> {
    if config.macd_fast == 0 {
        return Err(TraderError::invalid(
            "technical",
            "macd_fast",
            "macd_fast must be at least 1",
        ));
    }
    if config.macd_fast >= config.macd_slow {
        return Err(TraderError::invalid(
            "technical",
            "macd_slow",
            "macd_slow must be greater than macd_fast",
        ));
    }
    if !config.macd_threshold.is_finite() {
        return Err(TraderError::invalid(
            "technical",
            "macd_threshold",
            "macd_threshold must be a finite number",
        ));
    }
    Ok(())
}

fn validate_bollinger(config: &TechnicalConfig) -> Result<(), TraderError> {
    if config.bollinger_window == 0 {
        return Err(TraderError::invalid(
            "technical",
            "bollinger_window",
            "bollinger_window must be at least 1",
        ));
    }
    if !(config.bollinger_num_std >= 0.0) {
        return Err(TraderError::invalid(
            "technical",
            "bollinger_num_std",
            "bollinger_num_std must be non-negative",
        ));
    }
    Ok(())
}
