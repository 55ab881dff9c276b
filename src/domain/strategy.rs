//! Trading strategies.
//!
//! A strategy turns a symbol's price history into a position-limited order
//! sequence, one order per trading date in the test window. All variants go
//! through [`PositionSizer`], so every order moves the position between legal
//! levels.

use chrono::{Duration, NaiveDate};
use std::collections::HashMap;
use tracing::debug;

use super::error::TraderError;
use super::indicator::{bollinger, calculate_bollinger, calculate_macd, calculate_rsi, macd, rsi};
use super::position::{Order, PositionSizer};
use super::signal::{self, DatedVerdict};
use crate::ports::data_port::DataPort;

#[derive(Debug, Clone, PartialEq)]
pub struct TestParameters {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub symbol: String,
    pub starting_cash: f64,
}

/// Free-form settings for strategies that fit parameters before testing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrainParameters {
    pub settings: HashMap<String, String>,
}

pub trait Strategy: Send + Sync {
    fn name(&self) -> &str;

    fn train(&mut self, _params: &TrainParameters) -> Result<(), TraderError> {
        Ok(())
    }

    fn test(&self, data: &dyn DataPort, params: &TestParameters) -> Result<Vec<Order>, TraderError>;
}

fn fetch_window(
    data: &dyn DataPort,
    params: &TestParameters,
    lookback_days: i64,
) -> Result<super::price::PriceSeries, TraderError> {
    let start = Duration::try_days(lookback_days)
        .and_then(|lookback| params.start_date.checked_sub_signed(lookback))
        .ok_or_else(|| {
            TraderError::invalid(
                "technical",
                "warmup_days",
                format!("{lookback_days} days before {} is out of range", params.start_date),
            )
        })?;
    let prices = data.fetch_prices(&params.symbol, start, params.end_date)?;
    if prices.between(params.start_date, params.end_date).is_empty() {
        return Err(TraderError::NoData {
            symbol: params.symbol.clone(),
            start: params.start_date,
            end: params.end_date,
        });
    }
    Ok(prices)
}

fn size_in_window(name: &str, verdicts: &[DatedVerdict], params: &TestParameters) -> Vec<Order> {
    let in_window: Vec<DatedVerdict> = verdicts
        .iter()
        .filter(|v| v.date >= params.start_date && v.date <= params.end_date)
        .copied()
        .collect();
    let orders = PositionSizer::size_orders(&in_window);
    debug!(
        strategy = name,
        dates = orders.len(),
        trades = orders.iter().filter(|o| o.shares != 0).count(),
        "orders sized"
    );
    orders
}

/// Dates of long entries (buys) and short entries (sells).
pub fn entry_dates(orders: &[Order]) -> (Vec<NaiveDate>, Vec<NaiveDate>) {
    let longs = orders.iter().filter(|o| o.is_buy()).map(|o| o.date).collect();
    let shorts = orders.iter().filter(|o| o.is_sell()).map(|o| o.date).collect();
    (longs, shorts)
}

/// Perfect foresight: trades in the direction of tomorrow's price change.
#[derive(Debug, Clone, Default)]
pub struct OracleStrategy;

impl Strategy for OracleStrategy {
    fn name(&self) -> &str {
        "oracle"
    }

    fn test(&self, data: &dyn DataPort, params: &TestParameters) -> Result<Vec<Order>, TraderError> {
        let prices = fetch_window(data, params, 0)?;
        let window = prices.between(params.start_date, params.end_date);
        Ok(size_in_window(self.name(), &signal::oracle_verdicts(window), params))
    }
}

/// Buy one lot on the first trading date and hold.
#[derive(Debug, Clone, Default)]
pub struct BaselineStrategy;

impl Strategy for BaselineStrategy {
    fn name(&self) -> &str {
        "baseline"
    }

    fn test(&self, data: &dyn DataPort, params: &TestParameters) -> Result<Vec<Order>, TraderError> {
        let prices = fetch_window(data, params, 0)?;
        let window = prices.between(params.start_date, params.end_date);
        Ok(size_in_window(self.name(), &signal::baseline_verdicts(window), params))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TechnicalConfig {
    pub rsi_period: usize,
    pub rsi_overbought: f64,
    pub rsi_oversold: f64,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_threshold: f64,
    pub bollinger_window: usize,
    pub bollinger_num_std: f64,
    pub use_bollinger: bool,
    /// Extra calendar days of history loaded before the test window so
    /// indicators are warmed up on its first date.
    pub warmup_days: i64,
}

impl Default for TechnicalConfig {
    fn default() -> Self {
        TechnicalConfig {
            rsi_period: rsi::DEFAULT_PERIOD,
            rsi_overbought: 87.0,
            rsi_oversold: 32.0,
            macd_fast: macd::DEFAULT_FAST,
            macd_slow: macd::DEFAULT_SLOW,
            macd_threshold: 2.3,
            bollinger_window: bollinger::DEFAULT_WINDOW,
            bollinger_num_std: 3.0,
            use_bollinger: false,
            warmup_days: 0,
        }
    }
}

/// MACD threshold crossings plus RSI bands, optionally Bollinger breaches.
#[derive(Debug, Clone, Default)]
pub struct TechnicalStrategy {
    pub config: TechnicalConfig,
}

impl TechnicalStrategy {
    pub fn new(config: TechnicalConfig) -> Self {
        TechnicalStrategy { config }
    }

    /// Verdicts for every date in `points`, warm-up dates included.
    pub fn verdicts(&self, points: &[super::price::PricePoint]) -> Vec<DatedVerdict> {
        let c = &self.config;
        let macd = calculate_macd(points, c.macd_fast, c.macd_slow);
        let rsi = calculate_rsi(points, c.rsi_period);
        debug!(
            macd_warmup = macd.warmup_len(),
            rsi_warmup = rsi.warmup_len(),
            "indicators computed"
        );

        let mut columns = vec![
            signal::macd_crossings(&macd, c.macd_threshold),
            signal::rsi_bands(&rsi, c.rsi_overbought, c.rsi_oversold),
        ];
        if c.use_bollinger {
            let bands = calculate_bollinger(points, c.bollinger_window, c.bollinger_num_std);
            columns.push(signal::bollinger_breaches(&bands, points));
        }
        signal::aggregate(points, &columns)
    }
}

impl Strategy for TechnicalStrategy {
    fn name(&self) -> &str {
        "technical"
    }

    fn test(&self, data: &dyn DataPort, params: &TestParameters) -> Result<Vec<Order>, TraderError> {
        let prices = fetch_window(data, params, self.config.warmup_days)?;
        let verdicts = self.verdicts(prices.points());
        Ok(size_in_window(self.name(), &verdicts, params))
    }
}
