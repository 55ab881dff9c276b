//! Technical indicator implementations.
//!
//! Every indicator takes the full price slice and returns one
//! [`IndicatorPoint`] per input date. Warm-up dates, windows touching a
//! missing price, and windows longer than the series all carry `value: None`
//! rather than a placeholder number.

pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod rsi;
pub mod sma;
pub mod stddev;

pub use bollinger::calculate_bollinger;
pub use ema::calculate_ema;
pub use macd::calculate_macd;
pub use rsi::calculate_rsi;
pub use sma::calculate_sma;
pub use stddev::calculate_stddev;

use chrono::NaiveDate;
use std::fmt;

use crate::domain::price::PricePoint;

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorPoint {
    pub date: NaiveDate,
    pub value: Option<IndicatorValue>,
}

impl IndicatorPoint {
    pub fn undefined(date: NaiveDate) -> Self {
        IndicatorPoint { date, value: None }
    }

    pub fn simple(date: NaiveDate, value: f64) -> Self {
        IndicatorPoint {
            date,
            value: Some(IndicatorValue::Simple(value)),
        }
    }

    pub fn is_defined(&self) -> bool {
        self.value.is_some()
    }

    /// The scalar reading: the value itself for single-output indicators,
    /// the middle band for Bollinger, the MACD line for MACD.
    pub fn primary(&self) -> Option<f64> {
        self.value.as_ref().map(|v| match *v {
            IndicatorValue::Simple(x) => x,
            IndicatorValue::Bollinger { middle, .. } => middle,
            IndicatorValue::Macd { line, .. } => line,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum IndicatorValue {
    Simple(f64),
    Bollinger { upper: f64, middle: f64, lower: f64 },
    Macd { line: f64, fast: f64, slow: f64 },
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IndicatorType {
    Sma(usize),
    Ema(usize),
    Rsi(usize),
    Stddev(usize),
    Macd {
        fast: usize,
        slow: usize,
    },
    Bollinger {
        period: usize,
        stddev_mult_x100: u32,
    },
}

#[derive(Debug, Clone)]
pub struct IndicatorSeries {
    pub indicator_type: IndicatorType,
    pub values: Vec<IndicatorPoint>,
}

impl IndicatorSeries {
    pub(crate) fn all_undefined(indicator_type: IndicatorType, points: &[PricePoint]) -> Self {
        IndicatorSeries {
            indicator_type,
            values: points
                .iter()
                .map(|p| IndicatorPoint::undefined(p.date))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Primary readings in date order, `None` where undefined.
    pub fn primary_values(&self) -> Vec<Option<f64>> {
        self.values.iter().map(IndicatorPoint::primary).collect()
    }

    /// Number of leading undefined points.
    pub fn warmup_len(&self) -> usize {
        self.values.iter().take_while(|p| !p.is_defined()).count()
    }
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Sma(period) => write!(f, "SMA({})", period),
            IndicatorType::Ema(period) => write!(f, "EMA({})", period),
            IndicatorType::Rsi(period) => write!(f, "RSI({})", period),
            IndicatorType::Stddev(period) => write!(f, "STDDEV({})", period),
            IndicatorType::Macd { fast, slow } => write!(f, "MACD({},{})", fast, slow),
            IndicatorType::Bollinger {
                period,
                stddev_mult_x100,
            } => {
                let mult = *stddev_mult_x100 as f64 / 100.0;
                write!(f, "BOLLINGER({},{})", period, mult)
            }
        }
    }
}

/// Trailing window of prices ending at `end` (inclusive), or `None` if the
/// window does not fit or touches a missing price.
pub(crate) fn full_window(points: &[PricePoint], end: usize, period: usize) -> Option<Vec<f64>> {
    if period == 0 || end + 1 < period {
        return None;
    }
    points[end + 1 - period..=end]
        .iter()
        .map(|p| p.price)
        .collect()
}

#[cfg(test)]
pub(crate) fn make_points(prices: &[f64]) -> Vec<PricePoint> {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    prices
        .iter()
        .enumerate()
        .map(|(i, &price)| PricePoint::new(start + chrono::Duration::days(i as i64), price))
        .collect()
}
