//! MACD (Moving Average Convergence Divergence) line.
//!
//! MACD Line = EMA(fast) - EMA(slow)
//!
//! No signal line is computed: the technical strategy compares the raw line
//! against a fixed threshold.
//!
//! Default parameters: fast=12, slow=26
//! Warmup: max(fast, slow) - 1 dates.

use crate::domain::indicator::{
    IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue, calculate_ema,
};
use crate::domain::price::PricePoint;

pub const DEFAULT_FAST: usize = 12;
pub const DEFAULT_SLOW: usize = 26;

pub fn calculate_macd(points: &[PricePoint], fast: usize, slow: usize) -> IndicatorSeries {
    let indicator_type = IndicatorType::Macd { fast, slow };
    if fast == 0 || slow == 0 {
        return IndicatorSeries::all_undefined(indicator_type, points);
    }

    let ema_fast = calculate_ema(points, fast);
    let ema_slow = calculate_ema(points, slow);

    let values = ema_fast
        .values
        .iter()
        .zip(&ema_slow.values)
        .map(|(f, s)| match (f.primary(), s.primary()) {
            (Some(fast), Some(slow)) => IndicatorPoint {
                date: f.date,
                value: Some(IndicatorValue::Macd {
                    line: fast - slow,
                    fast,
                    slow,
                }),
            },
            _ => IndicatorPoint::undefined(f.date),
        })
        .collect();

    IndicatorSeries {
        indicator_type,
        values,
    }
}
