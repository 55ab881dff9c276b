//! Simple Moving Average.
//!
//! SMA(n)[i] = mean(P[i-n+1..=i]). Never looks ahead.
//! Warmup: first (n-1) dates are undefined.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, full_window};
use crate::domain::price::PricePoint;

pub fn calculate_sma(points: &[PricePoint], period: usize) -> IndicatorSeries {
    let values = points
        .iter()
        .enumerate()
        .map(|(i, p)| match full_window(points, i, period) {
            Some(window) => IndicatorPoint::simple(p.date, window.iter().sum::<f64>() / period as f64),
            None => IndicatorPoint::undefined(p.date),
        })
        .collect();

    IndicatorSeries {
        indicator_type: IndicatorType::Sma(period),
        values,
    }
}
