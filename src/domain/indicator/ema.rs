//! Exponential Moving Average.
//!
//! k = 2/(n+1), seed with the first full-window SMA, then
//! EMA[i] = P[i]*k + EMA[i-1]*(1-k).
//! Warmup: first (n-1) dates are undefined. After seeding, a missing price
//! leaves the average untouched and that date alone reads undefined.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, full_window};
use crate::domain::price::PricePoint;

pub fn calculate_ema(points: &[PricePoint], period: usize) -> IndicatorSeries {
    if period == 0 {
        return IndicatorSeries::all_undefined(IndicatorType::Ema(period), points);
    }

    let k = 2.0 / (period as f64 + 1.0);
    let mut ema: Option<f64> = None;
    let mut values = Vec::with_capacity(points.len());

    for (i, point) in points.iter().enumerate() {
        let next = match (ema, point.price) {
            (Some(prev), Some(price)) => Some(price * k + prev * (1.0 - k)),
            (Some(_), None) => {
                values.push(IndicatorPoint::undefined(point.date));
                continue;
            }
            (None, _) => full_window(points, i, period)
                .map(|window| window.iter().sum::<f64>() / period as f64),
        };
        ema = next.or(ema);
        values.push(match next {
            Some(v) => IndicatorPoint::simple(point.date, v),
            None => IndicatorPoint::undefined(point.date),
        });
    }

    IndicatorSeries {
        indicator_type: IndicatorType::Ema(period),
        values,
    }
}
