//! Rolling standard deviation.
//!
//! Sample standard deviation (divides by n-1) over the trailing n prices, so
//! band widths match the return statistics in `metrics`. A one-price window
//! has no spread and reads 0.
//! Warmup: first (n-1) dates are undefined.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, full_window};
use crate::domain::price::PricePoint;

pub fn calculate_stddev(points: &[PricePoint], period: usize) -> IndicatorSeries {
    let values = points
        .iter()
        .enumerate()
        .map(|(i, p)| match full_window(points, i, period) {
            Some(window) => IndicatorPoint::simple(p.date, sample_stddev(&window)),
            None => IndicatorPoint::undefined(p.date),
        })
        .collect();

    IndicatorSeries {
        indicator_type: IndicatorType::Stddev(period),
        values,
    }
}

/// Sample standard deviation; 0 for fewer than two observations.
pub(crate) fn sample_stddev(window: &[f64]) -> f64 {
    let n = window.len();
    if n < 2 {
        return 0.0;
    }
    let mean = window.iter().sum::<f64>() / n as f64;
    let variance = window
        .iter()
        .map(|x| {
            let diff = x - mean;
            diff * diff
        })
        .sum::<f64>()
        / (n - 1) as f64;
    variance.sqrt()
}
