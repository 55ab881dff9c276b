//! Bollinger Bands.
//!
//! - Middle: SMA over n periods
//! - Upper: Middle + (multiplier × StdDev)
//! - Lower: Middle - (multiplier × StdDev)
//!
//! StdDev is the sample standard deviation over the same window (see
//! [`stddev`](super::stddev)). Warmup: first (period-1) dates are undefined.

use crate::domain::indicator::stddev::sample_stddev;
use crate::domain::indicator::{
    IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue, full_window,
};
use crate::domain::price::PricePoint;

pub const DEFAULT_WINDOW: usize = 9;

pub fn calculate_bollinger(points: &[PricePoint], period: usize, num_std: f64) -> IndicatorSeries {
    let values = points
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let value = full_window(points, i, period).map(|window| {
                let middle = window.iter().sum::<f64>() / period as f64;
                let half_width = num_std * sample_stddev(&window);
                IndicatorValue::Bollinger {
                    upper: middle + half_width,
                    middle,
                    lower: middle - half_width,
                }
            });
            IndicatorPoint {
                date: p.date,
                value,
            }
        })
        .collect();

    IndicatorSeries {
        indicator_type: IndicatorType::Bollinger {
            period,
            stddev_mult_x100: (num_std * 100.0).round().max(0.0) as u32,
        },
        values,
    }
}
