//! RSI (Relative Strength Index) with Wilder's smoothing.
//!
//! - First average: simple mean of gains/losses over the first n price changes
//! - Subsequent: avg = (prev_avg * (n-1) + current) / n
//!
//! Formula: RSI = 100 - (100 / (1 + avg_gain / avg_loss))
//! If avg_loss == 0: RSI = 100
//!
//! Warmup: first n dates are undefined (n price changes are needed for the
//! first average). A change into or out of a missing price counts as neither
//! gain nor loss; the missing date itself reads undefined.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType};
use crate::domain::price::PricePoint;

pub const DEFAULT_PERIOD: usize = 14;

pub fn calculate_rsi(points: &[PricePoint], period: usize) -> IndicatorSeries {
    if period == 0 || points.len() <= period {
        return IndicatorSeries::all_undefined(IndicatorType::Rsi(period), points);
    }

    let (gains, losses): (Vec<f64>, Vec<f64>) = points
        .windows(2)
        .map(|w| match (w[0].price, w[1].price) {
            (Some(prev), Some(curr)) => {
                let change = curr - prev;
                (change.max(0.0), (-change).max(0.0))
            }
            _ => (0.0, 0.0),
        })
        .unzip();

    let mut values = Vec::with_capacity(points.len());
    values.extend(points[..period].iter().map(|p| IndicatorPoint::undefined(p.date)));

    let mut avg_gain = gains[..period].iter().sum::<f64>() / period as f64;
    let mut avg_loss = losses[..period].iter().sum::<f64>() / period as f64;

    for (i, point) in points.iter().enumerate().skip(period) {
        if i > period {
            let change_idx = i - 1;
            avg_gain = (avg_gain * (period - 1) as f64 + gains[change_idx]) / period as f64;
            avg_loss = (avg_loss * (period - 1) as f64 + losses[change_idx]) / period as f64;
        }
        values.push(match point.price {
            Some(_) => IndicatorPoint::simple(point.date, rsi_value(avg_gain, avg_loss)),
            None => IndicatorPoint::undefined(point.date),
        });
    }

    IndicatorSeries {
        indicator_type: IndicatorType::Rsi(period),
        values,
    }
}

fn rsi_value(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        100.0
    } else {
        100.0 - (100.0 / (1.0 + avg_gain / avg_loss))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::indicator::make_points;

    #[test]
    fn rsi_empty_points() {
        let series = calculate_rsi(&[], 14);
        assert_eq!(series.values.len(), 0);
    }

    #[test]
    fn rsi_single_point() {
        let series = calculate_rsi(&make_points(&[100.0]), 14);
        assert_eq!(series.values.len(), 1);
        assert!(!series.values[0].is_defined());
    }

    #[test]
    fn rsi_warmup_period() {
        let prices: Vec<f64> = (1..=15).map(|i| 100.0 + (i as f64 % 5.0) * 2.0).collect();
        let series = calculate_rsi(&make_points(&prices), 14);

        assert_eq!(series.values.len(), 15);
        for i in 0..14 {
            assert!(!series.values[i].is_defined(), "Point {} should be undefined", i);
        }
        assert!(series.values[14].is_defined(), "Point 14 should be defined");
    }

    #[test]
    fn rsi_all_gains_no_losses() {
        let prices: Vec<f64> = (0..20).map(|i| 100.0 + i as f64).collect();
        let series = calculate_rsi(&make_points(&prices), 14);

        for point in &series.values[14..] {
            assert!((point.primary().unwrap() - 100.0).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn rsi_all_losses_no_gains() {
        let prices: Vec<f64> = (0..20).map(|i| 100.0 - i as f64).collect();
        let series = calculate_rsi(&make_points(&prices), 14);

        for point in &series.values[14..] {
            assert!(point.primary().unwrap().abs() < f64::EPSILON);
        }
    }

    #[test]
    fn rsi_in_range() {
        let prices: Vec<f64> = (1..=40)
            .map(|i| 100.0 + (i as f64 % 7.0 - 3.0) * 2.0)
            .collect();
        let series = calculate_rsi(&make_points(&prices), 14);

        for rsi in series.primary_values().into_iter().flatten() {
            assert!((0.0..=100.0).contains(&rsi), "RSI {} out of range", rsi);
        }
    }

    #[test]
    fn rsi_wilder_smoothing_step() {
        // period 2: changes +2, -1, +3
        let series = calculate_rsi(&make_points(&[10.0, 12.0, 11.0, 14.0]), 2);

        // seed: gain 1.0, loss 0.5 -> RS 2 -> RSI 66.66..
        let seed = series.values[2].primary().unwrap();
        assert!((seed - (100.0 - 100.0 / 3.0)).abs() < 1e-10);

        // smoothed: gain (1*1 + 3)/2 = 2, loss (0.5*1 + 0)/2 = 0.25 -> RS 8
        let smoothed = series.values[3].primary().unwrap();
        assert!((smoothed - (100.0 - 100.0 / 9.0)).abs() < 1e-10);
    }

    #[test]
    fn rsi_missing_price_is_undefined_on_its_date() {
        let mut points = make_points(&[10.0, 12.0, 11.0, 14.0, 15.0]);
        points[3].price = None;
        let series = calculate_rsi(&points, 2);

        assert!(series.values[2].is_defined());
        assert!(!series.values[3].is_defined());
        assert!(series.values[4].is_defined());
    }

    #[test]
    fn rsi_indicator_type() {
        let series = calculate_rsi(&make_points(&[100.0]), DEFAULT_PERIOD);
        assert_eq!(series.indicator_type, IndicatorType::Rsi(14));
    }

    #[test]
    fn rsi_zero_period() {
        let series = calculate_rsi(&make_points(&[100.0, 101.0]), 0);
        assert_eq!(series.values.len(), 2);
        assert!(series.values.iter().all(|p| !p.is_defined()));
    }
}
