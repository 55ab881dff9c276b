//! Daily adjusted-close price series for a single symbol.

use chrono::NaiveDate;
use std::collections::HashMap;

use super::error::TraderError;

/// One dated observation. `price` is `None` when the symbol had no usable
/// row for that calendar date.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub price: Option<f64>,
}

impl PricePoint {
    pub fn new(date: NaiveDate, price: f64) -> Self {
        PricePoint {
            date,
            price: Some(price),
        }
    }

    pub fn missing(date: NaiveDate) -> Self {
        PricePoint { date, price: None }
    }
}

/// Chronologically ordered, duplicate-free price series.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    symbol: String,
    points: Vec<PricePoint>,
    date_index: HashMap<NaiveDate, usize>,
}

impl PriceSeries {
    /// Build a series, rejecting out-of-order or repeated dates and
    /// non-positive prices.
    pub fn new(symbol: impl Into<String>, points: Vec<PricePoint>) -> Result<Self, TraderError> {
        let symbol = symbol.into();
        for pair in points.windows(2) {
            if pair[1].date <= pair[0].date {
                return Err(TraderError::DataLoad {
                    reason: format!(
                        "{symbol}: dates must be strictly ascending ({} follows {})",
                        pair[1].date, pair[0].date
                    ),
                });
            }
        }
        if let Some(bad) = points
            .iter()
            .find(|p| p.price.is_some_and(|v| !v.is_finite() || v <= 0.0))
        {
            return Err(TraderError::DataLoad {
                reason: format!("{symbol}: non-positive price on {}", bad.date),
            });
        }

        let date_index = points
            .iter()
            .enumerate()
            .map(|(i, p)| (p.date, i))
            .collect();
        Ok(PriceSeries {
            symbol,
            points,
            date_index,
        })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Price on `date`; `None` for unknown dates and for recorded gaps alike.
    pub fn price_on(&self, date: NaiveDate) -> Option<f64> {
        self.date_index
            .get(&date)
            .and_then(|&i| self.points[i].price)
    }

    /// Points with `start <= date <= end`.
    pub fn between(&self, start: NaiveDate, end: NaiveDate) -> &[PricePoint] {
        let lo = self.points.partition_point(|p| p.date < start);
        let hi = self.points.partition_point(|p| p.date <= end);
        if lo >= hi { &[] } else { &self.points[lo..hi] }
    }

    pub fn missing_count(&self) -> usize {
        self.points.iter().filter(|p| p.price.is_none()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    fn sample() -> PriceSeries {
        PriceSeries::new(
            "DIS",
            vec![
                PricePoint::new(d(2), 100.0),
                PricePoint::missing(d(3)),
                PricePoint::new(d(4), 102.0),
                PricePoint::new(d(5), 101.0),
            ],
        )
        .unwrap()
    }

    #[test]
    fn price_lookup() {
        let series = sample();
        assert_eq!(series.price_on(d(2)), Some(100.0));
        assert_eq!(series.price_on(d(3)), None);
        assert_eq!(series.price_on(d(9)), None);
        assert_eq!(series.missing_count(), 1);
    }

    #[test]
    fn rejects_duplicate_dates() {
        let result = PriceSeries::new(
            "DIS",
            vec![PricePoint::new(d(2), 100.0), PricePoint::new(d(2), 101.0)],
        );
        assert!(matches!(result, Err(TraderError::DataLoad { .. })));
    }

    #[test]
    fn rejects_descending_dates() {
        let result = PriceSeries::new(
            "DIS",
            vec![PricePoint::new(d(3), 100.0), PricePoint::new(d(2), 101.0)],
        );
        assert!(result.is_err());
    }

    #[test]
    fn rejects_non_positive_price() {
        let result = PriceSeries::new("DIS", vec![PricePoint::new(d(2), 0.0)]);
        assert!(result.is_err());
    }

    #[test]
    fn between_is_inclusive() {
        let series = sample();
        let slice = series.between(d(3), d(4));
        assert_eq!(slice.len(), 2);
        assert_eq!(slice[0].date, d(3));
        assert_eq!(slice[1].date, d(4));
        assert!(series.between(d(6), d(9)).is_empty());
        assert!(series.between(d(5), d(2)).is_empty());
    }

    #[test]
    fn points_keep_date_order() {
        let series = sample();
        assert_eq!(series.points().first().map(|p| p.date), Some(d(2)));
        assert_eq!(series.len(), 4);
    }
}
