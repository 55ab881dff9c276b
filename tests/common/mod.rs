#![allow(dead_code)]

use chrono::NaiveDate;
use std::collections::HashMap;
use tradelab::domain::backtest::BacktestConfig;
use tradelab::domain::error::TraderError;
use tradelab::domain::position::Order;
pub use tradelab::domain::price::{PricePoint, PriceSeries};
use tradelab::ports::data_port::DataPort;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<PricePoint>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_points(mut self, symbol: &str, points: Vec<PricePoint>) -> Self {
        self.data.insert(symbol.to_string(), points);
        self
    }

    pub fn with_prices(self, symbol: &str, start: &str, prices: &[f64]) -> Self {
        self.with_points(symbol, generate_points(start, prices))
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_prices(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<PriceSeries, TraderError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(TraderError::DataLoad {
                reason: reason.clone(),
            });
        }
        let Some(points) = self.data.get(symbol) else {
            return Err(TraderError::UnknownSymbol {
                symbol: symbol.to_string(),
                path: format!("mock://{symbol}"),
            });
        };
        let window = points
            .iter()
            .filter(|p| p.date >= start_date && p.date <= end_date)
            .copied()
            .collect();
        PriceSeries::new(symbol, window)
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// One point per calendar day starting at `start`; NaN marks a missing price.
pub fn generate_points(start: &str, prices: &[f64]) -> Vec<PricePoint> {
    let start = NaiveDate::parse_from_str(start, "%Y-%m-%d").unwrap();
    prices
        .iter()
        .enumerate()
        .map(|(i, &p)| {
            let date = start + chrono::Duration::days(i as i64);
            if p.is_nan() {
                PricePoint::missing(date)
            } else {
                PricePoint::new(date, p)
            }
        })
        .collect()
}

pub fn sample_config() -> BacktestConfig {
    BacktestConfig {
        symbol: "DIS".into(),
        start_date: date(2024, 1, 1),
        end_date: date(2024, 12, 31),
        starting_cash: 100_000.0,
        fixed_cost: 0.0,
        floating_cost: 0.0,
        risk_free_rate: 0.0,
        annualization_factor: 252.0,
    }
}

/// Running position after each order, starting from 0.
pub fn position_path(orders: &[Order]) -> Vec<i64> {
    orders
        .iter()
        .scan(0i64, |held, order| {
            *held += order.shares;
            Some(*held)
        })
        .collect()
}
