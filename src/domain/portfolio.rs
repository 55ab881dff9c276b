//! Cash/share portfolio simulation.
//!
//! Replays an order sequence against daily prices in one ordered pass,
//! charging `fixed_cost + floating_cost * |shares| * price` on every
//! non-zero order and marking the portfolio to market each date.

use chrono::NaiveDate;
use tracing::warn;

use super::error::TraderError;
use super::position::{Order, is_legal_position};
use super::price::PriceSeries;

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    pub starting_cash: f64,
    pub fixed_cost: f64,
    /// Fraction of traded value, e.g. 0.005 = 0.5%.
    pub floating_cost: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            starting_cash: 200_000.0,
            fixed_cost: 9.95,
            floating_cost: 0.005,
        }
    }
}

/// Fee for trading `shares` at `price`.
pub fn transaction_fee(shares: i64, price: f64, config: &SimulationConfig) -> f64 {
    config.fixed_cost + config.floating_cost * shares.unsigned_abs() as f64 * price
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PortfolioState {
    pub cash: f64,
    pub shares_held: i64,
}

impl PortfolioState {
    pub fn new(cash: f64) -> Self {
        PortfolioState {
            cash,
            shares_held: 0,
        }
    }

    /// Fill `shares` at `price`; returns the fee charged (0 for a no-op).
    pub fn apply(&mut self, shares: i64, price: f64, config: &SimulationConfig) -> f64 {
        if shares == 0 {
            return 0.0;
        }
        let fee = transaction_fee(shares, price, config);
        self.cash -= fee;
        self.cash -= shares as f64 * price;
        self.shares_held += shares;
        fee
    }

    pub fn value(&self, price: f64) -> f64 {
        self.cash + self.shares_held as f64 * price
    }
}

/// Portfolio value on one date; `None` when the price was unavailable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EquityPoint {
    pub date: NaiveDate,
    pub value: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkippedOrder {
    pub date: NaiveDate,
    pub shares: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Simulation {
    pub starting_cash: f64,
    pub equity_curve: Vec<EquityPoint>,
    pub final_state: PortfolioState,
    pub skipped_orders: Vec<SkippedOrder>,
    pub fees_paid: f64,
    pub trade_count: usize,
}

impl Simulation {
    /// Equity values on dates that had a price.
    pub fn valued_points(&self) -> Vec<(NaiveDate, f64)> {
        self.equity_curve
            .iter()
            .filter_map(|p| p.value.map(|v| (p.date, v)))
            .collect()
    }
}

pub fn simulate(
    orders: &[Order],
    prices: &PriceSeries,
    config: &SimulationConfig,
) -> Result<Simulation, TraderError> {
    if let Some(pair) = orders.windows(2).find(|w| w[1].date <= w[0].date) {
        return Err(TraderError::UnorderedOrders {
            earlier: pair[0].date,
            later: pair[1].date,
        });
    }

    let mut state = PortfolioState::new(config.starting_cash);
    let mut equity_curve = Vec::with_capacity(orders.len());
    let mut skipped_orders = Vec::new();
    let mut fees_paid = 0.0;
    let mut trade_count = 0;

    for order in orders {
        let Some(price) = prices.price_on(order.date) else {
            if order.shares != 0 {
                warn!(date = %order.date, shares = order.shares, "no price; order skipped");
                skipped_orders.push(SkippedOrder {
                    date: order.date,
                    shares: order.shares,
                });
            }
            equity_curve.push(EquityPoint {
                date: order.date,
                value: None,
            });
            continue;
        };

        let position = state.shares_held + order.shares;
        if !is_legal_position(position) {
            return Err(TraderError::IllegalPosition {
                date: order.date,
                shares: order.shares,
                position,
            });
        }

        if order.shares != 0 {
            fees_paid += state.apply(order.shares, price, config);
            trade_count += 1;
        }

        equity_curve.push(EquityPoint {
            date: order.date,
            value: Some(state.value(price)),
        });
    }

    Ok(Simulation {
        starting_cash: config.starting_cash,
        equity_curve,
        final_state: state,
        skipped_orders,
        fees_paid,
        trade_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::price::PricePoint;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    fn series(prices: &[Option<f64>]) -> PriceSeries {
        let points = prices
            .iter()
            .enumerate()
            .map(|(i, p)| PricePoint {
                date: d(i as u32 + 1),
                price: *p,
            })
            .collect();
        PriceSeries::new("TEST", points).unwrap()
    }

    fn orders(shares: &[i64]) -> Vec<Order> {
        shares
            .iter()
            .enumerate()
            .map(|(i, &s)| Order {
                date: d(i as u32 + 1),
                shares: s,
            })
            .collect()
    }

    fn free() -> SimulationConfig {
        SimulationConfig {
            starting_cash: 100_000.0,
            fixed_cost: 0.0,
            floating_cost: 0.0,
        }
    }

    #[test]
    fn fee_formula() {
        let config = SimulationConfig {
            starting_cash: 1.0,
            fixed_cost: 9.95,
            floating_cost: 0.005,
        };
        let fee = transaction_fee(-2000, 50.0, &config);
        assert!((fee - (9.95 + 0.005 * 2000.0 * 50.0)).abs() < 1e-9);
    }

    #[test]
    fn buy_deducts_cost_and_fee() {
        let config = SimulationConfig {
            starting_cash: 100_000.0,
            fixed_cost: 10.0,
            floating_cost: 0.01,
        };
        let mut state = PortfolioState::new(config.starting_cash);
        let fee = state.apply(1000, 50.0, &config);

        assert!((fee - 510.0).abs() < 1e-9);
        assert!((state.cash - (100_000.0 - 50_000.0 - 510.0)).abs() < 1e-9);
        assert_eq!(state.shares_held, 1000);
    }

    #[test]
    fn sell_credits_proceeds_minus_fee() {
        let config = SimulationConfig {
            starting_cash: 100_000.0,
            fixed_cost: 10.0,
            floating_cost: 0.0,
        };
        let mut state = PortfolioState::new(config.starting_cash);
        state.apply(-1000, 20.0, &config);

        assert!((state.cash - (100_000.0 + 20_000.0 - 10.0)).abs() < 1e-9);
        assert_eq!(state.shares_held, -1000);
        assert!((state.value(20.0) - 99_990.0).abs() < 1e-9);
    }

    #[test]
    fn zero_cost_round_trip_preserves_value() {
        let prices = series(&[Some(40.0), Some(40.0), Some(40.0)]);
        let sim = simulate(&orders(&[1000, -1000, 0]), &prices, &free()).unwrap();

        for (_, value) in sim.valued_points() {
            assert!((value - 100_000.0).abs() < 1e-9);
        }
        assert_eq!(sim.trade_count, 2);
        assert_eq!(sim.final_state.shares_held, 0);
    }

    #[test]
    fn marks_to_market_each_date() {
        let prices = series(&[Some(10.0), Some(12.0), Some(9.0)]);
        let sim = simulate(&orders(&[1000, 0, 0]), &prices, &free()).unwrap();

        let values: Vec<f64> = sim.valued_points().iter().map(|p| p.1).collect();
        assert_eq!(values, vec![100_000.0, 102_000.0, 99_000.0]);
    }

    #[test]
    fn missing_price_skips_order_without_fabricating() {
        let prices = series(&[Some(10.0), None, Some(12.0)]);
        let sim = simulate(&orders(&[0, 1000, 0]), &prices, &free()).unwrap();

        assert_eq!(sim.equity_curve.len(), 3);
        assert_eq!(sim.equity_curve[1].value, None);
        assert_eq!(
            sim.skipped_orders,
            vec![SkippedOrder {
                date: d(2),
                shares: 1000
            }]
        );
        assert_eq!(sim.final_state.shares_held, 0);
        assert_eq!(sim.equity_curve[2].value, Some(100_000.0));
    }

    #[test]
    fn rejects_illegal_position() {
        let prices = series(&[Some(10.0), Some(10.0)]);
        let result = simulate(&orders(&[2000, 1000]), &prices, &free());
        assert!(matches!(
            result,
            Err(TraderError::IllegalPosition { position: 3000, .. })
        ));
    }

    #[test]
    fn rejects_unordered_orders() {
        let prices = series(&[Some(10.0), Some(10.0)]);
        let mut unordered = orders(&[0, 0]);
        unordered.swap(0, 1);
        let (first, second) = (unordered[0].date, unordered[1].date);
        assert!(matches!(
            simulate(&unordered, &prices, &free()),
            Err(TraderError::UnorderedOrders { earlier, later })
                if earlier == first && later == second
        ));
    }

    #[test]
    fn fees_accumulate() {
        let config = SimulationConfig {
            starting_cash: 100_000.0,
            fixed_cost: 5.0,
            floating_cost: 0.0,
        };
        let prices = series(&[Some(10.0), Some(10.0), Some(10.0)]);
        let sim = simulate(&orders(&[1000, 0, -2000]), &prices, &config).unwrap();

        assert!((sim.fees_paid - 10.0).abs() < 1e-9);
        assert!((sim.valued_points()[2].1 - 99_990.0).abs() < 1e-9);
    }
}
