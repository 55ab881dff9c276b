//! Backtest orchestration.
//!
//! BacktestConfig bundles the run parameters. A run asks the strategy for its
//! orders, replays them through the simulator and reduces the equity curve
//! to a [`PerformanceReport`].

use chrono::NaiveDate;
use rayon::prelude::*;
use tracing::info;

use super::error::TraderError;
use super::metrics::{AnalysisConfig, PerformanceReport};
use super::portfolio::{Simulation, SimulationConfig, simulate};
use super::position::Order;
use super::price::PriceSeries;
use super::strategy::{Strategy, TestParameters};
use crate::ports::data_port::DataPort;

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestConfig {
    pub symbol: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub starting_cash: f64,
    pub fixed_cost: f64,
    pub floating_cost: f64,
    pub risk_free_rate: f64,
    pub annualization_factor: f64,
}

impl BacktestConfig {
    pub fn test_parameters(&self) -> TestParameters {
        TestParameters {
            start_date: self.start_date,
            end_date: self.end_date,
            symbol: self.symbol.clone(),
            starting_cash: self.starting_cash,
        }
    }

    pub fn simulation(&self) -> SimulationConfig {
        SimulationConfig {
            starting_cash: self.starting_cash,
            fixed_cost: self.fixed_cost,
            floating_cost: self.floating_cost,
        }
    }

    pub fn analysis(&self) -> AnalysisConfig {
        AnalysisConfig {
            risk_free_rate: self.risk_free_rate,
            annualization_factor: self.annualization_factor,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Assessment {
    pub simulation: Simulation,
    pub report: PerformanceReport,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestResult {
    pub strategy_name: String,
    pub orders: Vec<Order>,
    pub simulation: Simulation,
    pub report: PerformanceReport,
}

/// Simulate `orders` against `prices` and analyse the resulting equity curve.
pub fn assess(
    orders: &[Order],
    prices: &PriceSeries,
    simulation: &SimulationConfig,
    analysis: &AnalysisConfig,
) -> Result<Assessment, TraderError> {
    let simulation = simulate(orders, prices, simulation)?;
    let report = PerformanceReport::from_simulation(&simulation, analysis)?;
    Ok(Assessment { simulation, report })
}

/// Load prices covering the order dates of `symbol`.
pub fn prices_for_orders(
    data: &dyn DataPort,
    symbol: &str,
    orders: &[Order],
) -> Result<PriceSeries, TraderError> {
    let (Some(first), Some(last)) = (orders.first(), orders.last()) else {
        return Err(TraderError::InsufficientData { have: 0, need: 2 });
    };
    data.fetch_prices(symbol, first.date, last.date)
}

pub fn run_backtest(
    strategy: &dyn Strategy,
    data: &dyn DataPort,
    config: &BacktestConfig,
) -> Result<BacktestResult, TraderError> {
    info!(
        strategy = strategy.name(),
        symbol = %config.symbol,
        start = %config.start_date,
        end = %config.end_date,
        "running backtest"
    );

    let orders = strategy.test(data, &config.test_parameters())?;
    let prices = prices_for_orders(data, &config.symbol, &orders)?;
    let Assessment { simulation, report } =
        assess(&orders, &prices, &config.simulation(), &config.analysis())?;

    info!(
        strategy = strategy.name(),
        trades = simulation.trade_count,
        cumulative_return = report.cumulative_return,
        "backtest complete"
    );

    Ok(BacktestResult {
        strategy_name: strategy.name().to_string(),
        orders,
        simulation,
        report,
    })
}

/// Run independent strategies in parallel over the same configuration.
/// Results come back in the order the strategies were given.
pub fn run_many(
    strategies: &[Box<dyn Strategy>],
    data: &dyn DataPort,
    config: &BacktestConfig,
) -> Vec<Result<BacktestResult, TraderError>> {
    strategies
        .par_iter()
        .map(|strategy| run_backtest(strategy.as_ref(), data, config))
        .collect()
}
