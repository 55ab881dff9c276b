//! Price data access port trait.

use crate::domain::error::TraderError;
use crate::domain::price::PriceSeries;
use chrono::NaiveDate;

pub trait DataPort: Sync {
    /// Adjusted closing prices for `symbol` with `start <= date <= end`,
    /// ascending by date. Calendar dates the symbol did not trade on may be
    /// present with a missing price.
    fn fetch_prices(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<PriceSeries, TraderError>;
}
