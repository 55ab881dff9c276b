//! Order sequences as `Date,Shares` CSV files.

use crate::domain::error::TraderError;
use crate::domain::position::Order;
use chrono::NaiveDate;
use std::fs;
use std::path::Path;

const HEADER: [&str; 2] = ["Date", "Shares"];

pub fn read_orders<P: AsRef<Path>>(path: P) -> Result<Vec<Order>, TraderError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;
    let mut rdr = csv::Reader::from_reader(content.as_bytes());

    let mut orders = Vec::new();
    for (line, result) in rdr.records().enumerate() {
        let record = result.map_err(|e| TraderError::DataLoad {
            reason: format!("{}: CSV parse error: {}", path.display(), e),
        })?;
        let row_error = |what: &str| TraderError::DataLoad {
            reason: format!("{}: row {}: {}", path.display(), line + 1, what),
        };

        let date_str = record.get(0).ok_or_else(|| row_error("missing date"))?.trim();
        let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
            .map_err(|_| row_error(&format!("invalid date {:?}", date_str)))?;
        let shares_str = record.get(1).ok_or_else(|| row_error("missing shares"))?.trim();
        let shares: i64 = shares_str
            .parse()
            .map_err(|_| row_error(&format!("invalid share count {:?}", shares_str)))?;

        orders.push(Order { date, shares });
    }
    Ok(orders)
}

pub fn write_orders<P: AsRef<Path>>(path: P, orders: &[Order]) -> Result<(), TraderError> {
    let path = path.as_ref();
    let write_error = |e: csv::Error| TraderError::DataLoad {
        reason: format!("{}: failed to write orders: {}", path.display(), e),
    };

    let mut wtr = csv::Writer::from_path(path).map_err(write_error)?;
    wtr.write_record(HEADER).map_err(write_error)?;
    for order in orders {
        wtr.write_record([order.date.format("%Y-%m-%d").to_string(), order.shares.to_string()])
            .map_err(write_error)?;
    }
    wtr.flush()?;
    Ok(())
}
