//! Configuration access port trait.

use chrono::NaiveDate;

pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool;

    /// `YYYY-MM-DD` date. `None` if absent, `Some(Err(raw))` if unparseable.
    fn get_date(&self, section: &str, key: &str) -> Option<Result<NaiveDate, String>> {
        self.get_string(section, key).map(|raw| {
            NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| raw)
        })
    }

    /// Numeric value. `None` if absent, `Some(Err(raw))` if unparseable.
    fn get_number(&self, section: &str, key: &str) -> Option<Result<f64, String>> {
        self.get_string(section, key)
            .map(|raw| raw.trim().parse::<f64>().map_err(|_| raw))
    }
}
