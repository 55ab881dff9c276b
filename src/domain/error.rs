//! Domain error types.

use chrono::NaiveDate;

/// Top-level error type for tradelab.
#[derive(Debug, thiserror::Error)]
pub enum TraderError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("unknown symbol {symbol}: no price file at {path}")]
    UnknownSymbol { symbol: String, path: String },

    #[error("failed to load data: {reason}")]
    DataLoad { reason: String },

    #[error("no price data for {symbol} between {start} and {end}")]
    NoData {
        symbol: String,
        start: NaiveDate,
        end: NaiveDate,
    },

    #[error("order of {shares} shares on {date} would leave position {position} outside the legal set")]
    IllegalPosition {
        date: NaiveDate,
        shares: i64,
        position: i64,
    },

    #[error("orders must be in strictly ascending date order ({later} follows {earlier})")]
    UnorderedOrders { earlier: NaiveDate, later: NaiveDate },

    #[error("portfolio value on {date} is zero; daily return is undefined")]
    ZeroBaseValue { date: NaiveDate },

    #[error("degenerate statistics: {reason}")]
    DegenerateStatistics { reason: String },

    #[error("insufficient data: have {have} valuations, need {need}")]
    InsufficientData { have: usize, need: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl TraderError {
    pub(crate) fn invalid(section: &str, key: &str, reason: impl Into<String>) -> Self {
        TraderError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<&TraderError> for std::process::ExitCode {
    fn from(err: &TraderError) -> Self {
        let code: u8 = match err {
            TraderError::Io(_) => 1,
            TraderError::ConfigParse { .. }
            | TraderError::ConfigMissing { .. }
            | TraderError::ConfigInvalid { .. }
            | TraderError::UnknownSymbol { .. } => 2,
            TraderError::DataLoad { .. } | TraderError::NoData { .. } => 3,
            TraderError::IllegalPosition { .. }
            | TraderError::UnorderedOrders { .. }
            | TraderError::ZeroBaseValue { .. }
            | TraderError::DegenerateStatistics { .. }
            | TraderError::InsufficientData { .. } => 4,
        };
        std::process::ExitCode::from(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_invalid_message() {
        let err = TraderError::invalid("backtest", "starting_cash", "must be positive");
        assert_eq!(
            err.to_string(),
            "invalid config value [backtest] starting_cash: must be positive"
        );
    }

    #[test]
    fn zero_base_value_message_names_date() {
        let err = TraderError::ZeroBaseValue {
            date: NaiveDate::from_ymd_opt(2020, 3, 2).unwrap(),
        };
        assert!(err.to_string().contains("2020-03-02"));
    }

    #[test]
    fn exit_codes_by_family() {
        let code = |err: TraderError| format!("{:?}", std::process::ExitCode::from(&err));
        let d = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();

        assert_eq!(
            code(TraderError::Io(std::io::Error::other("disk"))),
            format!("{:?}", std::process::ExitCode::from(1))
        );
        assert_eq!(
            code(TraderError::UnknownSymbol {
                symbol: "XYZ".into(),
                path: "data/XYZ.csv".into(),
            }),
            format!("{:?}", std::process::ExitCode::from(2))
        );
        assert_eq!(
            code(TraderError::NoData {
                symbol: "DIS".into(),
                start: d,
                end: d,
            }),
            format!("{:?}", std::process::ExitCode::from(3))
        );
        assert_eq!(
            code(TraderError::UnorderedOrders {
                earlier: d,
                later: d,
            }),
            format!("{:?}", std::process::ExitCode::from(4))
        );
        assert_eq!(
            code(TraderError::InsufficientData { have: 1, need: 2 }),
            format!("{:?}", std::process::ExitCode::from(4))
        );
    }
}
