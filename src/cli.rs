//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info, warn};

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::csv_report_adapter::CsvReportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::order_csv::{read_orders, write_orders};
use crate::domain::backtest::{self as engine, Assessment, BacktestConfig, BacktestResult};
use crate::domain::config_validation::{validate_backtest_config, validate_technical_config};
use crate::domain::error::TraderError;
use crate::domain::metrics::PerformanceReport;
use crate::domain::portfolio::SimulationConfig;
use crate::domain::strategy::{
    BaselineStrategy, OracleStrategy, Strategy, TechnicalConfig, TechnicalStrategy, entry_dates,
};
use crate::ports::config_port::ConfigPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "tradelab", about = "Single-symbol trading strategy backtester")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum StrategyKind {
    Oracle,
    Baseline,
    Technical,
}

/// Values that take precedence over the `[backtest]` section.
#[derive(Args, Debug, Clone, Default)]
pub struct Overrides {
    #[arg(long)]
    pub symbol: Option<String>,
    #[arg(long, value_parser = parse_date)]
    pub start: Option<NaiveDate>,
    #[arg(long, value_parser = parse_date)]
    pub end: Option<NaiveDate>,
    #[arg(long)]
    pub data_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run one strategy and print its performance summary
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long, value_enum, default_value_t = StrategyKind::Technical)]
        strategy: StrategyKind,
        /// Write the generated orders as Date,Shares CSV
        #[arg(long)]
        orders_out: Option<PathBuf>,
        #[command(flatten)]
        overrides: Overrides,
    },
    /// Run oracle, baseline and technical side by side
    Compare {
        #[arg(short, long)]
        config: PathBuf,
        /// Write daily cumulative returns of every strategy as CSV
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[command(flatten)]
        overrides: Overrides,
    },
    /// Simulate and analyse an existing order file
    Assess {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        orders: PathBuf,
        #[command(flatten)]
        overrides: Overrides,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| format!("invalid date {raw:?} (expected YYYY-MM-DD)"))
}

pub fn run(cli: Cli) -> ExitCode {
    let outcome = match cli.command {
        Command::Backtest {
            config,
            strategy,
            orders_out,
            overrides,
        } => run_backtest(&config, strategy, orders_out.as_deref(), &overrides),
        Command::Compare {
            config,
            output,
            overrides,
        } => run_compare(&config, output.as_deref(), &overrides),
        Command::Assess {
            config,
            orders,
            overrides,
        } => run_assess(&config, &orders, &overrides),
        Command::Validate { config } => run_validate(&config),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            (&e).into()
        }
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, TraderError> {
    info!(path = %path.display(), "loading config");
    FileConfigAdapter::from_file(path)
}

fn required_date(adapter: &dyn ConfigPort, key: &str) -> Result<NaiveDate, TraderError> {
    match adapter.get_date("backtest", key) {
        Some(Ok(date)) => Ok(date),
        Some(Err(raw)) => Err(TraderError::invalid(
            "backtest",
            key,
            format!("invalid date {raw:?} (expected YYYY-MM-DD)"),
        )),
        None => Err(TraderError::ConfigMissing {
            section: "backtest".into(),
            key: key.into(),
        }),
    }
}

fn number_or(
    adapter: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: f64,
) -> Result<f64, TraderError> {
    match adapter.get_number(section, key) {
        Some(Ok(v)) => Ok(v),
        Some(Err(raw)) => Err(TraderError::invalid(
            section,
            key,
            format!("{raw:?} is not a number"),
        )),
        None => Ok(default),
    }
}

fn integer_or<T: std::str::FromStr>(
    adapter: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: T,
) -> Result<T, TraderError> {
    match adapter.get_string(section, key) {
        Some(raw) => raw.trim().parse().map_err(|_| {
            TraderError::invalid(section, key, format!("{raw:?} is not a valid whole number"))
        }),
        None => Ok(default),
    }
}

pub fn build_backtest_config(
    adapter: &dyn ConfigPort,
    overrides: &Overrides,
) -> Result<BacktestConfig, TraderError> {
    let defaults = SimulationConfig::default();

    let symbol = match &overrides.symbol {
        Some(s) => s.trim().to_uppercase(),
        None => adapter
            .get_string("backtest", "symbol")
            .map(|s| s.trim().to_uppercase())
            .unwrap_or_else(|| "DIS".to_string()),
    };
    let start_date = match overrides.start {
        Some(d) => d,
        None => required_date(adapter, "start_date")?,
    };
    let end_date = match overrides.end {
        Some(d) => d,
        None => required_date(adapter, "end_date")?,
    };

    Ok(BacktestConfig {
        symbol,
        start_date,
        end_date,
        starting_cash: number_or(adapter, "backtest", "starting_cash", defaults.starting_cash)?,
        fixed_cost: number_or(adapter, "backtest", "fixed_cost", defaults.fixed_cost)?,
        floating_cost: number_or(adapter, "backtest", "floating_cost", defaults.floating_cost)?,
        risk_free_rate: number_or(adapter, "backtest", "risk_free_rate", 0.0)?,
        annualization_factor: number_or(
            adapter,
            "backtest",
            "annualization_factor",
            crate::domain::metrics::TRADING_DAYS_PER_YEAR,
        )?,
    })
}

pub fn build_technical_config(adapter: &dyn ConfigPort) -> Result<TechnicalConfig, TraderError> {
    let d = TechnicalConfig::default();
    Ok(TechnicalConfig {
        rsi_period: integer_or(adapter, "technical", "rsi_period", d.rsi_period)?,
        rsi_overbought: number_or(adapter, "technical", "rsi_overbought", d.rsi_overbought)?,
        rsi_oversold: number_or(adapter, "technical", "rsi_oversold", d.rsi_oversold)?,
        macd_fast: integer_or(adapter, "technical", "macd_fast", d.macd_fast)?,
        macd_slow: integer_or(adapter, "technical", "macd_slow", d.macd_slow)?,
        macd_threshold: number_or(adapter, "technical", "macd_threshold", d.macd_threshold)?,
        bollinger_window: integer_or(adapter, "technical", "bollinger_window", d.bollinger_window)?,
        bollinger_num_std: number_or(
            adapter,
            "technical",
            "bollinger_num_std",
            d.bollinger_num_std,
        )?,
        use_bollinger: adapter.get_bool("technical", "use_bollinger", d.use_bollinger),
        warmup_days: integer_or(adapter, "technical", "warmup_days", d.warmup_days)?,
    })
}

pub fn build_data_port(adapter: &dyn ConfigPort, overrides: &Overrides) -> CsvAdapter {
    let data_dir = overrides.data_dir.clone().unwrap_or_else(|| {
        PathBuf::from(
            adapter
                .get_string("backtest", "data_dir")
                .unwrap_or_else(|| "./data".to_string()),
        )
    });
    let port = CsvAdapter::new(data_dir);
    match adapter
        .get_string("backtest", "calendar_symbol")
        .map(|s| s.trim().to_uppercase())
        .filter(|s| !s.is_empty())
    {
        Some(calendar) => port.with_calendar(calendar),
        None => port,
    }
}

pub fn build_strategy(kind: StrategyKind, technical: &TechnicalConfig) -> Box<dyn Strategy> {
    match kind {
        StrategyKind::Oracle => Box::new(OracleStrategy),
        StrategyKind::Baseline => Box::new(BaselineStrategy),
        StrategyKind::Technical => Box::new(TechnicalStrategy::new(technical.clone())),
    }
}

/// Load, build and validate both config sections.
fn resolve_configs(
    config_path: &Path,
    overrides: &Overrides,
) -> Result<(FileConfigAdapter, BacktestConfig, TechnicalConfig), TraderError> {
    let adapter = load_config(config_path)?;
    let bt_config = build_backtest_config(&adapter, overrides)?;
    validate_backtest_config(&bt_config)?;
    let technical = build_technical_config(&adapter)?;
    validate_technical_config(&technical)?;
    Ok((adapter, bt_config, technical))
}

fn format_sharpe(sharpe: Option<f64>) -> String {
    match sharpe {
        Some(v) => format!("{v:.4}"),
        None => "n/a".to_string(),
    }
}

fn print_report(title: &str, report: &PerformanceReport) {
    println!("=== {title} ===");
    println!("Cumulative Return:      {:.6}", report.cumulative_return);
    println!("Average Daily Return:   {:.6}", report.average_daily_return);
    println!("Stdev Daily Return:     {:.6}", report.stdev_daily_return);
    println!("Sharpe Ratio:           {}", format_sharpe(report.sharpe_ratio));
    println!("Max Drawdown:           -{:.2}%", report.max_drawdown * 100.0);
    println!("End Value:              {:.2}", report.end_value);
}

fn print_result(result: &BacktestResult) {
    print_report(&result.strategy_name, &result.report);
    let (longs, shorts) = entry_dates(&result.orders);
    println!("Trades:                 {}", result.simulation.trade_count);
    println!("Fees Paid:              {:.2}", result.simulation.fees_paid);
    println!("Long Entries:           {}", longs.len());
    println!("Short Entries:          {}", shorts.len());
    if !result.simulation.skipped_orders.is_empty() {
        println!(
            "Skipped Orders:         {}",
            result.simulation.skipped_orders.len()
        );
    }
}

fn run_backtest(
    config_path: &Path,
    kind: StrategyKind,
    orders_out: Option<&Path>,
    overrides: &Overrides,
) -> Result<(), TraderError> {
    let (adapter, bt_config, technical) = resolve_configs(config_path, overrides)?;
    let data_port = build_data_port(&adapter, overrides);
    let strategy = build_strategy(kind, &technical);

    let result = engine::run_backtest(strategy.as_ref(), &data_port, &bt_config)?;
    print_result(&result);

    if let Some(path) = orders_out {
        write_orders(path, &result.orders)?;
        info!(path = %path.display(), orders = result.orders.len(), "orders written");
    }
    Ok(())
}

fn run_compare(
    config_path: &Path,
    output: Option<&Path>,
    overrides: &Overrides,
) -> Result<(), TraderError> {
    let (adapter, bt_config, technical) = resolve_configs(config_path, overrides)?;
    let data_port = build_data_port(&adapter, overrides);
    let strategies: Vec<Box<dyn Strategy>> = [
        StrategyKind::Oracle,
        StrategyKind::Baseline,
        StrategyKind::Technical,
    ]
    .into_iter()
    .map(|kind| build_strategy(kind, &technical))
    .collect();

    let mut results = Vec::with_capacity(strategies.len());
    let mut first_error = None;
    for outcome in engine::run_many(&strategies, &data_port, &bt_config) {
        match outcome {
            Ok(result) => {
                print_result(&result);
                println!();
                results.push(result);
            }
            Err(e) => {
                warn!("strategy failed: {e}");
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
        }
    }

    if let Some(path) = output {
        let path_str = path.to_string_lossy();
        CsvReportAdapter::new().write(&results, &path_str)?;
        info!(path = %path_str, strategies = results.len(), "cumulative returns written");
    }

    match first_error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

fn run_assess(
    config_path: &Path,
    orders_path: &Path,
    overrides: &Overrides,
) -> Result<(), TraderError> {
    let adapter = load_config(config_path)?;
    let bt_config = build_backtest_config(&adapter, overrides)?;
    validate_backtest_config(&bt_config)?;
    let data_port = build_data_port(&adapter, overrides);

    let orders = read_orders(orders_path)?;
    info!(path = %orders_path.display(), orders = orders.len(), "orders loaded");

    let prices = engine::prices_for_orders(&data_port, &bt_config.symbol, &orders)?;
    let Assessment { simulation, report } = engine::assess(
        &orders,
        &prices,
        &bt_config.simulation(),
        &bt_config.analysis(),
    )?;

    print_report(&orders_path.display().to_string(), &report);
    println!("Trades:                 {}", simulation.trade_count);
    println!("Fees Paid:              {:.2}", simulation.fees_paid);
    Ok(())
}

fn run_validate(config_path: &Path) -> Result<(), TraderError> {
    let (_, bt_config, technical) = resolve_configs(config_path, &Overrides::default())?;
    println!(
        "{}: {} to {}, starting cash {:.2}",
        bt_config.symbol, bt_config.start_date, bt_config.end_date, bt_config.starting_cash
    );
    println!(
        "technical: RSI({}) {}/{}, MACD({},{}) threshold {}{}",
        technical.rsi_period,
        technical.rsi_oversold,
        technical.rsi_overbought,
        technical.macd_fast,
        technical.macd_slow,
        technical.macd_threshold,
        if technical.use_bollinger {
            format!(
                ", BOLLINGER({},{})",
                technical.bollinger_window, technical.bollinger_num_std
            )
        } else {
            String::new()
        }
    );
    println!("Configuration is valid.");
    Ok(())
}
