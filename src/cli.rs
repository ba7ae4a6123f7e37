//! CLI definition and dispatch.
//!
//! Progress and warnings go through `tracing` (stderr); command results are
//! printed to stdout as CSV-style lines.

use clap::{Parser, Subcommand, ValueEnum};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::str::FromStr;

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::static_sentiment::StaticSentiment;
use crate::domain::config_validation::{
    DEFAULT_RANGE, validate_data_config, validate_forecast_config, validate_ledger_config,
};
use crate::domain::error::StockcastError;
use crate::domain::forecast::hybrid::{DEFAULT_HORIZON_DIVISOR, horizon_for};
use crate::domain::forecast::{
    holt_linear_smoothing, predict_future_hybrid_points, regression_line, sma,
};
use crate::domain::ledger::{DEFAULT_STARTING_CASH, Ledger};
use crate::domain::market_sim::advance_days;
use crate::domain::price_series::PriceSeries;
use crate::domain::range_params::DisplayRange;
use crate::ports::config_port::ConfigPort;
use crate::ports::price_feed_port::PriceFeedPort;
use crate::ports::sentiment_port::SentimentPort;

#[derive(Parser, Debug)]
#[command(name = "stockcast", about = "Price forecasting and paper trading")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print forecast series for a CSV price file
    Forecast {
        #[arg(short, long)]
        data: PathBuf,
        #[arg(long)]
        ticker: Option<String>,
        #[arg(short, long, value_enum, default_value_t = Method::All)]
        method: Method,
        #[arg(long)]
        range: Option<String>,
        #[arg(long, allow_hyphen_values = true)]
        sentiment: Option<f64>,
        /// File with one headline per line, passed to the sentiment scorer
        #[arg(long)]
        headlines: Option<PathBuf>,
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Replay orders against a fresh ledger at each ticker's latest price
    Trade {
        #[arg(short, long)]
        config: PathBuf,
        /// side:TICKER:quantity, e.g. buy:AAPL:5
        #[arg(short, long = "order", required = true)]
        orders: Vec<String>,
    },
    /// Place orders, then advance the simulated market and value the ledger
    Simulate {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long, value_delimiter = ',', required = true)]
        tickers: Vec<String>,
        #[arg(long, default_value_t = 5)]
        days: usize,
        #[arg(long, default_value_t = 0)]
        seed: u64,
        #[arg(short, long = "order")]
        orders: Vec<String>,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Method {
    Sma,
    Regression,
    Smoothing,
    Hybrid,
    All,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Buy,
    Sell,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub side: Side,
    pub ticker: String,
    pub quantity: u64,
}

impl FromStr for Order {
    type Err = StockcastError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(':').map(str::trim).collect();
        let [side, ticker, quantity] = parts.as_slice() else {
            return Err(StockcastError::invalid(format!(
                "order '{s}' must look like side:TICKER:quantity"
            )));
        };
        let side = match side.to_lowercase().as_str() {
            "buy" => Side::Buy,
            "sell" => Side::Sell,
            other => {
                return Err(StockcastError::invalid(format!(
                    "unknown order side '{other}'"
                )));
            }
        };
        if ticker.is_empty() {
            return Err(StockcastError::invalid(format!("order '{s}' has no ticker")));
        }
        let quantity: u64 = quantity
            .parse()
            .map_err(|_| StockcastError::invalid(format!("invalid quantity in order '{s}'")))?;
        Ok(Order {
            side,
            ticker: ticker.to_uppercase(),
            quantity,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForecastSettings {
    pub range: DisplayRange,
    pub sentiment: f64,
    pub horizon_divisor: usize,
}

impl Default for ForecastSettings {
    fn default() -> Self {
        ForecastSettings {
            range: DisplayRange::OneMonth,
            sentiment: 0.0,
            horizon_divisor: DEFAULT_HORIZON_DIVISOR,
        }
    }
}

pub fn run(cli: Cli) -> ExitCode {
    match execute(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            (&e).into()
        }
    }
}

/// Run one command to completion.
pub fn execute(command: Command) -> Result<(), StockcastError> {
    match command {
        Command::Forecast {
            data,
            ticker,
            method,
            range,
            sentiment,
            headlines,
            config,
        } => run_forecast(
            &data,
            ticker.as_deref(),
            method,
            range.as_deref(),
            sentiment,
            headlines.as_ref(),
            config.as_ref(),
        ),
        Command::Trade { config, orders } => run_trade(&config, &orders),
        Command::Simulate {
            config,
            tickers,
            days,
            seed,
            orders,
        } => run_simulate(&config, &tickers, days, seed, &orders),
        Command::Validate { config } => run_validate(&config),
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, StockcastError> {
    tracing::info!("Loading config from {}", path.display());
    FileConfigAdapter::from_file(path).map_err(|e| StockcastError::ConfigParse {
        file: path.display().to_string(),
        reason: e.to_string(),
    })
}

pub fn build_forecast_settings(adapter: &dyn ConfigPort) -> Result<ForecastSettings, StockcastError> {
    validate_forecast_config(adapter)?;
    let range = adapter
        .get_string_or("forecast", "range", DEFAULT_RANGE)
        .parse::<DisplayRange>()?;
    let sentiment = adapter.get_double("forecast", "sentiment", 0.0);
    let divisor = adapter.get_int("forecast", "horizon_divisor", DEFAULT_HORIZON_DIVISOR as i64);
    let horizon_divisor = usize::try_from(divisor).map_err(|_| StockcastError::ConfigInvalid {
        section: "forecast".into(),
        key: "horizon_divisor".into(),
        reason: "horizon_divisor out of range".into(),
    })?;
    Ok(ForecastSettings {
        range,
        sentiment,
        horizon_divisor,
    })
}

pub fn build_ledger(adapter: &dyn ConfigPort) -> Result<Ledger, StockcastError> {
    validate_ledger_config(adapter)?;
    Ledger::new(adapter.get_double("ledger", "starting_cash", DEFAULT_STARTING_CASH))
}

pub fn build_feed(adapter: &dyn ConfigPort) -> Result<CsvAdapter, StockcastError> {
    validate_data_config(adapter)?;
    let path = adapter.get_string_or("data", "path", ".");
    Ok(CsvAdapter::new(PathBuf::from(path)))
}

/// Derived series for `method`, in SMA, regression, smoothing, hybrid order.
pub fn forecast_series(
    series: &PriceSeries,
    method: Method,
    settings: &ForecastSettings,
) -> Result<Vec<PriceSeries>, StockcastError> {
    let wants = |m: Method| method == m || method == Method::All;
    let mut out = Vec::new();

    if wants(Method::Sma) {
        out.push(sma(series, settings.range.sma_period())?);
    }
    if wants(Method::Regression) {
        out.push(regression_line(series)?);
    }
    if wants(Method::Smoothing) {
        let params = settings.range.smoothing();
        out.push(holt_linear_smoothing(series, params.alpha, params.beta)?);
    }
    if wants(Method::Hybrid) {
        let points = horizon_for(series.count(), settings.horizon_divisor)?;
        out.push(predict_future_hybrid_points(series, settings.sentiment, points)?);
    }
    Ok(out)
}

/// Apply `orders` at each ticker's latest price. Orders the ledger rejects
/// for funds or holdings are logged and skipped; returns how many filled.
pub fn execute_orders(
    ledger: &mut Ledger,
    series: &[PriceSeries],
    orders: &[Order],
) -> Result<usize, StockcastError> {
    let mut filled = 0;
    for order in orders {
        let s = series
            .iter()
            .find(|s| s.ticker() == order.ticker)
            .ok_or_else(|| StockcastError::NoData {
                ticker: order.ticker.clone(),
            })?;
        let result = match order.side {
            Side::Buy => ledger.buy_latest(s, order.quantity).map(|_| ()),
            Side::Sell => ledger.sell_latest(s, order.quantity).map(|_| ()),
        };
        match result {
            Ok(()) => filled += 1,
            Err(e) if e.is_recoverable() => {
                tracing::warn!("skipping order {:?} {}: {e}", order.side, order.ticker);
            }
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

pub fn latest_prices(series: &[PriceSeries]) -> HashMap<String, f64> {
    series
        .iter()
        .filter_map(|s| s.last_price().map(|p| (s.ticker().to_string(), p)))
        .collect()
}

pub fn parse_orders(raw: &[String]) -> Result<Vec<Order>, StockcastError> {
    raw.iter().map(|o| o.parse()).collect()
}

fn read_headlines(path: &Path) -> Result<Vec<String>, StockcastError> {
    let content = fs::read_to_string(path)?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(String::from)
        .collect())
}

fn print_series(series: &PriceSeries) {
    println!("# {} {}", series.ticker(), series.kind());
    for obs in series.observations() {
        println!("{},{:.4}", obs.timestamp(), obs.price());
    }
}

fn print_ledger(ledger: &Ledger, prices: &HashMap<String, f64>) {
    let valuation = ledger.portfolio_value(|t| prices.get(t).copied());
    println!("cash,{:.2}", ledger.cash());
    for ticker in ledger.tickers() {
        println!(
            "holding,{},{},{}",
            ticker,
            ledger.holdings(ticker),
            ledger.lots_for(ticker).len()
        );
    }
    println!("portfolio_value,{:.2}", valuation.value);
    println!(
        "profit_loss,{:.2}",
        ledger.profit_loss(|t| prices.get(t).copied())
    );
}

fn run_forecast(
    data: &Path,
    ticker: Option<&str>,
    method: Method,
    range: Option<&str>,
    sentiment: Option<f64>,
    headlines: Option<&PathBuf>,
    config: Option<&PathBuf>,
) -> Result<(), StockcastError> {
    let mut settings = match config {
        Some(path) => build_forecast_settings(&load_config(path)?)?,
        None => ForecastSettings::default(),
    };
    if let Some(label) = range {
        settings.range = label.parse()?;
    }

    let scorer = StaticSentiment::new(sentiment.unwrap_or(settings.sentiment))?;
    let headlines = match headlines {
        Some(path) => read_headlines(path)?,
        None => Vec::new(),
    };
    settings.sentiment = scorer.sentiment(&headlines);

    let label = ticker.map(str::to_string).unwrap_or_else(|| {
        data.file_stem()
            .map(|s| s.to_string_lossy().to_uppercase())
            .unwrap_or_else(|| "UNKNOWN".to_string())
    });
    let series = CsvAdapter::load_file(data, &label)?;
    tracing::info!(
        "Forecasting {} ({} points, range {}, sentiment {})",
        label,
        series.count(),
        settings.range,
        settings.sentiment
    );

    print_series(&series);
    for derived in forecast_series(&series, method, &settings)? {
        print_series(&derived);
    }
    Ok(())
}

fn run_trade(config_path: &Path, raw_orders: &[String]) -> Result<(), StockcastError> {
    let adapter = load_config(config_path)?;
    let mut ledger = build_ledger(&adapter)?;
    let feed = build_feed(&adapter)?;
    let orders = parse_orders(raw_orders)?;

    let mut tickers: Vec<String> = orders.iter().map(|o| o.ticker.clone()).collect();
    tickers.sort();
    tickers.dedup();
    let series = feed.fetch_many(&tickers)?;

    let filled = execute_orders(&mut ledger, &series, &orders)?;
    tracing::info!("Filled {} of {} orders", filled, orders.len());

    print_ledger(&ledger, &latest_prices(&series));
    Ok(())
}

fn run_simulate(
    config_path: &Path,
    tickers: &[String],
    days: usize,
    seed: u64,
    raw_orders: &[String],
) -> Result<(), StockcastError> {
    let adapter = load_config(config_path)?;
    let mut ledger = build_ledger(&adapter)?;
    let feed = build_feed(&adapter)?;
    let orders = parse_orders(raw_orders)?;

    let tickers: Vec<String> = tickers.iter().map(|t| t.trim().to_uppercase()).collect();
    let mut series = feed.fetch_many(&tickers)?;

    execute_orders(&mut ledger, &series, &orders)?;

    tracing::info!("Simulating {} days for {} tickers (seed {})", days, series.len(), seed);
    let mut rng = StdRng::seed_from_u64(seed);
    advance_days(&mut series, days, &mut rng)?;

    for s in &series {
        if let Some(last) = s.last() {
            println!("price,{},{},{:.4}", s.ticker(), last.timestamp(), last.price());
        }
    }
    print_ledger(&ledger, &latest_prices(&series));
    Ok(())
}

fn run_validate(config_path: &Path) -> Result<(), StockcastError> {
    let adapter = load_config(config_path)?;
    validate_ledger_config(&adapter)?;
    validate_forecast_config(&adapter)?;
    if adapter.get_string("data", "path").is_some() {
        validate_data_config(&adapter)?;
    }
    println!("config OK");
    Ok(())
}
