//! CSV file price-feed adapter.
//!
//! One file per ticker, `<base>/<TICKER>.csv`, with a header row. The first
//! column is the date (`%Y-%m-%d` or `%Y-%m-%d %H:%M:%S`). The price column is
//! the one headed `price` or `close` (case-insensitive), else the second column.

use chrono::{NaiveDate, NaiveDateTime};
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::domain::error::StockcastError;
use crate::domain::observation::{Observation, Timestamp};
use crate::domain::price_series::PriceSeries;
use crate::ports::price_feed_port::PriceFeedPort;

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, ticker: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", ticker))
    }

    /// Load a single file, labelling the series with `ticker`.
    pub fn load_file(path: &Path, ticker: &str) -> Result<PriceSeries, StockcastError> {
        let file = fs::File::open(path).map_err(|e| StockcastError::Feed {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;
        parse_series(ticker, file)
    }
}

fn parse_timestamp(value: &str) -> Result<Timestamp, StockcastError> {
    let value = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(Timestamp::Day(date));
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S")
        .map(Timestamp::Intraday)
        .map_err(|e| StockcastError::Feed {
            reason: format!("invalid date '{}': {}", value, e),
        })
}

/// Parse CSV content into a chronologically sorted raw series.
pub fn parse_series(ticker: &str, reader: impl Read) -> Result<PriceSeries, StockcastError> {
    let mut rdr = csv::Reader::from_reader(reader);
    let headers = rdr.headers().map_err(|e| StockcastError::Feed {
        reason: format!("CSV header error: {}", e),
    })?;
    let price_col = headers
        .iter()
        .position(|h| {
            let h = h.trim();
            h.eq_ignore_ascii_case("price") || h.eq_ignore_ascii_case("close")
        })
        .unwrap_or(1);

    let mut observations = Vec::new();
    for result in rdr.records() {
        let record = result.map_err(|e| StockcastError::Feed {
            reason: format!("CSV parse error: {}", e),
        })?;

        let date_str = record.get(0).ok_or_else(|| StockcastError::Feed {
            reason: "missing date column".into(),
        })?;
        let timestamp = parse_timestamp(date_str)?;

        let price: f64 = record
            .get(price_col)
            .ok_or_else(|| StockcastError::Feed {
                reason: "missing price column".into(),
            })?
            .trim()
            .parse()
            .map_err(|e| StockcastError::Feed {
                reason: format!("invalid price value: {}", e),
            })?;

        observations.push(Observation::new(timestamp, price));
    }

    observations.sort_by(|a, b| a.timestamp().chrono_cmp(&b.timestamp()));
    PriceSeries::from_observations(ticker, observations)
}

impl PriceFeedPort for CsvAdapter {
    fn fetch_series(&self, ticker: &str) -> Result<PriceSeries, StockcastError> {
        let path = self.csv_path(ticker);
        if !path.exists() {
            return Err(StockcastError::NoData {
                ticker: ticker.to_string(),
            });
        }
        let series = Self::load_file(&path, ticker)?;
        tracing::debug!(ticker, points = series.count(), "loaded {}", path.display());
        Ok(series)
    }

    fn list_tickers(&self) -> Result<Vec<String>, StockcastError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| StockcastError::Feed {
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let mut tickers = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| StockcastError::Feed {
                reason: format!("directory entry error: {}", e),
            })?;
            let name = entry.file_name();
            let name_str = name.to_string_lossy();
            if let Some(ticker) = name_str.strip_suffix(".csv") {
                tickers.push(ticker.to_string());
            }
        }

        tickers.sort();
        Ok(tickers)
    }
}
