#![allow(dead_code)]

use chrono::NaiveDate;
use std::collections::HashMap;
use stockcast::domain::error::StockcastError;
use stockcast::domain::observation::Observation;
use stockcast::domain::price_series::PriceSeries;
use stockcast::ports::price_feed_port::PriceFeedPort;

pub struct MockPriceFeed {
    pub data: HashMap<String, Vec<f64>>,
    pub errors: HashMap<String, String>,
    pub start: NaiveDate,
}

impl MockPriceFeed {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
            start: date(2024, 1, 1),
        }
    }

    pub fn with_prices(mut self, ticker: &str, prices: &[f64]) -> Self {
        self.data.insert(ticker.to_string(), prices.to_vec());
        self
    }

    pub fn with_error(mut self, ticker: &str, reason: &str) -> Self {
        self.errors.insert(ticker.to_string(), reason.to_string());
        self
    }
}

impl PriceFeedPort for MockPriceFeed {
    fn fetch_series(&self, ticker: &str) -> Result<PriceSeries, StockcastError> {
        if let Some(reason) = self.errors.get(ticker) {
            return Err(StockcastError::Feed {
                reason: reason.clone(),
            });
        }
        match self.data.get(ticker) {
            Some(prices) => Ok(make_series_from(ticker, self.start, prices)),
            None => Err(StockcastError::NoData {
                ticker: ticker.to_string(),
            }),
        }
    }

    fn list_tickers(&self) -> Result<Vec<String>, StockcastError> {
        let mut tickers: Vec<String> = self.data.keys().cloned().collect();
        tickers.sort();
        Ok(tickers)
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn make_series_from(ticker: &str, start: NaiveDate, prices: &[f64]) -> PriceSeries {
    PriceSeries::from_observations(
        ticker,
        prices
            .iter()
            .enumerate()
            .map(|(i, &p)| Observation::new(start + chrono::Duration::days(i as i64), p)),
    )
    .unwrap()
}

pub fn make_series(ticker: &str, prices: &[f64]) -> PriceSeries {
    make_series_from(ticker, date(2024, 1, 1), prices)
}

/// A rising series with a small deterministic wobble.
pub fn generate_prices(count: usize, start_price: f64) -> Vec<f64> {
    (0..count)
        .map(|i| start_price + i as f64 * 0.5 + if i % 2 == 0 { 0.3 } else { -0.3 })
        .collect()
}
