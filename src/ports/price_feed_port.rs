//! Price acquisition port trait.

use crate::domain::error::StockcastError;
use crate::domain::price_series::PriceSeries;

pub trait PriceFeedPort {
    /// The full chronological series for `ticker`.
    fn fetch_series(&self, ticker: &str) -> Result<PriceSeries, StockcastError>;

    fn list_tickers(&self) -> Result<Vec<String>, StockcastError>;

    /// Fetch several tickers, failing on the first error.
    fn fetch_many(&self, tickers: &[String]) -> Result<Vec<PriceSeries>, StockcastError> {
        tickers.iter().map(|t| self.fetch_series(t)).collect()
    }
}
