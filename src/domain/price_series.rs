//! Ordered price series for one instrument.
//!
//! A series is either a raw feed or the derived output of a forecaster.
//! Observations are kept in chronological order; running min/max are seeded
//! from the first appended point and stay `None` while the series is empty.

use std::cmp::Ordering;
use std::fmt;

use super::error::StockcastError;
use super::observation::Observation;

/// Labels a series for downstream rendering. The forecaster never reads it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeriesKind {
    Raw,
    Sma,
    Regression,
    Smoothing,
    Hybrid,
}

impl fmt::Display for SeriesKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SeriesKind::Raw => "Raw",
            SeriesKind::Sma => "SMA",
            SeriesKind::Regression => "Regression",
            SeriesKind::Smoothing => "Smoothing",
            SeriesKind::Hybrid => "Hybrid",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    ticker: String,
    kind: SeriesKind,
    observations: Vec<Observation>,
    min_price: Option<f64>,
    max_price: Option<f64>,
}

impl PriceSeries {
    /// An empty raw series: the valid "no data" state.
    pub fn new(ticker: impl Into<String>) -> Self {
        Self::derived(ticker, SeriesKind::Raw)
    }

    pub fn derived(ticker: impl Into<String>, kind: SeriesKind) -> Self {
        PriceSeries {
            ticker: ticker.into(),
            kind,
            observations: Vec::new(),
            min_price: None,
            max_price: None,
        }
    }

    pub fn from_observations(
        ticker: impl Into<String>,
        observations: impl IntoIterator<Item = Observation>,
    ) -> Result<Self, StockcastError> {
        let mut series = Self::new(ticker);
        series.extend(observations)?;
        Ok(series)
    }

    /// Append one observation.
    ///
    /// Raw series accept only finite prices above zero; derived series accept
    /// any finite value. Timestamps earlier than the current last observation
    /// are rejected. Nothing is modified on error.
    pub fn push(&mut self, observation: Observation) -> Result<(), StockcastError> {
        let price = observation.price();
        if !price.is_finite() {
            return Err(StockcastError::invalid(format!(
                "{}: price {} is not finite",
                self.ticker, price
            )));
        }
        if self.kind == SeriesKind::Raw && price <= 0.0 {
            return Err(StockcastError::invalid(format!(
                "{}: price must be positive, got {}",
                self.ticker, price
            )));
        }
        if let Some(last) = self.observations.last()
            && observation.timestamp().chrono_cmp(&last.timestamp()) == Ordering::Less
        {
            return Err(StockcastError::invalid(format!(
                "{}: observation at {} precedes {}",
                self.ticker,
                observation.timestamp(),
                last.timestamp()
            )));
        }

        self.observations.push(observation);
        self.min_price = Some(self.min_price.map_or(price, |m| m.min(price)));
        self.max_price = Some(self.max_price.map_or(price, |m| m.max(price)));
        Ok(())
    }

    pub fn extend(
        &mut self,
        observations: impl IntoIterator<Item = Observation>,
    ) -> Result<(), StockcastError> {
        for observation in observations {
            self.push(observation)?;
        }
        Ok(())
    }

    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    pub fn kind(&self) -> SeriesKind {
        self.kind
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn get(&self, index: usize) -> Option<&Observation> {
        self.observations.get(index)
    }

    pub fn first(&self) -> Option<&Observation> {
        self.observations.first()
    }

    pub fn last(&self) -> Option<&Observation> {
        self.observations.last()
    }

    pub fn last_price(&self) -> Option<f64> {
        self.last().map(Observation::price)
    }

    pub fn count(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn min_price(&self) -> Option<f64> {
        self.min_price
    }

    pub fn max_price(&self) -> Option<f64> {
        self.max_price
    }

    pub fn prices(&self) -> Vec<f64> {
        self.observations.iter().map(Observation::price).collect()
    }
}

impl fmt::Display for PriceSeries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: [", self.ticker)?;
        for (i, obs) in self.observations.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{obs}")?;
        }
        f.write_str("]")
    }
}
