//! Fixed-score sentiment adapter.
//!
//! Stands in for a headline scorer when the score is already known, e.g. from
//! configuration or a command-line flag.

use crate::domain::error::StockcastError;
use crate::ports::sentiment_port::SentimentPort;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StaticSentiment {
    score: f64,
}

impl StaticSentiment {
    pub fn new(score: f64) -> Result<Self, StockcastError> {
        if !(-1.0..=1.0).contains(&score) {
            return Err(StockcastError::invalid(format!(
                "sentiment score must be within [-1, 1], got {score}"
            )));
        }
        Ok(Self { score })
    }

    pub fn neutral() -> Self {
        Self { score: 0.0 }
    }
}

impl SentimentPort for StaticSentiment {
    fn sentiment(&self, headlines: &[String]) -> f64 {
        tracing::debug!(headlines = headlines.len(), score = self.score, "static sentiment");
        self.score
    }
}
