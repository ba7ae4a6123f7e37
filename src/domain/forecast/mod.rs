//! Forecasting functions over a [`PriceSeries`](crate::domain::price_series::PriceSeries).
//!
//! Every function here is pure: it reads the input series, returns a new
//! derived series tagged with its [`SeriesKind`](crate::domain::price_series::SeriesKind),
//! and never mutates shared state. An empty input yields an empty output.
//!
//! - [`sma`]: trailing simple moving average with a shrinking warmup window
//! - [`regression`]: ordinary least-squares trend line over the index
//! - [`holt`]: Holt linear (double) exponential smoothing
//! - [`hybrid`]: blended, clamped, sentiment-adjusted future path

pub mod holt;
pub mod hybrid;
pub mod regression;
pub mod sma;

pub use holt::holt_linear_smoothing;
pub use hybrid::{
    predict_future_hybrid, predict_future_hybrid_points, predict_future_hybrid_single_point,
};
pub use regression::regression_line;
pub use sma::sma;

use crate::domain::error::StockcastError;

/// Reject a smoothing factor outside `[0, 1]` (NaN included).
pub(crate) fn check_unit_interval(name: &str, value: f64) -> Result<(), StockcastError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(StockcastError::invalid(format!(
            "{name} must be within [0, 1], got {value}"
        )))
    }
}

/// Reject a sentiment score outside `[-1, 1]` (NaN included).
pub(crate) fn check_sentiment(score: f64) -> Result<(), StockcastError> {
    if (-1.0..=1.0).contains(&score) {
        Ok(())
    } else {
        Err(StockcastError::invalid(format!(
            "sentiment score must be within [-1, 1], got {score}"
        )))
    }
}
