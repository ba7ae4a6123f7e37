//! Hybrid future-price prediction.
//!
//! One step blends three estimates of the next price:
//!
//! 1. mean of the last `min(5, n)` prices
//! 2. OLS over the last `min(30, n)` prices, evaluated one index past the window
//! 3. Holt smoothing (alpha 0.6, beta 0.3) over the whole series, with the final
//!    trend clamped to ±5% of the last price
//!
//! The mean of the three is clamped to `[0.5, 1.5]` times the last price and then
//! scaled by `1 + 0.1 * sentiment`. The multi-step predictor appends each step
//! to a private working copy of the input and repeats.

use super::check_sentiment;
use super::holt::HoltState;
use super::regression;
use crate::domain::error::StockcastError;
use crate::domain::observation::Observation;
use crate::domain::price_series::{PriceSeries, SeriesKind};

pub const SMA_WINDOW: usize = 5;
pub const REGRESSION_WINDOW: usize = 30;
pub const HOLT_ALPHA: f64 = 0.6;
pub const HOLT_BETA: f64 = 0.3;
pub const MAX_TREND_FRACTION: f64 = 0.05;
pub const LOWER_BAND: f64 = 0.5;
pub const UPPER_BAND: f64 = 1.5;
pub const SENTIMENT_WEIGHT: f64 = 0.1;
pub const DEFAULT_HORIZON_DIVISOR: usize = 5;

/// The components of one hybrid step, kept for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HybridEstimate {
    pub sma: f64,
    pub regression: f64,
    pub smoothing: f64,
    /// Mean of the three, after the band clamp.
    pub blended: f64,
    /// `blended` after the sentiment adjustment.
    pub adjusted: f64,
}

/// Estimate the price that follows `prices`. `None` for fewer than two prices.
pub fn estimate_next_price(prices: &[f64], sentiment: f64) -> Option<HybridEstimate> {
    let n = prices.len();
    if n < 2 {
        return None;
    }
    let last = prices[n - 1];

    let sma_window = &prices[n - SMA_WINDOW.min(n)..];
    let sma = sma_window.iter().sum::<f64>() / sma_window.len() as f64;

    let reg_window = &prices[n - REGRESSION_WINDOW.min(n)..];
    let regression = regression::fit(reg_window)?.value_at(reg_window.len() as f64);

    let state = HoltState::run(prices, HOLT_ALPHA, HOLT_BETA)?;
    let max_trend = last * MAX_TREND_FRACTION;
    let smoothing = state.level + state.trend.clamp(-max_trend, max_trend);

    let average = (sma + regression + smoothing) / 3.0;
    let blended = average.clamp(last * LOWER_BAND, last * UPPER_BAND);
    let adjusted = blended * (1.0 + SENTIMENT_WEIGHT * sentiment);

    Some(HybridEstimate {
        sma,
        regression,
        smoothing,
        blended,
        adjusted,
    })
}

/// Exactly one predicted point, dated one day after the last observation,
/// or an empty series when there are fewer than two observations.
pub fn predict_future_hybrid_single_point(
    series: &PriceSeries,
    sentiment: f64,
) -> Result<PriceSeries, StockcastError> {
    check_sentiment(sentiment)?;

    let mut out = PriceSeries::derived(series.ticker(), SeriesKind::Hybrid);
    let Some(last) = series.last() else {
        return Ok(out);
    };
    let Some(estimate) = estimate_next_price(&series.prices(), sentiment) else {
        return Ok(out);
    };
    let next = last.timestamp().next_day().ok_or_else(|| {
        StockcastError::invalid(format!(
            "{}: no calendar day after {}",
            series.ticker(),
            last.timestamp()
        ))
    })?;

    tracing::debug!(
        ticker = series.ticker(),
        sma = estimate.sma,
        regression = estimate.regression,
        smoothing = estimate.smoothing,
        blended = estimate.blended,
        sentiment,
        "hybrid step"
    );
    out.push(Observation::new(next, estimate.adjusted))?;
    Ok(out)
}

/// `max(1, n / divisor)` future points for a series of `n` observations.
pub fn horizon_for(n: usize, divisor: usize) -> Result<usize, StockcastError> {
    if divisor == 0 {
        return Err(StockcastError::invalid("horizon divisor must be at least 1"));
    }
    Ok((n / divisor).max(1))
}

pub fn default_horizon(n: usize) -> usize {
    (n / DEFAULT_HORIZON_DIVISOR).max(1)
}

/// Extend the series by `default_horizon(n)` hybrid predictions.
pub fn predict_future_hybrid(
    series: &PriceSeries,
    sentiment: f64,
) -> Result<PriceSeries, StockcastError> {
    predict_future_hybrid_points(series, sentiment, default_horizon(series.count()))
}

/// Extend the series by up to `num_points` hybrid predictions.
///
/// The output starts with the last historical observation as a plotting
/// anchor, followed by the predictions in date order. Each step runs on a
/// private copy of the input with the earlier predictions appended, so the
/// caller's series is never touched and repeated calls give identical output.
pub fn predict_future_hybrid_points(
    series: &PriceSeries,
    sentiment: f64,
    num_points: usize,
) -> Result<PriceSeries, StockcastError> {
    check_sentiment(sentiment)?;

    let mut out = PriceSeries::derived(series.ticker(), SeriesKind::Hybrid);
    let Some(anchor) = series.last() else {
        return Ok(out);
    };
    out.push(*anchor)?;

    let mut working = series.clone();
    for _ in 0..num_points {
        let step = predict_future_hybrid_single_point(&working, sentiment)?;
        let Some(prediction) = step.last().copied() else {
            break;
        };
        out.push(prediction)?;
        working.push(prediction)?;
    }

    tracing::debug!(
        ticker = series.ticker(),
        requested = num_points,
        produced = out.count().saturating_sub(1),
        "hybrid forecast"
    );
    Ok(out)
}
