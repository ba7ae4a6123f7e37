//! Holt linear (double) exponential smoothing.
//!
//! L0 = P0, T0 = P1 - P0. For t >= 1:
//!   L' = alpha*P[t] + (1-alpha)*(L+T)
//!   T' = beta*(L'-L) + (1-beta)*T
//! and the emitted value is L' + T'. The seed point is not emitted, so the
//! output has n-1 points; fewer than two inputs give an empty output.

use super::check_unit_interval;
use crate::domain::error::StockcastError;
use crate::domain::observation::Observation;
use crate::domain::price_series::{PriceSeries, SeriesKind};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoltState {
    pub level: f64,
    pub trend: f64,
}

impl HoltState {
    /// Seed from the first two prices. `None` if fewer than two.
    pub fn seed(prices: &[f64]) -> Option<Self> {
        match prices {
            [first, second, ..] => Some(HoltState {
                level: *first,
                trend: second - first,
            }),
            _ => None,
        }
    }

    /// Fold one price in and return the one-step forecast `level + trend`.
    pub fn update(&mut self, price: f64, alpha: f64, beta: f64) -> f64 {
        let level = alpha * price + (1.0 - alpha) * (self.level + self.trend);
        let trend = beta * (level - self.level) + (1.0 - beta) * self.trend;
        self.level = level;
        self.trend = trend;
        level + trend
    }

    /// Run over every price after the seed point.
    pub fn run(prices: &[f64], alpha: f64, beta: f64) -> Option<Self> {
        let mut state = Self::seed(prices)?;
        for &price in &prices[1..] {
            state.update(price, alpha, beta);
        }
        Some(state)
    }
}

pub fn holt_linear_smoothing(
    series: &PriceSeries,
    alpha: f64,
    beta: f64,
) -> Result<PriceSeries, StockcastError> {
    check_unit_interval("alpha", alpha)?;
    check_unit_interval("beta", beta)?;

    let mut out = PriceSeries::derived(series.ticker(), SeriesKind::Smoothing);
    let points = series.observations();
    let Some(mut state) = HoltState::seed(&series.prices()) else {
        return Ok(out);
    };

    for obs in &points[1..] {
        let value = state.update(obs.price(), alpha, beta);
        out.push(Observation::new(obs.timestamp(), value))?;
    }

    tracing::debug!(
        ticker = series.ticker(),
        alpha,
        beta,
        level = state.level,
        trend = state.trend,
        "holt smoothing"
    );
    Ok(out)
}
