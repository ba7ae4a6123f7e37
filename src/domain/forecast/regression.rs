//! Ordinary least-squares trend line.
//!
//! x is the observation index (0..n-1), y is the price. A single point fits a
//! flat line through that point.

use crate::domain::error::StockcastError;
use crate::domain::observation::Observation;
use crate::domain::price_series::{PriceSeries, SeriesKind};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OlsFit {
    pub slope: f64,
    pub intercept: f64,
}

impl OlsFit {
    pub fn value_at(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Fit `price = slope * index + intercept`. `None` for an empty slice.
pub fn fit(prices: &[f64]) -> Option<OlsFit> {
    match prices {
        [] => None,
        [only] => Some(OlsFit {
            slope: 0.0,
            intercept: *only,
        }),
        _ => {
            let n = prices.len() as f64;
            let (mut sum_x, mut sum_y, mut sum_xy, mut sum_x2) = (0.0, 0.0, 0.0, 0.0);
            for (i, &y) in prices.iter().enumerate() {
                let x = i as f64;
                sum_x += x;
                sum_y += y;
                sum_xy += x * y;
                sum_x2 += x * x;
            }
            let slope = (n * sum_xy - sum_x * sum_y) / (n * sum_x2 - sum_x * sum_x);
            let intercept = (sum_y - slope * sum_x) / n;
            Some(OlsFit { slope, intercept })
        }
    }
}

/// Fitted value at every observation's timestamp.
pub fn regression_line(series: &PriceSeries) -> Result<PriceSeries, StockcastError> {
    let mut out = PriceSeries::derived(series.ticker(), SeriesKind::Regression);
    let Some(line) = fit(&series.prices()) else {
        return Ok(out);
    };

    for (i, obs) in series.observations().iter().enumerate() {
        out.push(Observation::new(obs.timestamp(), line.value_at(i as f64)))?;
    }

    tracing::debug!(
        ticker = series.ticker(),
        slope = line.slope,
        intercept = line.intercept,
        "regression line"
    );
    Ok(out)
}

/// Extrapolate the whole-series fit one index past the end.
pub fn predict_next_price(series: &PriceSeries) -> Option<f64> {
    fit(&series.prices()).map(|line| line.value_at(series.count() as f64))
}
