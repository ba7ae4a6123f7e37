//! Simple Moving Average.
//!
//! Output has one point per input point. Near the start the window shrinks to
//! `i + 1` points instead of being skipped, so SMA[0] equals the first price.

use crate::domain::error::StockcastError;
use crate::domain::observation::Observation;
use crate::domain::price_series::{PriceSeries, SeriesKind};

pub fn sma(series: &PriceSeries, period: usize) -> Result<PriceSeries, StockcastError> {
    if period == 0 {
        return Err(StockcastError::invalid("SMA period must be at least 1"));
    }

    let points = series.observations();
    let mut out = PriceSeries::derived(series.ticker(), SeriesKind::Sma);

    for (i, obs) in points.iter().enumerate() {
        let start = (i + 1).saturating_sub(period);
        let window = &points[start..=i];
        let sum: f64 = window.iter().map(Observation::price).sum();
        out.push(Observation::new(obs.timestamp(), sum / window.len() as f64))?;
    }

    tracing::debug!(ticker = series.ticker(), period, points = out.count(), "sma");
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn make_series(prices: &[f64]) -> PriceSeries {
        PriceSeries::from_observations(
            "TEST",
            prices.iter().enumerate().map(|(i, &p)| {
                Observation::new(NaiveDate::from_ymd_opt(2024, 1, (i + 1) as u32).unwrap(), p)
            }),
        )
        .unwrap()
    }

    #[test]
    fn sma_keeps_length() {
        let series = make_series(&[10.0, 20.0, 30.0, 40.0, 50.0]);
        let out = sma(&series, 3).unwrap();
        assert_eq!(out.count(), 5);
        assert_eq!(out.kind(), SeriesKind::Sma);
        assert_eq!(out.ticker(), "TEST");
    }

    #[test]
    fn sma_warmup_window_shrinks() {
        let series = make_series(&[10.0, 20.0, 30.0, 40.0, 50.0]);
        let out = sma(&series, 3).unwrap();
        let values = out.prices();

        assert!((values[0] - 10.0).abs() < f64::EPSILON);
        assert!((values[1] - 15.0).abs() < f64::EPSILON);
        assert!((values[2] - 20.0).abs() < f64::EPSILON);
        assert!((values[3] - 30.0).abs() < f64::EPSILON);
        assert!((values[4] - 40.0).abs() < f64::EPSILON);
    }

    #[test]
    fn sma_keeps_timestamps() {
        let series = make_series(&[10.0, 20.0, 30.0]);
        let out = sma(&series, 2).unwrap();
        for (a, b) in series.observations().iter().zip(out.observations()) {
            assert_eq!(a.timestamp(), b.timestamp());
        }
    }

    #[test]
    fn sma_period_1_is_identity() {
        let series = make_series(&[3.0, 7.0, 5.0]);
        let out = sma(&series, 1).unwrap();
        assert_eq!(out.prices(), vec![3.0, 7.0, 5.0]);
    }

    #[test]
    fn sma_period_longer_than_series() {
        let series = make_series(&[10.0, 20.0]);
        let out = sma(&series, 50).unwrap();
        assert_eq!(out.prices(), vec![10.0, 15.0]);
    }

    #[test]
    fn sma_period_0_rejected() {
        let series = make_series(&[10.0, 20.0]);
        assert!(matches!(
            sma(&series, 0),
            Err(StockcastError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn sma_empty_series() {
        let series = PriceSeries::new("EMPTY");
        let out = sma(&series, 5).unwrap();
        assert!(out.is_empty());
        assert_eq!(out.kind(), SeriesKind::Sma);
    }
}
