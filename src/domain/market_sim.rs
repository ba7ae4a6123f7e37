//! Simulated market days.
//!
//! Each simulated day appends one hybrid prediction to every series, using a
//! random sentiment drawn from `[-0.25, 0.25)` so prices wander instead of
//! following the deterministic forecast.

use rand::Rng;

use super::error::StockcastError;
use super::forecast::predict_future_hybrid_single_point;
use super::price_series::PriceSeries;

pub const SENTIMENT_SPREAD: f64 = 0.25;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DayReport {
    pub advanced: Vec<String>,
    /// Series with fewer than two observations; left unchanged.
    pub skipped: Vec<String>,
}

pub fn draw_sentiment<R: Rng>(rng: &mut R) -> f64 {
    rng.gen_range(-SENTIMENT_SPREAD..SENTIMENT_SPREAD)
}

/// Append one simulated day to every series.
pub fn advance_day<R: Rng>(
    series: &mut [PriceSeries],
    rng: &mut R,
) -> Result<DayReport, StockcastError> {
    let mut report = DayReport::default();

    for s in series.iter_mut() {
        let sentiment = draw_sentiment(rng);
        let step = predict_future_hybrid_single_point(s, sentiment)?;
        match step.last() {
            Some(next) => {
                s.push(*next)?;
                report.advanced.push(s.ticker().to_string());
            }
            None => {
                tracing::warn!(ticker = s.ticker(), "not enough history to simulate");
                report.skipped.push(s.ticker().to_string());
            }
        }
    }

    Ok(report)
}

/// Run `days` simulated days back to back.
pub fn advance_days<R: Rng>(
    series: &mut [PriceSeries],
    days: usize,
    rng: &mut R,
) -> Result<(), StockcastError> {
    for day in 0..days {
        let report = advance_day(series, rng)?;
        tracing::debug!(day, advanced = report.advanced.len(), "simulated day");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::observation::{Observation, Timestamp};
    use chrono::NaiveDate;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn make_series(ticker: &str, prices: &[f64]) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        PriceSeries::from_observations(
            ticker,
            prices.iter().enumerate().map(|(i, &p)| {
                Observation::new(start + chrono::Duration::days(i as i64), p)
            }),
        )
        .unwrap()
    }

    #[test]
    fn sentiment_within_spread() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let s = draw_sentiment(&mut rng);
            assert!((-SENTIMENT_SPREAD..SENTIMENT_SPREAD).contains(&s));
        }
    }

    #[test]
    fn advance_appends_one_point() {
        let mut series = vec![
            make_series("A", &[10.0, 11.0, 12.0]),
            make_series("B", &[50.0, 49.0]),
        ];
        let mut rng = StdRng::seed_from_u64(42);
        let report = advance_day(&mut series, &mut rng).unwrap();

        assert_eq!(report.advanced, vec!["A".to_string(), "B".to_string()]);
        assert!(report.skipped.is_empty());
        assert_eq!(series[0].count(), 4);
        assert_eq!(series[1].count(), 3);
        let next = NaiveDate::from_ymd_opt(2024, 5, 4).unwrap();
        assert_eq!(series[0].last().unwrap().timestamp(), Timestamp::Day(next));
    }

    #[test]
    fn advance_skips_short_series() {
        let mut series = vec![make_series("A", &[10.0])];
        let mut rng = StdRng::seed_from_u64(1);
        let report = advance_day(&mut series, &mut rng).unwrap();
        assert_eq!(report.skipped, vec!["A".to_string()]);
        assert_eq!(series[0].count(), 1);
    }

    #[test]
    fn same_seed_same_path() {
        let base = vec![make_series("A", &[10.0, 10.5, 10.2, 10.8])];
        let mut a = base.clone();
        let mut b = base.clone();
        advance_days(&mut a, 10, &mut StdRng::seed_from_u64(99)).unwrap();
        advance_days(&mut b, 10, &mut StdRng::seed_from_u64(99)).unwrap();
        assert_eq!(a, b);
        assert_eq!(a[0].count(), 14);
    }

    #[test]
    fn simulated_prices_stay_positive() {
        let mut series = vec![make_series("A", &[100.0, 60.0, 30.0, 15.0])];
        advance_days(&mut series, 30, &mut StdRng::seed_from_u64(3)).unwrap();
        assert!(series[0].min_price().unwrap() > 0.0);
    }
}
