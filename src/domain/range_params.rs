//! Per-display-range forecaster parameters.
//!
//! Wider chart ranges use a longer SMA window and a smaller level-smoothing
//! factor. These tables feed the user-selectable SMA and smoothing views; the
//! hybrid predictor uses its own fixed parameters.

use std::fmt;
use std::str::FromStr;

use super::error::StockcastError;

pub const DEFAULT_SMA_PERIOD: usize = 5;
pub const DEFAULT_SMOOTHING: SmoothingParams = SmoothingParams {
    alpha: 0.7,
    beta: 0.3,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DisplayRange {
    OneWeek,
    OneMonth,
    ThreeMonths,
    SixMonths,
    OneYear,
    FiveYears,
    Max,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmoothingParams {
    pub alpha: f64,
    pub beta: f64,
}

impl DisplayRange {
    pub const ALL: [DisplayRange; 7] = [
        DisplayRange::OneWeek,
        DisplayRange::OneMonth,
        DisplayRange::ThreeMonths,
        DisplayRange::SixMonths,
        DisplayRange::OneYear,
        DisplayRange::FiveYears,
        DisplayRange::Max,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            DisplayRange::OneWeek => "1W",
            DisplayRange::OneMonth => "1M",
            DisplayRange::ThreeMonths => "3M",
            DisplayRange::SixMonths => "6M",
            DisplayRange::OneYear => "1Y",
            DisplayRange::FiveYears => "5Y",
            DisplayRange::Max => "MAX",
        }
    }

    pub fn sma_period(&self) -> usize {
        match self {
            DisplayRange::OneWeek => 2,
            DisplayRange::OneMonth => 5,
            DisplayRange::ThreeMonths => 10,
            DisplayRange::SixMonths => 20,
            DisplayRange::OneYear => 50,
            DisplayRange::FiveYears => 100,
            DisplayRange::Max => 200,
        }
    }

    pub fn smoothing(&self) -> SmoothingParams {
        let alpha = match self {
            DisplayRange::OneWeek => 0.9,
            DisplayRange::OneMonth => 0.8,
            DisplayRange::ThreeMonths => 0.7,
            DisplayRange::SixMonths => 0.6,
            DisplayRange::OneYear => 0.5,
            DisplayRange::FiveYears => 0.4,
            DisplayRange::Max => 0.3,
        };
        SmoothingParams { alpha, beta: 0.3 }
    }
}

impl fmt::Display for DisplayRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DisplayRange {
    type Err = StockcastError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        DisplayRange::ALL
            .into_iter()
            .find(|r| r.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| StockcastError::invalid(format!("unknown display range '{s}'")))
    }
}

/// SMA period for a range label, falling back to the default for unknown labels.
pub fn sma_period_for_label(label: &str) -> usize {
    label
        .parse::<DisplayRange>()
        .map_or(DEFAULT_SMA_PERIOD, |r| r.sma_period())
}

/// Holt parameters for a range label, falling back to the default for unknown labels.
pub fn smoothing_for_label(label: &str) -> SmoothingParams {
    label
        .parse::<DisplayRange>()
        .map_or(DEFAULT_SMOOTHING, |r| r.smoothing())
}
