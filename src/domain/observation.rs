//! Single (timestamp, price) observation.

use chrono::{Days, NaiveDate, NaiveDateTime};
use std::cmp::Ordering;
use std::fmt;

/// Calendar date, optionally carrying a time of day for intraday feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Timestamp {
    Day(NaiveDate),
    Intraday(NaiveDateTime),
}

impl Timestamp {
    pub fn date(&self) -> NaiveDate {
        match self {
            Timestamp::Day(date) => *date,
            Timestamp::Intraday(dt) => dt.date(),
        }
    }

    /// Day-level timestamps sort as midnight.
    pub fn as_datetime(&self) -> NaiveDateTime {
        match self {
            Timestamp::Day(date) => date.and_time(chrono::NaiveTime::MIN),
            Timestamp::Intraday(dt) => *dt,
        }
    }

    /// The calendar day after this timestamp's date. Time of day is dropped.
    pub fn next_day(&self) -> Option<Timestamp> {
        self.date().checked_add_days(Days::new(1)).map(Timestamp::Day)
    }

    /// Chronological comparison across day and intraday timestamps.
    pub fn chrono_cmp(&self, other: &Timestamp) -> Ordering {
        self.as_datetime().cmp(&other.as_datetime())
    }
}

impl From<NaiveDate> for Timestamp {
    fn from(date: NaiveDate) -> Self {
        Timestamp::Day(date)
    }
}

impl From<NaiveDateTime> for Timestamp {
    fn from(dt: NaiveDateTime) -> Self {
        Timestamp::Intraday(dt)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Timestamp::Day(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            Timestamp::Intraday(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
        }
    }
}

/// Immutable price observation. Equality compares timestamp and price.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    timestamp: Timestamp,
    price: f64,
}

impl Observation {
    pub fn new(timestamp: impl Into<Timestamp>, price: f64) -> Self {
        Observation {
            timestamp: timestamp.into(),
            price,
        }
    }

    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }

    pub fn price(&self) -> f64 {
        self.price
    }
}

impl fmt::Display for Observation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}, {}}}", self.timestamp, self.price)
    }
}
