//! Paper-trading ledger: cash plus FIFO purchase lots per ticker.
//!
//! Every mutating call either applies completely or returns an error and
//! leaves cash, lots and the simulated date untouched. Cash never goes below
//! zero and a lot never holds fewer than one share.
//!
//! A `Ledger` is a plain value; sharing one across threads needs a `Mutex`.

use chrono::NaiveDate;
use std::collections::BTreeMap;

use super::error::StockcastError;
use super::lot::{Lot, LotFill, SellReceipt};
use super::price_series::PriceSeries;

pub const DEFAULT_STARTING_CASH: f64 = 10_000.0;

/// Market value of the open lots, plus the tickers that had no usable price.
#[derive(Debug, Clone, PartialEq)]
pub struct Valuation {
    pub value: f64,
    pub unpriced: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Ledger {
    starting_cash: f64,
    cash: f64,
    lots: BTreeMap<String, Vec<Lot>>,
    simulated_date: NaiveDate,
}

impl Default for Ledger {
    fn default() -> Self {
        Ledger {
            starting_cash: DEFAULT_STARTING_CASH,
            cash: DEFAULT_STARTING_CASH,
            lots: BTreeMap::new(),
            simulated_date: NaiveDate::default(),
        }
    }
}

fn check_price(price: f64) -> Result<(), StockcastError> {
    if price.is_finite() && price > 0.0 {
        Ok(())
    } else {
        Err(StockcastError::invalid(format!(
            "price per share must be positive, got {price}"
        )))
    }
}

fn check_quantity(quantity: u64) -> Result<(), StockcastError> {
    if quantity > 0 {
        Ok(())
    } else {
        Err(StockcastError::invalid("quantity must be at least 1"))
    }
}

impl Ledger {
    pub fn new(starting_cash: f64) -> Result<Self, StockcastError> {
        if !starting_cash.is_finite() || starting_cash < 0.0 {
            return Err(StockcastError::invalid(format!(
                "starting cash must be non-negative, got {starting_cash}"
            )));
        }
        Ok(Ledger {
            starting_cash,
            cash: starting_cash,
            ..Ledger::default()
        })
    }

    pub fn cash(&self) -> f64 {
        self.cash
    }

    pub fn starting_cash(&self) -> f64 {
        self.starting_cash
    }

    /// Date stamped on lots bought through [`Ledger::buy`].
    pub fn simulated_date(&self) -> NaiveDate {
        self.simulated_date
    }

    pub fn set_simulated_date(&mut self, date: NaiveDate) {
        self.simulated_date = date;
    }

    /// Total shares held across all lots of `ticker`.
    pub fn holdings(&self, ticker: &str) -> u64 {
        self.lots_for(ticker).iter().map(|lot| lot.shares).sum()
    }

    /// Open lots for `ticker`, oldest first.
    pub fn lots_for(&self, ticker: &str) -> &[Lot] {
        self.lots.get(ticker).map(Vec::as_slice).unwrap_or_default()
    }

    /// Every open lot, grouped by ticker in name order, oldest first within a ticker.
    pub fn lots(&self) -> impl Iterator<Item = &Lot> {
        self.lots.values().flatten()
    }

    /// Tickers with at least one open lot, in name order.
    pub fn tickers(&self) -> impl Iterator<Item = &str> {
        self.lots.keys().map(String::as_str)
    }

    /// Buy `quantity` shares at `price_per_share`, dated at the simulated date.
    pub fn buy(
        &mut self,
        ticker: &str,
        price_per_share: f64,
        quantity: u64,
    ) -> Result<Lot, StockcastError> {
        self.buy_on(ticker, price_per_share, quantity, self.simulated_date)
    }

    fn buy_on(
        &mut self,
        ticker: &str,
        price_per_share: f64,
        quantity: u64,
        date: NaiveDate,
    ) -> Result<Lot, StockcastError> {
        check_price(price_per_share)?;
        check_quantity(quantity)?;
        if ticker.trim().is_empty() {
            return Err(StockcastError::invalid("ticker must not be empty"));
        }
        if self.holdings(ticker).checked_add(quantity).is_none() {
            return Err(StockcastError::invalid(format!(
                "holding more than {} shares of {ticker} is not supported",
                u64::MAX
            )));
        }

        let cost = price_per_share * quantity as f64;
        if !cost.is_finite() {
            return Err(StockcastError::invalid(format!(
                "order cost for {quantity} x {price_per_share} overflows"
            )));
        }
        if cost > self.cash {
            tracing::warn!(ticker, quantity, cost, cash = self.cash, "buy rejected");
            return Err(StockcastError::InsufficientFunds {
                ticker: ticker.to_string(),
                required: cost,
                available: self.cash,
            });
        }

        let lot = Lot {
            ticker: ticker.to_string(),
            acquired_on: date,
            shares: quantity,
            cost_basis_per_share: price_per_share,
        };
        self.cash -= cost;
        self.lots
            .entry(ticker.to_string())
            .or_default()
            .push(lot.clone());

        tracing::info!(ticker, quantity, price_per_share, cash = self.cash, "bought");
        Ok(lot)
    }

    /// Sell `quantity` shares of `ticker`, consuming lots oldest first.
    ///
    /// Cash is credited `price_per_share * quantity` once; the receipt lists
    /// how many shares came out of each lot.
    pub fn sell(
        &mut self,
        ticker: &str,
        price_per_share: f64,
        quantity: u64,
    ) -> Result<SellReceipt, StockcastError> {
        check_price(price_per_share)?;
        check_quantity(quantity)?;

        let held = self.holdings(ticker);
        if held < quantity {
            tracing::warn!(ticker, quantity, held, "sell rejected");
            return Err(StockcastError::InsufficientHoldings {
                ticker: ticker.to_string(),
                requested: quantity,
                held,
            });
        }

        let Some(queue) = self.lots.get_mut(ticker) else {
            return Err(StockcastError::InsufficientHoldings {
                ticker: ticker.to_string(),
                requested: quantity,
                held: 0,
            });
        };

        let mut remaining = quantity;
        let mut fills = Vec::new();
        for lot in queue.iter_mut() {
            if remaining == 0 {
                break;
            }
            let taken = remaining.min(lot.shares);
            fills.push(LotFill {
                acquired_on: lot.acquired_on,
                shares: taken,
                cost_basis_per_share: lot.cost_basis_per_share,
                sale_price: price_per_share,
            });
            lot.shares -= taken;
            remaining -= taken;
        }
        queue.retain(|lot| lot.shares > 0);
        if queue.is_empty() {
            self.lots.remove(ticker);
        }

        let proceeds = price_per_share * quantity as f64;
        self.cash += proceeds;

        tracing::info!(
            ticker,
            quantity,
            price_per_share,
            lots_touched = fills.len(),
            cash = self.cash,
            "sold"
        );
        Ok(SellReceipt {
            ticker: ticker.to_string(),
            quantity,
            price_per_share,
            proceeds,
            fills,
        })
    }

    /// Buy at the latest observation's price and move the simulated date to it.
    pub fn buy_latest(
        &mut self,
        series: &PriceSeries,
        quantity: u64,
    ) -> Result<Lot, StockcastError> {
        let last = series.last().ok_or_else(|| StockcastError::NoData {
            ticker: series.ticker().to_string(),
        })?;
        let lot = self.buy_on(series.ticker(), last.price(), quantity, last.date())?;
        self.simulated_date = last.date();
        Ok(lot)
    }

    /// Sell at the latest observation's price and move the simulated date to it.
    pub fn sell_latest(
        &mut self,
        series: &PriceSeries,
        quantity: u64,
    ) -> Result<SellReceipt, StockcastError> {
        let last = series.last().ok_or_else(|| StockcastError::NoData {
            ticker: series.ticker().to_string(),
        })?;
        let receipt = self.sell(series.ticker(), last.price(), quantity)?;
        self.simulated_date = last.date();
        Ok(receipt)
    }

    /// Value open lots with `price_lookup`. Tickers without a finite positive
    /// price contribute nothing and are listed in [`Valuation::unpriced`].
    pub fn portfolio_value(&self, price_lookup: impl Fn(&str) -> Option<f64>) -> Valuation {
        let mut value = 0.0;
        let mut unpriced = Vec::new();

        for (ticker, lots) in &self.lots {
            match price_lookup(ticker) {
                Some(price) if price.is_finite() && price > 0.0 => {
                    value += lots.iter().map(|lot| lot.market_value(price)).sum::<f64>();
                }
                _ => {
                    tracing::warn!(ticker = ticker.as_str(), "no current price available");
                    unpriced.push(ticker.clone());
                }
            }
        }

        Valuation { value, unpriced }
    }

    /// `cash + portfolio value - starting cash`.
    pub fn profit_loss(&self, price_lookup: impl Fn(&str) -> Option<f64>) -> f64 {
        self.cash + self.portfolio_value(price_lookup).value - self.starting_cash
    }

    /// Restore the starting cash and drop every lot.
    pub fn reset(&mut self) {
        self.cash = self.starting_cash;
        self.lots.clear();
        tracing::info!(cash = self.cash, "ledger reset");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::observation::Observation;
    use std::collections::HashMap;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn no_prices(_: &str) -> Option<f64> {
        None
    }

    #[test]
    fn new_ledger() {
        let ledger = Ledger::default();
        assert!((ledger.cash() - 10_000.0).abs() < f64::EPSILON);
        assert!((ledger.starting_cash() - 10_000.0).abs() < f64::EPSILON);
        assert_eq!(ledger.lots().count(), 0);
    }

    #[test]
    fn new_rejects_negative_cash() {
        assert!(Ledger::new(-1.0).is_err());
        assert!(Ledger::new(f64::NAN).is_err());
        assert!(Ledger::new(0.0).is_ok());
    }

    #[test]
    fn buy_debits_and_adds_lot() {
        let mut ledger = Ledger::default();
        ledger.set_simulated_date(date(3));
        let lot = ledger.buy("X", 10.0, 5).unwrap();

        assert_eq!(ledger.cash(), 9950.0);
        assert_eq!(lot.shares, 5);
        assert_eq!(lot.cost_basis_per_share, 10.0);
        assert_eq!(lot.acquired_on, date(3));
        assert_eq!(ledger.lots_for("X").len(), 1);
    }

    #[test]
    fn buys_never_merge() {
        let mut ledger = Ledger::default();
        ledger.buy("X", 10.0, 5).unwrap();
        ledger.buy("X", 10.0, 5).unwrap();
        assert_eq!(ledger.lots_for("X").len(), 2);
        assert_eq!(ledger.holdings("X"), 10);
    }

    #[test]
    fn buy_insufficient_funds_is_atomic() {
        let mut ledger = Ledger::new(100.0).unwrap();
        let err = ledger.buy("X", 30.0, 4).unwrap_err();
        assert!(matches!(err, StockcastError::InsufficientFunds { .. }));
        assert_eq!(ledger.cash(), 100.0);
        assert_eq!(ledger.holdings("X"), 0);
    }

    #[test]
    fn buy_exact_cash_allowed() {
        let mut ledger = Ledger::new(100.0).unwrap();
        ledger.buy("X", 25.0, 4).unwrap();
        assert_eq!(ledger.cash(), 0.0);
    }

    #[test]
    fn buy_rejects_bad_arguments() {
        let mut ledger = Ledger::default();
        assert!(matches!(
            ledger.buy("X", 10.0, 0),
            Err(StockcastError::InvalidArgument { .. })
        ));
        assert!(ledger.buy("X", 0.0, 1).is_err());
        assert!(ledger.buy("X", -5.0, 1).is_err());
        assert!(ledger.buy("", 5.0, 1).is_err());
        assert_eq!(ledger.cash(), 10_000.0);
    }

    #[test]
    fn round_trip_sell() {
        let mut ledger = Ledger::default();
        ledger.buy("X", 10.0, 5).unwrap();
        let receipt = ledger.sell("X", 12.0, 5).unwrap();

        assert_eq!(ledger.cash(), 10010.0);
        assert_eq!(ledger.lots_for("X").len(), 0);
        assert_eq!(ledger.tickers().count(), 0);
        assert_eq!(receipt.proceeds, 60.0);
        assert!((receipt.realized_pnl() - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn sell_consumes_fifo_and_credits_once() {
        let mut ledger = Ledger::default();
        ledger.set_simulated_date(date(1));
        ledger.buy("X", 10.0, 3).unwrap();
        ledger.set_simulated_date(date(2));
        ledger.buy("X", 11.0, 4).unwrap();
        ledger.set_simulated_date(date(3));
        ledger.buy("X", 12.0, 5).unwrap();
        let cash_before = ledger.cash();

        let receipt = ledger.sell("X", 20.0, 6).unwrap();

        assert_eq!(receipt.fills.len(), 2);
        assert_eq!(receipt.fills[0].acquired_on, date(1));
        assert_eq!(receipt.fills[0].shares, 3);
        assert_eq!(receipt.fills[1].acquired_on, date(2));
        assert_eq!(receipt.fills[1].shares, 3);
        assert_eq!(ledger.cash(), cash_before + 120.0);

        let left: Vec<(NaiveDate, u64)> = ledger
            .lots_for("X")
            .iter()
            .map(|lot| (lot.acquired_on, lot.shares))
            .collect();
        assert_eq!(left, vec![(date(2), 1), (date(3), 5)]);
    }

    #[test]
    fn sell_only_touches_requested_ticker() {
        let mut ledger = Ledger::default();
        ledger.buy("X", 10.0, 3).unwrap();
        ledger.buy("Y", 20.0, 2).unwrap();
        ledger.buy("X", 11.0, 3).unwrap();

        ledger.sell("X", 15.0, 4).unwrap();
        assert_eq!(ledger.holdings("X"), 2);
        assert_eq!(ledger.holdings("Y"), 2);
    }

    #[test]
    fn sell_more_than_held_is_atomic() {
        let mut ledger = Ledger::default();
        ledger.buy("X", 10.0, 5).unwrap();
        let snapshot = ledger.clone();

        let err = ledger.sell("X", 12.0, 6).unwrap_err();
        assert!(matches!(
            err,
            StockcastError::InsufficientHoldings {
                requested: 6,
                held: 5,
                ..
            }
        ));
        assert_eq!(ledger, snapshot);
    }

    #[test]
    fn sell_unknown_ticker() {
        let mut ledger = Ledger::default();
        assert!(matches!(
            ledger.sell("NOPE", 1.0, 1),
            Err(StockcastError::InsufficientHoldings { held: 0, .. })
        ));
    }

    #[test]
    fn buy_rejects_share_count_overflow() {
        let mut ledger = Ledger::default();
        ledger.buy("X", 1e-20, u64::MAX).unwrap();
        let before = ledger.clone();

        assert!(matches!(
            ledger.buy("X", 1e-20, 1),
            Err(StockcastError::InvalidArgument { .. })
        ));
        assert_eq!(ledger, before);
        assert_eq!(ledger.holdings("X"), u64::MAX);

        ledger.sell("X", 1.0, 1).unwrap();
        assert_eq!(ledger.holdings("X"), u64::MAX - 1);
        assert!(ledger.buy("Y", 1e-20, u64::MAX).is_ok());
    }

    #[test]
    fn sell_rejects_zero_quantity() {
        let mut ledger = Ledger::default();
        ledger.buy("X", 10.0, 5).unwrap();
        assert!(matches!(
            ledger.sell("X", 10.0, 0),
            Err(StockcastError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn portfolio_value_reports_unpriced() {
        let mut ledger = Ledger::default();
        ledger.buy("X", 10.0, 5).unwrap();
        ledger.buy("Y", 20.0, 2).unwrap();

        let prices: HashMap<&str, f64> = HashMap::from([("X", 12.0)]);
        let valuation = ledger.portfolio_value(|t| prices.get(t).copied());
        assert_eq!(valuation.value, 60.0);
        assert_eq!(valuation.unpriced, vec!["Y".to_string()]);
    }

    #[test]
    fn portfolio_value_skips_non_positive_prices() {
        let mut ledger = Ledger::default();
        ledger.buy("X", 10.0, 5).unwrap();
        ledger.buy("Y", 20.0, 2).unwrap();
        ledger.buy("Z", 5.0, 4).unwrap();

        let prices: HashMap<&str, f64> = HashMap::from([("X", 0.0), ("Y", -3.0), ("Z", 6.0)]);
        let valuation = ledger.portfolio_value(|t| prices.get(t).copied());
        assert_eq!(valuation.value, 24.0);
        assert_eq!(valuation.unpriced, vec!["X".to_string(), "Y".to_string()]);
    }

    #[test]
    fn portfolio_value_empty() {
        let ledger = Ledger::default();
        let valuation = ledger.portfolio_value(no_prices);
        assert_eq!(valuation.value, 0.0);
        assert!(valuation.unpriced.is_empty());
    }

    #[test]
    fn profit_loss_unrealized() {
        let mut ledger = Ledger::default();
        ledger.buy("X", 10.0, 5).unwrap();
        let pnl = ledger.profit_loss(|_| Some(14.0));
        assert!((pnl - 20.0).abs() < 1e-9);
    }

    #[test]
    fn profit_loss_after_round_trip() {
        let mut ledger = Ledger::default();
        ledger.buy("X", 10.0, 5).unwrap();
        ledger.sell("X", 12.0, 5).unwrap();
        assert!((ledger.profit_loss(no_prices) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn reset_is_idempotent() {
        let mut ledger = Ledger::new(500.0).unwrap();
        ledger.buy("X", 10.0, 5).unwrap();
        ledger.reset();
        assert_eq!(ledger.cash(), 500.0);
        assert_eq!(ledger.lots().count(), 0);
        let once = ledger.clone();
        ledger.reset();
        assert_eq!(ledger, once);
    }

    #[test]
    fn latest_price_trading() {
        let series = PriceSeries::from_observations(
            "X",
            vec![
                Observation::new(date(1), 10.0),
                Observation::new(date(2), 12.5),
            ],
        )
        .unwrap();
        let mut ledger = Ledger::default();

        let lot = ledger.buy_latest(&series, 4).unwrap();
        assert_eq!(lot.cost_basis_per_share, 12.5);
        assert_eq!(lot.acquired_on, date(2));
        assert_eq!(ledger.simulated_date(), date(2));

        let receipt = ledger.sell_latest(&series, 4).unwrap();
        assert_eq!(receipt.proceeds, 50.0);
        assert_eq!(ledger.cash(), 10_000.0);
    }

    #[test]
    fn latest_price_trading_on_empty_series() {
        let mut ledger = Ledger::default();
        let empty = PriceSeries::new("X");
        assert!(matches!(
            ledger.buy_latest(&empty, 1),
            Err(StockcastError::NoData { .. })
        ));
    }

    #[test]
    fn failed_latest_buy_keeps_date() {
        let series =
            PriceSeries::from_observations("X", vec![Observation::new(date(9), 1_000_000.0)])
                .unwrap();
        let mut ledger = Ledger::default();
        ledger.set_simulated_date(date(1));
        assert!(ledger.buy_latest(&series, 1).is_err());
        assert_eq!(ledger.simulated_date(), date(1));
    }
}
