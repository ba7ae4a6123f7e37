//! Purchase lots and sale records.

use chrono::NaiveDate;

/// Shares bought in one order, with their own date and cost basis.
#[derive(Debug, Clone, PartialEq)]
pub struct Lot {
    pub ticker: String,
    pub acquired_on: NaiveDate,
    pub shares: u64,
    pub cost_basis_per_share: f64,
}

impl Lot {
    pub fn cost_basis(&self) -> f64 {
        self.shares as f64 * self.cost_basis_per_share
    }

    pub fn market_value(&self, price: f64) -> f64 {
        self.shares as f64 * price
    }

    pub fn unrealized_pnl(&self, price: f64) -> f64 {
        self.shares as f64 * (price - self.cost_basis_per_share)
    }
}

/// Shares taken from a single lot during a sale.
#[derive(Debug, Clone, PartialEq)]
pub struct LotFill {
    pub acquired_on: NaiveDate,
    pub shares: u64,
    pub cost_basis_per_share: f64,
    pub sale_price: f64,
}

impl LotFill {
    pub fn proceeds(&self) -> f64 {
        self.shares as f64 * self.sale_price
    }

    pub fn realized_pnl(&self) -> f64 {
        self.shares as f64 * (self.sale_price - self.cost_basis_per_share)
    }
}

/// Outcome of a completed sell, oldest lot first.
#[derive(Debug, Clone, PartialEq)]
pub struct SellReceipt {
    pub ticker: String,
    pub quantity: u64,
    pub price_per_share: f64,
    /// Cash credited to the ledger: `price_per_share * quantity`.
    pub proceeds: f64,
    pub fills: Vec<LotFill>,
}

impl SellReceipt {
    pub fn realized_pnl(&self) -> f64 {
        self.fills.iter().map(LotFill::realized_pnl).sum()
    }
}
