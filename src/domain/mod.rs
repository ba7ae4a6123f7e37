//! Core domain types and logic.

pub mod config_validation;
pub mod error;
pub mod forecast;
pub mod ledger;
pub mod lot;
pub mod market_sim;
pub mod observation;
pub mod price_series;
pub mod range_params;
