// src/valuation/mod.rs
//! Stock valuation rules, free of any database or HTTP concerns.

pub mod date;
pub mod ledger;
pub mod posting;
pub mod vat;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValuationError {
    #[error("{0}")]
    Format(String),
    #[error("{0}")]
    Range(String),
    #[error("{0}")]
    Ordering(String),
    #[error("{0}")]
    InvalidInput(String),
    #[error("You don't have enough quantity on stock. Maximum quantity allowed: {available}")]
    InsufficientStock { available: f64 },
    #[error("You have no quantity on stock. Cannot continue until you have quantity.")]
    OutOfStock,
}
