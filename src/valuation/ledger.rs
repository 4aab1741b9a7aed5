// src/valuation/ledger.rs
//! Point-in-time stock position of an item.
//!
//! Purchases are valued at their net amount. Sales are valued at the cost
//! basis captured on each sale record, so the value left on stock divided by
//! the quantity left on stock is the weighted-average cost of what remains.

use super::ValuationError;

/// Slack allowed when comparing summed quantities, which carry binary
/// rounding error (0.3 - 0.1 is 0.19999999999999998).
pub const QUANTITY_TOLERANCE: f64 = 1e-9;

/// Summed quantity and value of a set of records.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Totals {
    pub quantity: f64,
    pub amount: f64,
}

impl Totals {
    /// SQL `SUM` yields NULL over an empty set.
    pub fn from_sums(quantity: Option<f64>, amount: Option<f64>) -> Self {
        match quantity {
            Some(quantity) => Self { quantity, amount: amount.unwrap_or(0.0) },
            None => Self::default(),
        }
    }

    /// `amount / quantity`, or `None` when nothing has been recorded.
    pub fn average(&self) -> Option<f64> {
        (self.quantity != 0.0).then(|| self.amount / self.quantity)
    }
}

#[cfg(test)]
impl Totals {
    pub fn add(mut self, quantity: f64, amount: f64) -> Self {
        self.quantity += quantity;
        self.amount += amount;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StockPosition {
    pub quantity_on_stock: f64,
    pub amount_on_stock: f64,
}

impl StockPosition {
    pub fn new(purchased: Totals, sold: Totals) -> Self {
        Self {
            quantity_on_stock: purchased.quantity - sold.quantity,
            amount_on_stock: purchased.amount - sold.amount,
        }
    }

    pub fn weighted_average_cost(&self) -> Option<f64> {
        (self.quantity_on_stock > QUANTITY_TOLERANCE).then(|| self.amount_on_stock / self.quantity_on_stock)
    }

    /// Checks that `requested` can be taken from stock and returns the cost
    /// basis per unit for the sale.
    ///
    /// `has_purchases` is whether the item was ever purchased, regardless of
    /// the cutoff date.
    pub fn reserve(&self, has_purchases: bool, requested: f64) -> Result<f64, ValuationError> {
        if !has_purchases {
            return Err(ValuationError::OutOfStock);
        }
        if self.quantity_on_stock + QUANTITY_TOLERANCE < requested {
            return Err(ValuationError::InsufficientStock {
                available: self.quantity_on_stock.max(0.0),
            });
        }
        // requested > 0 keeps quantity_on_stock positive here; the guard
        // stays in case a caller passes zero.
        self.weighted_average_cost().ok_or(ValuationError::InsufficientStock { available: 0.0 })
    }
}
