// src/valuation/posting.rs
//! Pricing of purchase and sale lines and the item aggregates derived from
//! the record history after a posting.

use super::ledger::Totals;
use super::vat::{LineAmounts, UnitPrice, VatMode};
use super::ValuationError;

pub fn ensure_positive(value: f64, field: &str) -> Result<f64, ValuationError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ValuationError::InvalidInput(format!("'{field}' must be greater than 0")))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PurchaseLine {
    pub quantity: f64,
    pub price: f64,
    pub amounts: LineAmounts,
}

pub fn price_purchase(quantity: f64, price: f64, vat_rate: f64) -> Result<PurchaseLine, ValuationError> {
    let quantity = ensure_positive(quantity, "quantity")?;
    let price = ensure_positive(price, "price")?;
    Ok(PurchaseLine { quantity, price, amounts: LineAmounts::new(quantity, price, vat_rate) })
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PurchaseAggregates {
    pub quantity_on_hand: f64,
    pub latest_purchase_price: f64,
    pub average_purchase_price: f64,
}

/// `history` holds every purchase record of the item, the new one included.
/// Quantity on hand moves by the posted quantity; the average is recomputed
/// from the whole history.
pub fn purchase_aggregates(previous_quantity: f64, line: &PurchaseLine, history: Totals) -> PurchaseAggregates {
    PurchaseAggregates {
        quantity_on_hand: previous_quantity + line.quantity,
        latest_purchase_price: line.price,
        average_purchase_price: history.average().unwrap_or(line.price),
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SaleLine {
    pub quantity: f64,
    pub unit: UnitPrice,
    /// Cost basis snapshot taken from the stock ledger.
    pub average_purchase_price: f64,
    pub amounts: LineAmounts,
}

pub fn price_sale(
    quantity: f64,
    selling_price: f64,
    mode: VatMode,
    vat_rate: f64,
    cost_basis: f64,
) -> Result<SaleLine, ValuationError> {
    let quantity = ensure_positive(quantity, "quantity")?;
    let selling_price = ensure_positive(selling_price, "selling_price")?;
    let unit = UnitPrice::from_price(selling_price, vat_rate, mode);
    Ok(SaleLine {
        quantity,
        unit,
        average_purchase_price: cost_basis,
        amounts: LineAmounts::new(quantity, unit.net, vat_rate),
    })
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SaleAggregates {
    pub quantity_on_hand: f64,
    pub latest_net_selling_price: f64,
    pub average_net_selling_price: f64,
}

/// `history` holds every sale record of the item (quantity, net amount), the
/// new one included.
pub fn sale_aggregates(previous_quantity: f64, line: &SaleLine, history: Totals) -> SaleAggregates {
    SaleAggregates {
        quantity_on_hand: previous_quantity - line.quantity,
        latest_net_selling_price: line.unit.net,
        average_net_selling_price: history.average().unwrap_or(line.unit.net),
    }
}

/// Header totals of an invoice, summed over its records.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DocumentTotals {
    pub amount_net: f64,
    pub vat: f64,
    pub amount_total: f64,
}

impl DocumentTotals {
    pub fn from_sums(amount_net: Option<f64>, vat: Option<f64>, amount_total: Option<f64>) -> Self {
        Self {
            amount_net: amount_net.unwrap_or(0.0),
            vat: vat.unwrap_or(0.0),
            amount_total: amount_total.unwrap_or(0.0),
        }
    }
}
