// src/valuation/vat.rs
use super::ValuationError;

/// Whether a submitted selling price already contains VAT.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VatMode {
    Excluded,
    Included,
}

impl VatMode {
    /// Only `0` and `1` are accepted.
    pub fn from_flag(flag: i64) -> Result<Self, ValuationError> {
        match flag {
            0 => Ok(VatMode::Excluded),
            1 => Ok(VatMode::Included),
            _ => Err(ValuationError::InvalidInput(
                "\"vat_included\" should be 0 if VAT is not included in the selling price, otherwise it should be 1"
                    .into(),
            )),
        }
    }
}

fn factor(rate_percent: f64) -> f64 {
    1.0 + rate_percent / 100.0
}

/// Per-unit split of a price into net, gross and VAT.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitPrice {
    pub net: f64,
    pub gross: f64,
    pub vat: f64,
}

impl UnitPrice {
    pub fn from_price(price: f64, rate_percent: f64, mode: VatMode) -> Self {
        let (net, gross) = match mode {
            VatMode::Included => (price / factor(rate_percent), price),
            VatMode::Excluded => (price, price * factor(rate_percent)),
        };
        Self { net, gross, vat: gross - net }
    }
}

/// Amounts of one record line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineAmounts {
    pub amount_net: f64,
    pub vat: f64,
    pub amount_total: f64,
}

impl LineAmounts {
    pub fn new(quantity: f64, net_unit_price: f64, rate_percent: f64) -> Self {
        let amount_net = quantity * net_unit_price;
        let vat = amount_net * rate_percent / 100.0;
        Self { amount_net, vat, amount_total: amount_net + vat }
    }
}
