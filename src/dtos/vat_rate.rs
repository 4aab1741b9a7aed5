use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct VatRateRequest {
    pub vat_rate: Option<i32>,
}
