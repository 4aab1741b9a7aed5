use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct CreateItemRequest {
    pub item_code: Option<String>,
    pub item_description: Option<String>,
    pub unit_id: Option<i64>,
    pub vat_rate_id: Option<i64>,
}

/// Master data only; aggregates are owned by postings.
#[derive(Debug, Deserialize)]
pub struct UpdateItemRequest {
    pub item_code: Option<String>,
    pub item_description: Option<String>,
    pub unit_id: Option<i64>,
    pub vat_rate_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct StockQuery {
    /// `dd.mm.yyyy`; the whole history when absent.
    pub date: Option<String>,
}
