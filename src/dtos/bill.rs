use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct CreateBillRequest {
    pub bill_number: Option<String>,
    pub bill_date: Option<String>,
    pub bill_due_date: Option<String>,
    pub bill_amount: Option<f64>,
    pub partner_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct CreateBillRecordRequest {
    pub item_id: Option<i64>,
    pub bill_id: Option<i64>,
    pub quantity: Option<f64>,
    pub price: Option<f64>,
}
