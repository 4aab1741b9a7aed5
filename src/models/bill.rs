use chrono::NaiveDate;
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, FromRow, Serialize)]
pub struct Bill {
    pub id: i64,
    pub bill_number: String,
    pub bill_date: NaiveDate,
    pub bill_due_date: NaiveDate,
    pub bill_amount: f64,
    pub partner_id: i64,
}

#[derive(Debug, FromRow, Serialize)]
pub struct BillRecord {
    pub id: i64,
    pub item_id: i64,
    pub bill_id: i64,
    pub quantity: f64,
    pub price: f64,
    pub bill_record_amount_net: f64,
    pub bill_record_vat: f64,
    pub bill_record_amount_total: f64,
}
