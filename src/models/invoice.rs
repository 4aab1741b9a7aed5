use chrono::NaiveDate;
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, FromRow, Serialize)]
pub struct Invoice {
    pub id: i64,
    pub invoice_number: String,
    pub invoice_date: NaiveDate,
    pub invoice_due_date: NaiveDate,
    pub invoice_amount_net: f64,
    pub invoice_vat: f64,
    pub invoice_amount_total: f64,
    pub partner_id: i64,
}

/// A sale line. `average_purchase_price` is the cost basis at posting time
/// and is never updated afterwards.
#[derive(Debug, FromRow, Serialize)]
pub struct InvoiceRecord {
    pub id: i64,
    pub item_id: i64,
    pub invoice_id: i64,
    pub quantity: f64,
    pub net_selling_price: f64,
    pub gross_selling_price: f64,
    pub vat_amount_per_unit: f64,
    pub average_purchase_price: f64,
    pub invoice_record_amount_net: f64,
    pub invoice_record_vat: f64,
    pub invoice_record_amount_total: f64,
}
