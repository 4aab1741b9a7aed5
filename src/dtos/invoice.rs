use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct CreateInvoiceRequest {
    pub invoice_date: Option<String>,
    pub invoice_due_date: Option<String>,
    pub partner_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct CreateInvoiceRecordRequest {
    pub item_id: Option<i64>,
    pub invoice_id: Option<i64>,
    pub quantity: Option<f64>,
    pub selling_price: Option<f64>,
    /// `0` when the selling price is net, `1` when it includes VAT.
    pub vat_included: Option<i64>,
}
