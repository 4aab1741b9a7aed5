use serde::Serialize;
use sqlx::FromRow;

pub const ITEM_COLUMNS: &str = "id, item_code, item_description, unit_id, vat_rate_id,
    quantity_on_hand, latest_purchase_price, average_purchase_price,
    latest_net_selling_price, average_net_selling_price";

/// Master data plus the aggregates maintained by postings.
#[derive(Debug, FromRow, Serialize)]
pub struct Item {
    pub id: i64,
    pub item_code: String,
    pub item_description: String,
    pub unit_id: i64,
    pub vat_rate_id: i64,
    pub quantity_on_hand: f64,
    pub latest_purchase_price: f64,
    pub average_purchase_price: f64,
    pub latest_net_selling_price: f64,
    pub average_net_selling_price: f64,
}
