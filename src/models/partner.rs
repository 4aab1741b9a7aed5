use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, FromRow, Serialize)]
pub struct Partner {
    pub id: i64,
    pub partner_name: String,
    pub partner_address: String,
    pub partner_manager_first_name: Option<String>,
    pub partner_manager_last_name: Option<String>,
}
