use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, FromRow, Serialize)]
pub struct VatRate {
    pub id: i64,
    /// Percent, e.g. `20` for 20%.
    pub vat_rate: i32,
}
