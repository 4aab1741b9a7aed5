use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, FromRow, Serialize)]
pub struct UnitOfMeasure {
    pub id: i64,
    pub unit_acronym: String,
    pub unit_name: String,
}
