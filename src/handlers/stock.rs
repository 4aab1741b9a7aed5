// src/handlers/stock.rs
//! Store-side half of the stock ledger: the sums the valuation core works on,
//! plus the item lookups shared by both posting handlers.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::NaiveDate;
use serde_json::{json, Value};
use sqlx::PgConnection;
use tracing::instrument;

use crate::dtos::item::StockQuery;
use crate::error::AppError;
use crate::models::item::{Item, ITEM_COLUMNS};
use crate::state::AppState;
use crate::valuation::date::{canonical, parse_date};
use crate::valuation::ledger::{StockPosition, Totals};

/// Fetches the item and locks its row until the transaction ends.
pub async fn lock_item(conn: &mut PgConnection, item_id: i64) -> Result<Item, AppError> {
    sqlx::query_as::<_, Item>(&format!("SELECT {ITEM_COLUMNS} FROM items WHERE id = $1 FOR UPDATE"))
        .bind(item_id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| AppError::not_found(format!("There is no item with id {item_id} in database")))
}

/// VAT percent of the rate the item points at.
pub async fn vat_rate_of(conn: &mut PgConnection, item: &Item) -> Result<f64, AppError> {
    let rate: i32 = sqlx::query_scalar("SELECT vat_rate FROM vat_rates WHERE id = $1")
        .bind(item.vat_rate_id)
        .fetch_one(&mut *conn)
        .await?;
    Ok(f64::from(rate))
}

/// Purchases of the item on bills dated on or before `cutoff`.
pub async fn purchased_totals(
    conn: &mut PgConnection,
    item_id: i64,
    cutoff: Option<NaiveDate>,
) -> Result<Totals, sqlx::Error> {
    let (quantity, amount) = sqlx::query_as::<_, (Option<f64>, Option<f64>)>(
        "SELECT SUM(br.quantity), SUM(br.bill_record_amount_net)
         FROM bill_records br
         JOIN bills b ON br.bill_id = b.id
         WHERE br.item_id = $1
         AND ($2::DATE IS NULL OR b.bill_date <= $2)",
    )
    .bind(item_id)
    .bind(cutoff)
    .fetch_one(&mut *conn)
    .await?;

    Ok(Totals::from_sums(quantity, amount))
}

/// Sales of the item on invoices dated on or before `cutoff`, valued at the
/// cost basis stored on each record.
pub async fn sold_totals(
    conn: &mut PgConnection,
    item_id: i64,
    cutoff: Option<NaiveDate>,
) -> Result<Totals, sqlx::Error> {
    let (quantity, amount) = sqlx::query_as::<_, (Option<f64>, Option<f64>)>(
        "SELECT SUM(ir.quantity), SUM(ir.quantity * ir.average_purchase_price)
         FROM invoice_records ir
         JOIN invoices i ON ir.invoice_id = i.id
         WHERE ir.item_id = $1
         AND ($2::DATE IS NULL OR i.invoice_date <= $2)",
    )
    .bind(item_id)
    .bind(cutoff)
    .fetch_one(&mut *conn)
    .await?;

    Ok(Totals::from_sums(quantity, amount))
}

/// Whether the item was ever purchased, whatever the date.
pub async fn has_purchases(conn: &mut PgConnection, item_id: i64) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM bill_records WHERE item_id = $1)")
        .bind(item_id)
        .fetch_one(&mut *conn)
        .await
}

pub async fn stock_position(
    conn: &mut PgConnection,
    item_id: i64,
    cutoff: Option<NaiveDate>,
) -> Result<StockPosition, sqlx::Error> {
    let purchased = purchased_totals(conn, item_id, cutoff).await?;
    let sold = sold_totals(conn, item_id, cutoff).await?;
    Ok(StockPosition::new(purchased, sold))
}

// GET /items/{id}/stock?date=dd.mm.yyyy
#[instrument(skip(state))]
pub async fn get_item_stock(
    Path(id): Path<i64>,
    Query(query): Query<StockQuery>,
    State(state): State<AppState>,
) -> Result<Json<Value>, AppError> {
    let cutoff = query.date.as_deref().map(|d| parse_date(d, "date")).transpose()?;

    let mut conn = state.db_pool.acquire().await?;

    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM items WHERE id = $1)")
        .bind(id)
        .fetch_one(&mut *conn)
        .await?;
    if !exists {
        return Err(AppError::not_found(format!("There is no item with id {id} in database")));
    }

    let position = stock_position(&mut *conn, id, cutoff).await?;

    Ok(Json(json!({
        "success": true,
        "stock": {
            "item_id": id,
            "date": cutoff.map(canonical),
            "quantity_on_stock": position.quantity_on_stock,
            "amount_on_stock": position.amount_on_stock,
            "weighted_average_cost": position.weighted_average_cost(),
        },
    })))
}
