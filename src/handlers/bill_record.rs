// src/handlers/bill_record.rs
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use tracing::{info, instrument};

use crate::database::begin_posting;
use crate::dtos::bill::CreateBillRecordRequest;
use crate::dtos::required;
use crate::error::AppError;
use crate::handlers::bill::BILL_RECORD_COLUMNS;
use crate::handlers::stock::{lock_item, vat_rate_of};
use crate::models::bill::BillRecord;
use crate::models::item::{Item, ITEM_COLUMNS};
use crate::state::AppState;
use crate::valuation::ledger::Totals;
use crate::valuation::posting::{ensure_positive, price_purchase, purchase_aggregates};

// GET /bill_records
#[instrument(skip(state))]
pub async fn list_bill_records(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let records = sqlx::query_as::<_, BillRecord>(&format!(
        "SELECT {BILL_RECORD_COLUMNS} FROM bill_records ORDER BY id"
    ))
    .fetch_all(&state.db_pool)
    .await?;

    if records.is_empty() {
        return Err(AppError::not_found("There are no bill records in database"));
    }

    Ok(Json(json!({ "success": true, "bill_records": records })))
}

// POST /bill_records - purchase posting
#[instrument(skip(state, payload))]
pub async fn create_bill_record(
    State(state): State<AppState>,
    payload: Result<Json<CreateBillRecordRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let Json(req) = payload?;
    let item_id = required(req.item_id, "item_id")?;
    let bill_id = required(req.bill_id, "bill_id")?;
    let quantity = ensure_positive(required(req.quantity, "quantity")?, "quantity")?;
    let price = ensure_positive(required(req.price, "price")?, "price")?;

    let mut tx = begin_posting(&state.db_pool).await?;

    let item = lock_item(&mut *tx, item_id).await?;

    let bill_exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM bills WHERE id = $1)")
        .bind(bill_id)
        .fetch_one(&mut *tx)
        .await?;
    if !bill_exists {
        return Err(AppError::not_found(format!("There is no bill with id {bill_id} in database")));
    }

    let vat_rate = vat_rate_of(&mut *tx, &item).await?;
    let line = price_purchase(quantity, price, vat_rate)?;

    let record = sqlx::query_as::<_, BillRecord>(&format!(
        "INSERT INTO bill_records
         (item_id, bill_id, quantity, price, bill_record_amount_net, bill_record_vat, bill_record_amount_total)
         VALUES ($1, $2, $3, $4, $5, $6, $7)
         RETURNING {BILL_RECORD_COLUMNS}"
    ))
    .bind(item_id)
    .bind(bill_id)
    .bind(line.quantity)
    .bind(line.price)
    .bind(line.amounts.amount_net)
    .bind(line.amounts.vat)
    .bind(line.amounts.amount_total)
    .fetch_one(&mut *tx)
    .await?;

    let (quantity_sum, amount_sum) = sqlx::query_as::<_, (Option<f64>, Option<f64>)>(
        "SELECT SUM(quantity), SUM(bill_record_amount_net) FROM bill_records WHERE item_id = $1",
    )
    .bind(item_id)
    .fetch_one(&mut *tx)
    .await?;

    let aggregates = purchase_aggregates(
        item.quantity_on_hand,
        &line,
        Totals::from_sums(quantity_sum, amount_sum),
    );

    let item = sqlx::query_as::<_, Item>(&format!(
        "UPDATE items SET
         quantity_on_hand = $1,
         latest_purchase_price = $2,
         average_purchase_price = $3
         WHERE id = $4
         RETURNING {ITEM_COLUMNS}"
    ))
    .bind(aggregates.quantity_on_hand)
    .bind(aggregates.latest_purchase_price)
    .bind(aggregates.average_purchase_price)
    .bind(item_id)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    info!(
        item_id,
        bill_id,
        quantity = line.quantity,
        quantity_on_hand = aggregates.quantity_on_hand,
        average_purchase_price = aggregates.average_purchase_price,
        "purchase posted"
    );

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Bill record successfully added to database",
            "bill_record": record,
            "item": item,
        })),
    ))
}
