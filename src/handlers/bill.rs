// src/handlers/bill.rs
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use sqlx::PgPool;
use tracing::{info, instrument};

use crate::dtos::bill::CreateBillRequest;
use crate::dtos::{required, required_text};
use crate::error::AppError;
use crate::models::bill::{Bill, BillRecord};
use crate::state::AppState;
use crate::valuation::date::parse_date_pair;
use crate::valuation::posting::ensure_positive;

pub const BILL_COLUMNS: &str = "id, bill_number, bill_date, bill_due_date, bill_amount, partner_id";
pub const BILL_RECORD_COLUMNS: &str = "id, item_id, bill_id, quantity, price,
    bill_record_amount_net, bill_record_vat, bill_record_amount_total";

pub async fn ensure_partner_exists(db_pool: &PgPool, partner_id: i64) -> Result<(), AppError> {
    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM partners WHERE id = $1)")
        .bind(partner_id)
        .fetch_one(db_pool)
        .await?;
    if !exists {
        return Err(AppError::not_found(format!(
            "There is no partner with id {partner_id} in database"
        )));
    }
    Ok(())
}

// GET /bills
#[instrument(skip(state))]
pub async fn list_bills(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let bills = sqlx::query_as::<_, Bill>(&format!("SELECT {BILL_COLUMNS} FROM bills ORDER BY bill_date, id"))
        .fetch_all(&state.db_pool)
        .await?;

    if bills.is_empty() {
        return Err(AppError::not_found("There are no bills in database"));
    }

    Ok(Json(json!({ "success": true, "bills": bills })))
}

// POST /bills
#[instrument(skip(state, payload))]
pub async fn create_bill(
    State(state): State<AppState>,
    payload: Result<Json<CreateBillRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let Json(req) = payload?;
    let bill_number = required_text(req.bill_number, "bill_number")?;
    let bill_date = required(req.bill_date, "bill_date")?;
    let bill_due_date = required(req.bill_due_date, "bill_due_date")?;
    let bill_amount = required(req.bill_amount, "bill_amount")?;
    let partner_id = required(req.partner_id, "partner_id")?;

    let bill_amount = ensure_positive(bill_amount, "bill_amount")?;
    let (bill_date, bill_due_date) = parse_date_pair(&bill_date, &bill_due_date, "bill")?;

    ensure_partner_exists(&state.db_pool, partner_id).await?;

    let duplicate: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM bills WHERE
         bill_number = $1 AND bill_date = $2 AND bill_due_date = $3
         AND bill_amount = $4 AND partner_id = $5)",
    )
    .bind(&bill_number)
    .bind(bill_date)
    .bind(bill_due_date)
    .bind(bill_amount)
    .bind(partner_id)
    .fetch_one(&state.db_pool)
    .await?;

    if duplicate {
        return Err(AppError::conflict("This bill already exists"));
    }

    let bill = sqlx::query_as::<_, Bill>(&format!(
        "INSERT INTO bills (bill_number, bill_date, bill_due_date, bill_amount, partner_id)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING {BILL_COLUMNS}"
    ))
    .bind(&bill_number)
    .bind(bill_date)
    .bind(bill_due_date)
    .bind(bill_amount)
    .bind(partner_id)
    .fetch_one(&state.db_pool)
    .await?;

    info!(bill_id = bill.id, %bill_number, "bill created");

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": format!("Bill no. {bill_number} successfully added to database"),
            "bill": bill,
        })),
    ))
}

// GET /bills/{id}
#[instrument(skip(state))]
pub async fn get_bill(Path(id): Path<i64>, State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let bill = sqlx::query_as::<_, Bill>(&format!("SELECT {BILL_COLUMNS} FROM bills WHERE id = $1"))
        .bind(id)
        .fetch_optional(&state.db_pool)
        .await?
        .ok_or_else(|| AppError::not_found(format!("There is no bill with id {id} in database")))?;

    let records = sqlx::query_as::<_, BillRecord>(&format!(
        "SELECT {BILL_RECORD_COLUMNS} FROM bill_records WHERE bill_id = $1 ORDER BY id"
    ))
    .bind(id)
    .fetch_all(&state.db_pool)
    .await?;

    Ok(Json(json!({ "success": true, "bill": bill, "bill_records": records })))
}
