// src/handlers/invoice_record.rs
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use tracing::{info, instrument, warn};

use crate::database::begin_posting;
use crate::dtos::invoice::CreateInvoiceRecordRequest;
use crate::dtos::required;
use crate::error::AppError;
use crate::handlers::invoice::{INVOICE_COLUMNS, INVOICE_RECORD_COLUMNS};
use crate::handlers::stock::{has_purchases, lock_item, stock_position, vat_rate_of};
use crate::models::invoice::{Invoice, InvoiceRecord};
use crate::models::item::{Item, ITEM_COLUMNS};
use crate::state::AppState;
use crate::valuation::ledger::Totals;
use crate::valuation::posting::{ensure_positive, price_sale, sale_aggregates, DocumentTotals};
use crate::valuation::vat::VatMode;

// GET /invoice_records
#[instrument(skip(state))]
pub async fn list_invoice_records(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let records = sqlx::query_as::<_, InvoiceRecord>(&format!(
        "SELECT {INVOICE_RECORD_COLUMNS} FROM invoice_records ORDER BY id"
    ))
    .fetch_all(&state.db_pool)
    .await?;

    if records.is_empty() {
        return Err(AppError::not_found("There are no invoice records in database"));
    }

    Ok(Json(json!({ "success": true, "invoice_records": records })))
}

// POST /invoice_records - sale posting
#[instrument(skip(state, payload))]
pub async fn create_invoice_record(
    State(state): State<AppState>,
    payload: Result<Json<CreateInvoiceRecordRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let Json(req) = payload?;
    let item_id = required(req.item_id, "item_id")?;
    let invoice_id = required(req.invoice_id, "invoice_id")?;
    let quantity = ensure_positive(required(req.quantity, "quantity")?, "quantity")?;
    let selling_price = ensure_positive(required(req.selling_price, "selling_price")?, "selling_price")?;
    let vat_mode = VatMode::from_flag(required(req.vat_included, "vat_included")?)?;

    let mut tx = begin_posting(&state.db_pool).await?;

    let item = lock_item(&mut *tx, item_id).await?;

    let invoice = sqlx::query_as::<_, Invoice>(&format!("SELECT {INVOICE_COLUMNS} FROM invoices WHERE id = $1"))
        .bind(invoice_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::not_found(format!("There is no invoice with id {invoice_id} in database")))?;

    // Availability is judged as of the invoice date.
    let ever_purchased = has_purchases(&mut *tx, item_id).await?;
    let position = stock_position(&mut *tx, item_id, Some(invoice.invoice_date)).await?;
    let cost_basis = position.reserve(ever_purchased, quantity).map_err(|err| {
        warn!(
            item_id,
            invoice_id,
            requested = quantity,
            quantity_on_stock = position.quantity_on_stock,
            "sale rejected: {err}"
        );
        err
    })?;

    let vat_rate = vat_rate_of(&mut *tx, &item).await?;
    let line = price_sale(quantity, selling_price, vat_mode, vat_rate, cost_basis)?;

    let record = sqlx::query_as::<_, InvoiceRecord>(&format!(
        "INSERT INTO invoice_records
         (item_id, invoice_id, quantity, net_selling_price, gross_selling_price, vat_amount_per_unit,
          average_purchase_price, invoice_record_amount_net, invoice_record_vat, invoice_record_amount_total)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
         RETURNING {INVOICE_RECORD_COLUMNS}"
    ))
    .bind(item_id)
    .bind(invoice_id)
    .bind(line.quantity)
    .bind(line.unit.net)
    .bind(line.unit.gross)
    .bind(line.unit.vat)
    .bind(line.average_purchase_price)
    .bind(line.amounts.amount_net)
    .bind(line.amounts.vat)
    .bind(line.amounts.amount_total)
    .fetch_one(&mut *tx)
    .await?;

    let (quantity_sum, amount_sum) = sqlx::query_as::<_, (Option<f64>, Option<f64>)>(
        "SELECT SUM(quantity), SUM(invoice_record_amount_net) FROM invoice_records WHERE item_id = $1",
    )
    .bind(item_id)
    .fetch_one(&mut *tx)
    .await?;

    let aggregates = sale_aggregates(
        item.quantity_on_hand,
        &line,
        Totals::from_sums(quantity_sum, amount_sum),
    );

    let item = sqlx::query_as::<_, Item>(&format!(
        "UPDATE items SET
         quantity_on_hand = $1,
         latest_net_selling_price = $2,
         average_net_selling_price = $3
         WHERE id = $4
         RETURNING {ITEM_COLUMNS}"
    ))
    .bind(aggregates.quantity_on_hand)
    .bind(aggregates.latest_net_selling_price)
    .bind(aggregates.average_net_selling_price)
    .bind(item_id)
    .fetch_one(&mut *tx)
    .await?;

    let (net, vat, total) = sqlx::query_as::<_, (Option<f64>, Option<f64>, Option<f64>)>(
        "SELECT SUM(invoice_record_amount_net), SUM(invoice_record_vat), SUM(invoice_record_amount_total)
         FROM invoice_records WHERE invoice_id = $1",
    )
    .bind(invoice_id)
    .fetch_one(&mut *tx)
    .await?;
    let totals = DocumentTotals::from_sums(net, vat, total);

    sqlx::query(
        "UPDATE invoices SET invoice_amount_net = $1, invoice_vat = $2, invoice_amount_total = $3
         WHERE id = $4",
    )
    .bind(totals.amount_net)
    .bind(totals.vat)
    .bind(totals.amount_total)
    .bind(invoice_id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    info!(
        item_id,
        invoice_id,
        quantity = line.quantity,
        cost_basis,
        quantity_on_hand = aggregates.quantity_on_hand,
        average_net_selling_price = aggregates.average_net_selling_price,
        "sale posted"
    );

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Invoice record successfully added to database",
            "invoice_record": record,
            "item": item,
        })),
    ))
}
