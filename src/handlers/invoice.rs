// src/handlers/invoice.rs
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use tracing::{info, instrument};

use crate::database::begin_posting;
use crate::dtos::invoice::CreateInvoiceRequest;
use crate::dtos::required;
use crate::error::AppError;
use crate::handlers::bill::ensure_partner_exists;
use crate::models::invoice::{Invoice, InvoiceRecord};
use crate::state::AppState;
use crate::valuation::date::parse_date_pair;

pub const INVOICE_COLUMNS: &str = "id, invoice_number, invoice_date, invoice_due_date,
    invoice_amount_net, invoice_vat, invoice_amount_total, partner_id";
pub const INVOICE_RECORD_COLUMNS: &str = "id, item_id, invoice_id, quantity,
    net_selling_price, gross_selling_price, vat_amount_per_unit, average_purchase_price,
    invoice_record_amount_net, invoice_record_vat, invoice_record_amount_total";

/// Number following `latest`, zero-padded to five digits. Numbering starts
/// at `00001` and widens past `99999`.
pub fn next_invoice_number(latest: Option<&str>) -> Result<String, AppError> {
    let next = match latest {
        None => 1,
        Some(number) => {
            let current: u64 = number
                .trim()
                .parse()
                .map_err(|_| AppError::invalid(format!("Stored invoice number {number:?} is not numeric")))?;
            current + 1
        }
    };
    Ok(format!("{next:05}"))
}

// GET /invoices
#[instrument(skip(state))]
pub async fn list_invoices(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let invoices = sqlx::query_as::<_, Invoice>(&format!(
        "SELECT {INVOICE_COLUMNS} FROM invoices ORDER BY LENGTH(invoice_number), invoice_number"
    ))
    .fetch_all(&state.db_pool)
    .await?;

    if invoices.is_empty() {
        return Err(AppError::not_found("There are no invoices in database"));
    }

    Ok(Json(json!({ "success": true, "invoices": invoices })))
}

// POST /invoices
#[instrument(skip(state, payload))]
pub async fn create_invoice(
    State(state): State<AppState>,
    payload: Result<Json<CreateInvoiceRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let Json(req) = payload?;
    let invoice_date = required(req.invoice_date, "invoice_date")?;
    let invoice_due_date = required(req.invoice_due_date, "invoice_due_date")?;
    let partner_id = required(req.partner_id, "partner_id")?;

    let (invoice_date, invoice_due_date) = parse_date_pair(&invoice_date, &invoice_due_date, "invoice")?;

    ensure_partner_exists(&state.db_pool, partner_id).await?;

    let mut tx = begin_posting(&state.db_pool).await?;

    let latest: Option<String> = sqlx::query_scalar(
        "SELECT invoice_number FROM invoices
         ORDER BY LENGTH(invoice_number) DESC, invoice_number DESC
         LIMIT 1",
    )
    .fetch_optional(&mut *tx)
    .await?;
    let invoice_number = next_invoice_number(latest.as_deref())?;

    let invoice = sqlx::query_as::<_, Invoice>(&format!(
        "INSERT INTO invoices (invoice_number, invoice_date, invoice_due_date, partner_id)
         VALUES ($1, $2, $3, $4)
         RETURNING {INVOICE_COLUMNS}"
    ))
    .bind(&invoice_number)
    .bind(invoice_date)
    .bind(invoice_due_date)
    .bind(partner_id)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| AppError::unique_violation(e, "This invoice already exists"))?;

    tx.commit().await?;

    info!(invoice_id = invoice.id, %invoice_number, "invoice created");

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": format!("Invoice no. {invoice_number} successfully added to database"),
            "invoice": invoice,
        })),
    ))
}

// GET /invoices/{id}
#[instrument(skip(state))]
pub async fn get_invoice(Path(id): Path<i64>, State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let invoice = sqlx::query_as::<_, Invoice>(&format!("SELECT {INVOICE_COLUMNS} FROM invoices WHERE id = $1"))
        .bind(id)
        .fetch_optional(&state.db_pool)
        .await?
        .ok_or_else(|| AppError::not_found(format!("There is no invoice with id {id} in database")))?;

    let records = sqlx::query_as::<_, InvoiceRecord>(&format!(
        "SELECT {INVOICE_RECORD_COLUMNS} FROM invoice_records WHERE invoice_id = $1 ORDER BY id"
    ))
    .bind(id)
    .fetch_all(&state.db_pool)
    .await?;

    Ok(Json(json!({ "success": true, "invoice": invoice, "invoice_records": records })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_invoice_is_00001() {
        assert_eq!(next_invoice_number(None).unwrap(), "00001");
    }

    #[test]
    fn numbers_increase_by_one() {
        assert_eq!(next_invoice_number(Some("00001")).unwrap(), "00002");
        assert_eq!(next_invoice_number(Some("00099")).unwrap(), "00100");
    }

    #[test]
    fn numbering_widens_after_five_digits() {
        assert_eq!(next_invoice_number(Some("99999")).unwrap(), "100000");
    }

    #[test]
    fn non_numeric_stored_number_is_rejected() {
        assert!(matches!(next_invoice_number(Some("INV-1")), Err(AppError::InvalidInput(_))));
    }
}
