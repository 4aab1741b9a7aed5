// src/handlers/vat_rate.rs
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use tracing::instrument;

use crate::dtos::required;
use crate::dtos::vat_rate::VatRateRequest;
use crate::error::AppError;
use crate::models::vat_rate::VatRate;
use crate::state::AppState;

fn validate_rate(rate: Option<i32>) -> Result<i32, AppError> {
    let rate = required(rate, "vat_rate")?;
    if rate < 0 {
        return Err(AppError::invalid("'vat_rate' cannot be negative"));
    }
    Ok(rate)
}

async fn find_vat_rate(state: &AppState, id: i64) -> Result<VatRate, AppError> {
    sqlx::query_as::<_, VatRate>("SELECT id, vat_rate FROM vat_rates WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.db_pool)
        .await?
        .ok_or_else(|| AppError::not_found(format!("There is no VAT rate with id {id} in database")))
}

// GET /vat_rates
#[instrument(skip(state))]
pub async fn list_vat_rates(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let vat_rates = sqlx::query_as::<_, VatRate>("SELECT id, vat_rate FROM vat_rates ORDER BY vat_rate")
        .fetch_all(&state.db_pool)
        .await?;

    if vat_rates.is_empty() {
        return Err(AppError::not_found("There are no VAT rates in database"));
    }

    Ok(Json(json!({ "success": true, "vat_rates": vat_rates })))
}

// POST /vat_rates
#[instrument(skip(state, payload))]
pub async fn create_vat_rate(
    State(state): State<AppState>,
    payload: Result<Json<VatRateRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let Json(req) = payload?;
    let rate = validate_rate(req.vat_rate)?;

    let vat_rate = sqlx::query_as::<_, VatRate>(
        "INSERT INTO vat_rates (vat_rate) VALUES ($1) RETURNING id, vat_rate",
    )
    .bind(rate)
    .fetch_one(&state.db_pool)
    .await
    .map_err(|e| AppError::unique_violation(e, &format!("VAT rate of {rate}% already exists in database")))?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": format!("VAT rate of {rate}% successfully added to database"),
            "vat_rate": vat_rate,
        })),
    ))
}

// GET /vat_rates/{id}
#[instrument(skip(state))]
pub async fn get_vat_rate(Path(id): Path<i64>, State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let vat_rate = find_vat_rate(&state, id).await?;
    Ok(Json(json!({ "success": true, "vat_rate": vat_rate })))
}

// PUT /vat_rates/{id}
//
// Postings read the rate when they are made, so records already posted keep
// the amounts computed with the old rate.
#[instrument(skip(state, payload))]
pub async fn update_vat_rate(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    payload: Result<Json<VatRateRequest>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let Json(req) = payload?;
    let rate = validate_rate(req.vat_rate)?;

    let vat_rate = sqlx::query_as::<_, VatRate>(
        "UPDATE vat_rates SET vat_rate = $1 WHERE id = $2 RETURNING id, vat_rate",
    )
    .bind(rate)
    .bind(id)
    .fetch_optional(&state.db_pool)
    .await
    .map_err(|e| AppError::unique_violation(e, &format!("VAT rate of {rate}% already exists in database")))?
    .ok_or_else(|| AppError::not_found(format!("There is no VAT rate with id {id} in database")))?;

    Ok(Json(json!({
        "success": true,
        "message": format!("VAT rate successfully changed to {rate}%"),
        "vat_rate": vat_rate,
    })))
}

// DELETE /vat_rates/{id}
#[instrument(skip(state))]
pub async fn delete_vat_rate(Path(id): Path<i64>, State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let vat_rate = find_vat_rate(&state, id).await?;

    let in_use: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM items WHERE vat_rate_id = $1)")
        .bind(id)
        .fetch_one(&state.db_pool)
        .await?;

    if in_use {
        return Err(AppError::blocked("Cannot delete VAT rate. There are items taxed at this rate"));
    }

    sqlx::query("DELETE FROM vat_rates WHERE id = $1")
        .bind(id)
        .execute(&state.db_pool)
        .await?;

    Ok(Json(json!({
        "success": true,
        "message": format!("VAT rate of {}% successfully deleted from database", vat_rate.vat_rate),
    })))
}
