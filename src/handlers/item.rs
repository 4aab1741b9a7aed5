// src/handlers/item.rs
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use sqlx::PgPool;
use tracing::{info, instrument};

use crate::dtos::item::{CreateItemRequest, UpdateItemRequest};
use crate::dtos::{non_blank, required, required_text};
use crate::error::AppError;
use crate::models::item::{Item, ITEM_COLUMNS};
use crate::state::AppState;

const DUPLICATE_ITEM: &str = "An item with this code or description already exists in database";

async fn ensure_unit_exists(db_pool: &PgPool, unit_id: i64) -> Result<(), AppError> {
    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM units_of_measure WHERE id = $1)")
        .bind(unit_id)
        .fetch_one(db_pool)
        .await?;
    if !exists {
        return Err(AppError::not_found(format!("Unit {unit_id} is not valid (not in database)")));
    }
    Ok(())
}

async fn ensure_vat_rate_exists(db_pool: &PgPool, vat_rate_id: i64) -> Result<(), AppError> {
    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM vat_rates WHERE id = $1)")
        .bind(vat_rate_id)
        .fetch_one(db_pool)
        .await?;
    if !exists {
        return Err(AppError::not_found(format!("VAT rate {vat_rate_id} is not valid (not in database)")));
    }
    Ok(())
}

async fn find_item(db_pool: &PgPool, id: i64) -> Result<Item, AppError> {
    sqlx::query_as::<_, Item>(&format!("SELECT {ITEM_COLUMNS} FROM items WHERE id = $1"))
        .bind(id)
        .fetch_optional(db_pool)
        .await?
        .ok_or_else(|| AppError::not_found(format!("There is no item with id {id} in database")))
}

// GET /items
#[instrument(skip(state))]
pub async fn list_items(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let items = sqlx::query_as::<_, Item>(&format!("SELECT {ITEM_COLUMNS} FROM items ORDER BY item_code"))
        .fetch_all(&state.db_pool)
        .await?;

    if items.is_empty() {
        return Err(AppError::not_found("There are no items in database"));
    }

    Ok(Json(json!({ "success": true, "items": items })))
}

// POST /items
#[instrument(skip(state, payload))]
pub async fn create_item(
    State(state): State<AppState>,
    payload: Result<Json<CreateItemRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let Json(req) = payload?;
    let item_code = required_text(req.item_code, "item_code")?;
    let item_description = required_text(req.item_description, "item_description")?;
    let unit_id = required(req.unit_id, "unit_id")?;
    let vat_rate_id = required(req.vat_rate_id, "vat_rate_id")?;

    ensure_unit_exists(&state.db_pool, unit_id).await?;
    ensure_vat_rate_exists(&state.db_pool, vat_rate_id).await?;

    let item = sqlx::query_as::<_, Item>(&format!(
        "INSERT INTO items (item_code, item_description, unit_id, vat_rate_id)
         VALUES ($1, $2, $3, $4)
         RETURNING {ITEM_COLUMNS}"
    ))
    .bind(&item_code)
    .bind(&item_description)
    .bind(unit_id)
    .bind(vat_rate_id)
    .fetch_one(&state.db_pool)
    .await
    .map_err(|e| AppError::unique_violation(e, DUPLICATE_ITEM))?;

    info!(item_id = item.id, item_code = %item.item_code, "item created");

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": format!("{item_description} successfully added to database"),
            "item": item,
        })),
    ))
}

// GET /items/{id}
#[instrument(skip(state))]
pub async fn get_item(Path(id): Path<i64>, State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let item = find_item(&state.db_pool, id).await?;
    Ok(Json(json!({ "success": true, "item": item })))
}

// PUT /items/{id}
#[instrument(skip(state, payload))]
pub async fn update_item(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    payload: Result<Json<UpdateItemRequest>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let Json(req) = payload?;
    let item_code = req.item_code.map(|v| non_blank(v, "item_code")).transpose()?;
    let item_description = req
        .item_description
        .map(|v| non_blank(v, "item_description"))
        .transpose()?;

    if let Some(unit_id) = req.unit_id {
        ensure_unit_exists(&state.db_pool, unit_id).await?;
    }
    if let Some(vat_rate_id) = req.vat_rate_id {
        ensure_vat_rate_exists(&state.db_pool, vat_rate_id).await?;
    }

    let item = sqlx::query_as::<_, Item>(&format!(
        "UPDATE items SET
         item_code = COALESCE($1, item_code),
         item_description = COALESCE($2, item_description),
         unit_id = COALESCE($3, unit_id),
         vat_rate_id = COALESCE($4, vat_rate_id)
         WHERE id = $5
         RETURNING {ITEM_COLUMNS}"
    ))
    .bind(item_code)
    .bind(item_description)
    .bind(req.unit_id)
    .bind(req.vat_rate_id)
    .bind(id)
    .fetch_optional(&state.db_pool)
    .await
    .map_err(|e| AppError::unique_violation(e, DUPLICATE_ITEM))?
    .ok_or_else(|| AppError::not_found(format!("There is no item with id {id} in database")))?;

    Ok(Json(json!({
        "success": true,
        "message": format!("{} successfully updated", item.item_description),
        "item": item,
    })))
}

// DELETE /items/{id}
#[instrument(skip(state))]
pub async fn delete_item(Path(id): Path<i64>, State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let item = find_item(&state.db_pool, id).await?;

    let in_use: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM bill_records WHERE item_id = $1)
             OR EXISTS(SELECT 1 FROM invoice_records WHERE item_id = $1)",
    )
    .bind(id)
    .fetch_one(&state.db_pool)
    .await?;

    if in_use {
        return Err(AppError::blocked(
            "Cannot delete item from database. There are bill records and/or invoice records with this item.",
        ));
    }

    sqlx::query("DELETE FROM items WHERE id = $1")
        .bind(id)
        .execute(&state.db_pool)
        .await?;

    info!(item_id = id, "item deleted");

    Ok(Json(json!({
        "success": true,
        "message": format!("{} successfully deleted from database", item.item_description),
    })))
}
