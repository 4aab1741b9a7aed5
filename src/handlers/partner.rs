// src/handlers/partner.rs
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use tracing::{info, instrument};

use crate::dtos::partner::{CreatePartnerRequest, UpdatePartnerRequest};
use crate::dtos::{non_blank, optional_text, required_text};
use crate::error::AppError;
use crate::models::partner::Partner;
use crate::state::AppState;

const PARTNER_COLUMNS: &str =
    "id, partner_name, partner_address, partner_manager_first_name, partner_manager_last_name";

async fn find_partner(state: &AppState, id: i64) -> Result<Partner, AppError> {
    sqlx::query_as::<_, Partner>(&format!("SELECT {PARTNER_COLUMNS} FROM partners WHERE id = $1"))
        .bind(id)
        .fetch_optional(&state.db_pool)
        .await?
        .ok_or_else(|| AppError::not_found(format!("There is no partner with id {id} in database")))
}

// GET /partners
#[instrument(skip(state))]
pub async fn list_partners(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let partners = sqlx::query_as::<_, Partner>(&format!(
        "SELECT {PARTNER_COLUMNS} FROM partners ORDER BY partner_name"
    ))
    .fetch_all(&state.db_pool)
    .await?;

    if partners.is_empty() {
        return Err(AppError::not_found("There are no partners in database"));
    }

    Ok(Json(json!({ "success": true, "partners": partners })))
}

// POST /partners
#[instrument(skip(state, payload))]
pub async fn create_partner(
    State(state): State<AppState>,
    payload: Result<Json<CreatePartnerRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let Json(req) = payload?;
    let partner_name = required_text(req.partner_name, "partner_name")?;
    let partner_address = required_text(req.partner_address, "partner_address")?;

    let partner = sqlx::query_as::<_, Partner>(&format!(
        "INSERT INTO partners (partner_name, partner_address, partner_manager_first_name, partner_manager_last_name)
         VALUES ($1, $2, $3, $4)
         RETURNING {PARTNER_COLUMNS}"
    ))
    .bind(&partner_name)
    .bind(&partner_address)
    .bind(optional_text(req.partner_manager_first_name))
    .bind(optional_text(req.partner_manager_last_name))
    .fetch_one(&state.db_pool)
    .await
    .map_err(|e| AppError::unique_violation(e, &format!("{partner_name} already exists in database")))?;

    info!(partner_id = partner.id, "partner created");

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": format!("{partner_name} successfully added in database"),
            "partner": partner,
        })),
    ))
}

// GET /partners/{id}
#[instrument(skip(state))]
pub async fn get_partner(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<Value>, AppError> {
    let partner = find_partner(&state, id).await?;
    Ok(Json(json!({ "success": true, "partner": partner })))
}

// PUT /partners/{id}
#[instrument(skip(state, payload))]
pub async fn update_partner(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    payload: Result<Json<UpdatePartnerRequest>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let Json(req) = payload?;
    let partner_name = req.partner_name.map(|v| non_blank(v, "partner_name")).transpose()?;
    let partner_address = req.partner_address.map(|v| non_blank(v, "partner_address")).transpose()?;

    let partner = sqlx::query_as::<_, Partner>(&format!(
        "UPDATE partners SET
         partner_name = COALESCE($1, partner_name),
         partner_address = COALESCE($2, partner_address),
         partner_manager_first_name = COALESCE($3, partner_manager_first_name),
         partner_manager_last_name = COALESCE($4, partner_manager_last_name)
         WHERE id = $5
         RETURNING {PARTNER_COLUMNS}"
    ))
    .bind(partner_name)
    .bind(partner_address)
    .bind(optional_text(req.partner_manager_first_name))
    .bind(optional_text(req.partner_manager_last_name))
    .bind(id)
    .fetch_optional(&state.db_pool)
    .await
    .map_err(|e| AppError::unique_violation(e, "Another partner already has this name"))?
    .ok_or_else(|| AppError::not_found(format!("There is no partner with id {id} in database")))?;

    Ok(Json(json!({
        "success": true,
        "message": format!("Information about {} successfully updated", partner.partner_name),
        "partner": partner,
    })))
}

// DELETE /partners/{id}
#[instrument(skip(state))]
pub async fn delete_partner(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<Value>, AppError> {
    let partner = find_partner(&state, id).await?;

    let in_use: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM bills WHERE partner_id = $1)
             OR EXISTS(SELECT 1 FROM invoices WHERE partner_id = $1)",
    )
    .bind(id)
    .fetch_one(&state.db_pool)
    .await?;

    if in_use {
        return Err(AppError::blocked(
            "Cannot delete partner. There are bills/invoices from/to this partner",
        ));
    }

    sqlx::query("DELETE FROM partners WHERE id = $1")
        .bind(id)
        .execute(&state.db_pool)
        .await?;

    info!(partner_id = id, "partner deleted");

    Ok(Json(json!({
        "success": true,
        "message": format!("{} successfully deleted from database", partner.partner_name),
    })))
}
