// src/handlers/unit.rs
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use tracing::instrument;

use crate::dtos::unit::{CreateUnitRequest, UpdateUnitRequest};
use crate::dtos::{non_blank, required_text};
use crate::error::AppError;
use crate::models::unit::UnitOfMeasure;
use crate::state::AppState;

/// First letter upper-case, the rest lower-case ("kilogram" -> "Kilogram").
pub fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

async fn find_unit(state: &AppState, id: i64) -> Result<UnitOfMeasure, AppError> {
    sqlx::query_as::<_, UnitOfMeasure>("SELECT id, unit_acronym, unit_name FROM units_of_measure WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.db_pool)
        .await?
        .ok_or_else(|| AppError::not_found(format!("There is no unit of measure with id {id} in database")))
}

// GET /units_of_measure
#[instrument(skip(state))]
pub async fn list_units(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let units = sqlx::query_as::<_, UnitOfMeasure>(
        "SELECT id, unit_acronym, unit_name FROM units_of_measure ORDER BY unit_name",
    )
    .fetch_all(&state.db_pool)
    .await?;

    if units.is_empty() {
        return Err(AppError::not_found("There are no units of measure in database"));
    }

    Ok(Json(json!({ "success": true, "units_of_measure": units })))
}

// POST /units_of_measure
#[instrument(skip(state, payload))]
pub async fn create_unit(
    State(state): State<AppState>,
    payload: Result<Json<CreateUnitRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let Json(req) = payload?;
    let acronym = required_text(req.unit_acronym, "unit_acronym")?.to_uppercase();
    let name = capitalize(&required_text(req.unit_name, "unit_name")?);
    let label = format!("{name} ({acronym})");

    let unit = sqlx::query_as::<_, UnitOfMeasure>(
        "INSERT INTO units_of_measure (unit_acronym, unit_name) VALUES ($1, $2)
         RETURNING id, unit_acronym, unit_name",
    )
    .bind(&acronym)
    .bind(&name)
    .fetch_one(&state.db_pool)
    .await
    .map_err(|e| AppError::unique_violation(e, &format!("{label} already exists in database")))?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": format!("{label} successfully added to database"),
            "unit_of_measure": unit,
        })),
    ))
}

// GET /units_of_measure/{id}
#[instrument(skip(state))]
pub async fn get_unit(Path(id): Path<i64>, State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let unit = find_unit(&state, id).await?;
    Ok(Json(json!({ "success": true, "unit_of_measure": unit })))
}

// PUT /units_of_measure/{id}
#[instrument(skip(state, payload))]
pub async fn update_unit(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    payload: Result<Json<UpdateUnitRequest>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let Json(req) = payload?;
    let acronym = req
        .unit_acronym
        .map(|v| non_blank(v, "unit_acronym").map(|v| v.to_uppercase()))
        .transpose()?;
    let name = req
        .unit_name
        .map(|v| non_blank(v, "unit_name").map(|v| capitalize(&v)))
        .transpose()?;

    let unit = sqlx::query_as::<_, UnitOfMeasure>(
        "UPDATE units_of_measure SET
         unit_acronym = COALESCE($1, unit_acronym),
         unit_name = COALESCE($2, unit_name)
         WHERE id = $3
         RETURNING id, unit_acronym, unit_name",
    )
    .bind(acronym)
    .bind(name)
    .bind(id)
    .fetch_optional(&state.db_pool)
    .await
    .map_err(|e| AppError::unique_violation(e, "A unit of measure with this name or acronym already exists"))?
    .ok_or_else(|| AppError::not_found(format!("There is no unit of measure with id {id} in database")))?;

    Ok(Json(json!({
        "success": true,
        "message": format!("{} ({}) successfully updated", unit.unit_name, unit.unit_acronym),
        "unit_of_measure": unit,
    })))
}

// DELETE /units_of_measure/{id}
#[instrument(skip(state))]
pub async fn delete_unit(Path(id): Path<i64>, State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let unit = find_unit(&state, id).await?;

    let in_use: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM items WHERE unit_id = $1)")
        .bind(id)
        .fetch_one(&state.db_pool)
        .await?;

    if in_use {
        return Err(AppError::blocked(
            "Cannot delete unit of measure. There are items measured in this unit",
        ));
    }

    sqlx::query("DELETE FROM units_of_measure WHERE id = $1")
        .bind(id)
        .execute(&state.db_pool)
        .await?;

    Ok(Json(json!({
        "success": true,
        "message": format!("{} ({}) successfully deleted from database", unit.unit_name, unit.unit_acronym),
    })))
}
