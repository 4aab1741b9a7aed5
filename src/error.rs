// src/error.rs
use axum::{
    extract::rejection::JsonRejection,
    response::{IntoResponse, Response},
    Json,
};
use http::StatusCode;
use serde_json::json;
use sqlx::Error as SqlxError;

use crate::valuation::ValuationError;

#[derive(Debug)]
pub enum AppError {
    DatabaseError(SqlxError),
    MissingField(String),
    InvalidInput(String),
    NotFound(String),
    Conflict(String),
    ReferentialBlock(String),
    Valuation(ValuationError),
}

impl AppError {
    pub fn missing_field(field: &str) -> Self {
        AppError::MissingField(format!("request must contain '{field}'"))
    }

    pub fn invalid(msg: impl Into<String>) -> Self {
        AppError::InvalidInput(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        AppError::NotFound(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        AppError::Conflict(msg.into())
    }

    pub fn blocked(msg: impl Into<String>) -> Self {
        AppError::ReferentialBlock(msg.into())
    }

    /// Turns a unique violation into a `Conflict` carrying `message`.
    pub fn unique_violation(err: SqlxError, message: &str) -> Self {
        match err {
            SqlxError::Database(db_err) if db_err.code().as_deref() == Some("23505") => {
                AppError::conflict(message)
            }
            other => other.into(),
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            AppError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::MissingField(_) | AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) | AppError::ReferentialBlock(_) => StatusCode::CONFLICT,
            AppError::Valuation(err) => match err {
                ValuationError::InsufficientStock { .. } | ValuationError::OutOfStock => {
                    StatusCode::UNPROCESSABLE_ENTITY
                }
                _ => StatusCode::BAD_REQUEST,
            },
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::DatabaseError(_) => f.write_str("Database error occurred"),
            AppError::MissingField(msg)
            | AppError::InvalidInput(msg)
            | AppError::NotFound(msg)
            | AppError::Conflict(msg)
            | AppError::ReferentialBlock(msg) => f.write_str(msg),
            AppError::Valuation(err) => write!(f, "{err}"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let AppError::DatabaseError(err) = &self {
            tracing::error!(error = ?err, "database error");
        }

        let body = Json(json!({
            "success": false,
            "message": self.to_string(),
        }));

        (self.status(), body).into_response()
    }
}

impl From<SqlxError> for AppError {
    fn from(err: SqlxError) -> Self {
        match &err {
            SqlxError::Database(db_err) if db_err.code().as_deref() == Some("40001") => AppError::conflict(
                "The record changed while it was being posted. Resubmit the request",
            ),
            // Dependents appeared or vanished between the check and the write.
            SqlxError::Database(db_err) if db_err.code().as_deref() == Some("23503") => AppError::blocked(
                "This record is linked to other records in database. Resubmit the request",
            ),
            _ => AppError::DatabaseError(err),
        }
    }
}

impl From<ValuationError> for AppError {
    fn from(err: ValuationError) -> Self {
        AppError::Valuation(err)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::invalid(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_of(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn errors_render_the_envelope() {
        let (status, body) = body_of(AppError::not_found("There is no item with id 3 in database")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "There is no item with id 3 in database");
    }

    #[tokio::test]
    async fn stock_errors_are_unprocessable() {
        let err: AppError = ValuationError::InsufficientStock { available: 10.0 }.into();
        let (status, body) = body_of(err).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            body["message"],
            "You don't have enough quantity on stock. Maximum quantity allowed: 10"
        );
    }

    #[tokio::test]
    async fn database_details_stay_internal() {
        let (status, body) = body_of(AppError::DatabaseError(SqlxError::RowNotFound)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "Database error occurred");
    }

    #[test]
    fn blocked_deletes_are_conflicts() {
        assert_eq!(AppError::blocked("in use").status(), StatusCode::CONFLICT);
        assert_eq!(AppError::missing_field("quantity").to_string(), "request must contain 'quantity'");
    }
}
