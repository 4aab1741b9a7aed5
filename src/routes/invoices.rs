use axum::{routing::get, Router};
use crate::state::AppState;
use crate::handlers::invoice::{create_invoice, get_invoice, list_invoices};
use crate::handlers::invoice_record::{create_invoice_record, list_invoice_records};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/invoices", get(list_invoices).post(create_invoice))
        .route("/invoices/{id}", get(get_invoice))
        .route("/invoice_records", get(list_invoice_records).post(create_invoice_record))
}
