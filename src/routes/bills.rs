use axum::{routing::get, Router};
use crate::state::AppState;
use crate::handlers::bill::{create_bill, get_bill, list_bills};
use crate::handlers::bill_record::{create_bill_record, list_bill_records};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/bills", get(list_bills).post(create_bill))
        .route("/bills/{id}", get(get_bill))
        .route("/bill_records", get(list_bill_records).post(create_bill_record))
}
