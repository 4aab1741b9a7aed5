use axum::{routing::get, Router};
use crate::state::AppState;
use crate::handlers::vat_rate::{create_vat_rate, delete_vat_rate, get_vat_rate, list_vat_rates, update_vat_rate};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/vat_rates", get(list_vat_rates).post(create_vat_rate))
        .route("/vat_rates/{id}", get(get_vat_rate).put(update_vat_rate).delete(delete_vat_rate))
}
