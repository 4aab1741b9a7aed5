use axum::{routing::get, Router};
use crate::state::AppState;
use crate::handlers::unit::{create_unit, delete_unit, get_unit, list_units, update_unit};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/units_of_measure", get(list_units).post(create_unit))
        .route("/units_of_measure/{id}", get(get_unit).put(update_unit).delete(delete_unit))
}
