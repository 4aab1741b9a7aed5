use axum::{routing::get, Router};
use crate::state::AppState;
use crate::handlers::partner::{create_partner, delete_partner, get_partner, list_partners, update_partner};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/partners", get(list_partners).post(create_partner))
        .route("/partners/{id}", get(get_partner).put(update_partner).delete(delete_partner))
}
