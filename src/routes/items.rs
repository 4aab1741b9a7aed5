use axum::{routing::get, Router};
use crate::state::AppState;
use crate::handlers::item::{create_item, delete_item, get_item, list_items, update_item};
use crate::handlers::stock::get_item_stock;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/items", get(list_items).post(create_item))
        .route("/items/{id}", get(get_item).put(update_item).delete(delete_item))
        .route("/items/{id}/stock", get(get_item_stock))
}
