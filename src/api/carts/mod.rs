//! Cart API module

mod handler;

use axum::{
    Router,
    routing::{get, patch},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/cart", cart_routes())
}

fn cart_routes() -> Router<ServerState> {
    Router::new()
        .route(
            "/",
            get(handler::get_cart)
                .post(handler::add_item)
                .delete(handler::clear),
        )
        .route(
            "/items/{item_id}",
            patch(handler::update_quantity).delete(handler::remove_item),
        )
        .route("/summary", get(handler::summary))
}
