//! Cart API handlers
//!
//! Every route operates on the calling user's cart; the cart document is
//! created lazily on first access.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Cart, CartItemCreate};
use crate::utils::{AppError, AppResponse, AppResult, ok, ok_with_message};

/// GET /api/cart
pub async fn get_cart(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<AppResponse<Cart>>> {
    let cart = state.carts.find_or_create(&user.id).await?;
    Ok(ok(cart))
}

/// POST /api/cart
pub async fn add_item(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<CartItemCreate>,
) -> AppResult<Json<AppResponse<Cart>>> {
    if !state.products.exists(&payload.product_id).await? {
        return Err(AppError::not_found(format!(
            "Product {} not found",
            payload.product_id
        )));
    }
    let cart = state.carts.add_item(&user.id, payload).await?;
    Ok(ok_with_message(cart, "Item added"))
}

#[derive(Debug, Deserialize)]
pub struct QuantityUpdate {
    pub quantity: u32,
}

/// PATCH /api/cart/items/:item_id
pub async fn update_quantity(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(item_id): Path<String>,
    Json(payload): Json<QuantityUpdate>,
) -> AppResult<Json<AppResponse<Cart>>> {
    let cart = state
        .carts
        .update_quantity(&user.id, &item_id, payload.quantity)
        .await?;
    Ok(ok(cart))
}

/// DELETE /api/cart/items/:item_id
pub async fn remove_item(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(item_id): Path<String>,
) -> AppResult<Json<AppResponse<Cart>>> {
    let cart = state.carts.remove_item(&user.id, &item_id).await?;
    Ok(ok_with_message(cart, "Item removed"))
}

/// DELETE /api/cart
pub async fn clear(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<AppResponse<Cart>>> {
    let cart = state.carts.clear(&user.id).await?;
    Ok(ok_with_message(cart, "Cart cleared"))
}

#[derive(Serialize)]
pub struct CartSummary {
    pub item_count: u32,
    /// Total in minor currency units
    pub total: u64,
}

/// GET /api/cart/summary
pub async fn summary(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<AppResponse<CartSummary>>> {
    let cart = state.carts.find_or_create(&user.id).await?;
    Ok(ok(CartSummary {
        item_count: cart.count(),
        total: cart.total(),
    }))
}
