//! Wishlist API handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::Wishlist;
use crate::utils::{AppError, AppResponse, AppResult, ok, ok_with_message};

/// GET /api/wishlist
pub async fn get_wishlist(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<AppResponse<Wishlist>>> {
    let wishlist = state.wishlists.find_or_create(&user.id).await?;
    Ok(ok(wishlist))
}

#[derive(Debug, Deserialize)]
pub struct WishlistAdd {
    pub product_id: String,
}

/// POST /api/wishlist
///
/// Adding a product twice returns a conflict.
pub async fn add_product(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<WishlistAdd>,
) -> AppResult<Json<AppResponse<Wishlist>>> {
    if !state.products.exists(&payload.product_id).await? {
        return Err(AppError::not_found(format!(
            "Product {} not found",
            payload.product_id
        )));
    }
    let wishlist = state
        .wishlists
        .add_product(&user.id, &payload.product_id)
        .await?;
    Ok(ok_with_message(wishlist, "Product added to wishlist"))
}

/// DELETE /api/wishlist/:product_id
pub async fn remove_product(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(product_id): Path<String>,
) -> AppResult<Json<AppResponse<Wishlist>>> {
    let wishlist = state
        .wishlists
        .remove_product(&user.id, &product_id)
        .await?;
    Ok(ok_with_message(wishlist, "Product removed from wishlist"))
}
