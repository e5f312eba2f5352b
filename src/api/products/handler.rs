//! Product API handlers
//!
//! Reads are public; writes require the admin role. All mutation goes
//! through the catalog service so asset cleanup is never skipped.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};

use crate::auth::AdminUser;
use crate::core::ServerState;
use crate::db::models::{Product, ProductCreate, ProductUpdate};
use crate::db::repository::{ProductQuery, ProductSort};
use crate::utils::{AppError, AppResponse, AppResult, ok, ok_with_message};

/// Query string of GET /api/products
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub limit: Option<u32>,
    /// Comma-separated category names
    pub categories: Option<String>,
    /// Comma-separated shape tags
    pub shapes: Option<String>,
    pub search: Option<String>,
    /// newest | name_asc | name_desc | price_asc | price_desc
    pub sort: Option<String>,
}

#[derive(Serialize)]
pub struct ProductListResponse {
    pub products: Vec<Product>,
    pub total: u64,
    pub page: u32,
    pub total_pages: u32,
}

fn split_csv(value: Option<String>) -> Vec<String> {
    value
        .map(|v| {
            v.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// GET /api/products
pub async fn list(
    State(state): State<ServerState>,
    Query(params): Query<ListParams>,
) -> AppResult<Json<AppResponse<ProductListResponse>>> {
    let sort = match params.sort.as_deref() {
        None | Some("newest") => ProductSort::Newest,
        Some("name_asc") => ProductSort::NameAsc,
        Some("name_desc") => ProductSort::NameDesc,
        Some("price_asc") => ProductSort::PriceAsc,
        Some("price_desc") => ProductSort::PriceDesc,
        Some(other) => {
            return Err(AppError::validation(format!("Unknown sort order: {other}")));
        }
    };

    let page = state
        .catalog
        .list_products(ProductQuery {
            page: params.page.unwrap_or(1),
            limit: params.limit.unwrap_or(20),
            categories: split_csv(params.categories),
            shapes: split_csv(params.shapes),
            search: params.search.filter(|s| !s.trim().is_empty()),
            sort,
        })
        .await?;

    Ok(ok(ProductListResponse {
        products: page.products,
        total: page.total,
        page: page.page,
        total_pages: page.total_pages,
    }))
}

/// GET /api/products/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<Product>>> {
    let product = state.catalog.get_product(&id).await?;
    Ok(ok(product))
}

/// POST /api/products
pub async fn create(
    State(state): State<ServerState>,
    _admin: AdminUser,
    Json(payload): Json<ProductCreate>,
) -> AppResult<Json<AppResponse<Product>>> {
    let product = state.catalog.create_product(payload).await?;
    Ok(ok_with_message(product, "Product created"))
}

/// PUT /api/products/:id
pub async fn update(
    State(state): State<ServerState>,
    _admin: AdminUser,
    Path(id): Path<String>,
    Json(payload): Json<ProductUpdate>,
) -> AppResult<Json<AppResponse<Product>>> {
    let product = state.catalog.update_product(&id, payload).await?;
    Ok(ok_with_message(product, "Product updated"))
}

/// DELETE /api/products/:id
pub async fn delete(
    State(state): State<ServerState>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<Product>>> {
    let product = state.catalog.delete_product(&id).await?;
    Ok(ok_with_message(product, "Product deleted"))
}

/// DELETE /api/products/:id/colors/:variant_id/images/:asset_id
pub async fn remove_image(
    State(state): State<ServerState>,
    _admin: AdminUser,
    Path((id, variant_id, asset_id)): Path<(String, String, String)>,
) -> AppResult<Json<AppResponse<Product>>> {
    let product = state.catalog.remove_image(&id, &variant_id, &asset_id).await?;
    Ok(ok_with_message(product, "Image removed"))
}
