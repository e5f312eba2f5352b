//! Catalog service
//!
//! Coordinates the product repository and the asset store. The asset store
//! has no transactional relationship to the database: deletions for removed
//! variants are issued best effort before the document write, and a write
//! failure after that point is an accepted inconsistency (orphans at most).

pub mod reconciler;
pub mod validate;

use std::sync::Arc;

use crate::assets::{AssetStore, cleanup};
use crate::db::models::{Product, ProductCreate, ProductUpdate};
use crate::db::repository::{ProductPage, ProductQuery, ProductRepository};
use crate::utils::validation::{self, MAX_DESCRIPTION_LEN, MAX_NAME_LEN};
use crate::utils::{AppError, AppResult};

#[derive(Clone)]
pub struct CatalogService {
    products: ProductRepository,
    assets: Arc<dyn AssetStore>,
}

impl CatalogService {
    pub fn new(products: ProductRepository, assets: Arc<dyn AssetStore>) -> Self {
        Self { products, assets }
    }

    pub async fn get_product(&self, id: &str) -> AppResult<Product> {
        self.products
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Product {} not found", id)))
    }

    pub async fn list_products(&self, query: ProductQuery) -> AppResult<ProductPage> {
        Ok(self.products.find_page(query).await?)
    }

    /// Create a product from a strictly validated submission. If the write
    /// fails, assets referenced by the submission are compensated with
    /// best-effort deletes so the upload is not left orphaned.
    pub async fn create_product(&self, payload: ProductCreate) -> AppResult<Product> {
        let mut errors = Vec::new();
        if let Err(msg) = validation::validate_required_text(&payload.name, "name", MAX_NAME_LEN) {
            errors.push(msg);
        }
        if let Err(msg) = validation::validate_required_text(
            &payload.description,
            "description",
            MAX_DESCRIPTION_LEN,
        ) {
            errors.push(msg);
        }
        if payload.shape.is_empty() {
            errors.push("at least one shape tag is required".to_string());
        }
        if payload.category.is_empty() {
            errors.push("at least one category is required".to_string());
        }
        if payload.rug_type.is_empty() {
            errors.push("at least one rug type is required".to_string());
        }

        let colors = match validate::build_colors(&payload.colors) {
            Ok(colors) => colors,
            Err(mut color_errors) => {
                errors.append(&mut color_errors);
                return Err(AppError::ValidationErrors(errors));
            }
        };
        if !errors.is_empty() {
            return Err(AppError::ValidationErrors(errors));
        }

        let product = Product {
            id: None,
            name: payload.name,
            description: payload.description,
            shape: payload.shape,
            category: payload.category,
            rug_type: payload.rug_type,
            delivery_time: payload.delivery_time,
            pricing: payload.pricing,
            colors,
            created_at: chrono::Utc::now(),
        };

        let asset_ids = product.asset_ids();
        match self.products.create(product).await {
            Ok(created) => Ok(created),
            Err(err) => {
                tracing::warn!(
                    assets = asset_ids.len(),
                    "Product creation failed, compensating asset cleanup"
                );
                cleanup::delete_all(self.assets.as_ref(), &asset_ids).await;
                Err(err.into())
            }
        }
    }

    /// Update scalar fields and reconcile a submitted colors list.
    ///
    /// Orphan deletions are issued before the document write; there is no
    /// rollback if the write fails afterwards.
    pub async fn update_product(&self, id: &str, payload: ProductUpdate) -> AppResult<Product> {
        let mut product = self.get_product(id).await?;

        if let Some(name) = payload.name {
            product.name = name;
        }
        if let Some(description) = payload.description {
            product.description = description;
        }
        if let Some(shape) = payload.shape {
            product.shape = shape;
        }
        if let Some(category) = payload.category {
            product.category = category;
        }
        if let Some(rug_type) = payload.rug_type {
            product.rug_type = rug_type;
        }
        if let Some(delivery_time) = payload.delivery_time {
            product.delivery_time = delivery_time;
        }
        if let Some(pricing) = payload.pricing {
            product.pricing = pricing;
        }

        if let Some(submitted) = payload.colors {
            let outcome = reconciler::reconcile(&product.colors, submitted);
            for skip in &outcome.skipped {
                tracing::warn!(
                    product = %id,
                    index = ?skip.index,
                    reason = %skip.reason,
                    "Skipped color entry in update"
                );
            }
            if !outcome.orphaned_assets.is_empty() {
                let deleted =
                    cleanup::delete_all(self.assets.as_ref(), &outcome.orphaned_assets).await;
                tracing::info!(
                    product = %id,
                    scheduled = outcome.orphaned_assets.len(),
                    deleted,
                    "Deleted assets of removed color variants"
                );
            }
            product.colors = outcome.colors;
        }

        Ok(self.products.replace(id, product).await?)
    }

    /// Delete the product and best-effort delete all of its assets.
    pub async fn delete_product(&self, id: &str) -> AppResult<Product> {
        let product = self.get_product(id).await?;
        let asset_ids = product.asset_ids();
        let deleted = cleanup::delete_all(self.assets.as_ref(), &asset_ids).await;
        tracing::info!(
            product = %id,
            scheduled = asset_ids.len(),
            deleted,
            "Deleted product assets"
        );
        Ok(self.products.delete(id).await?)
    }

    /// Remove a single image from a variant and delete its asset. The last
    /// base image of a variant cannot be removed.
    pub async fn remove_image(
        &self,
        id: &str,
        variant_id: &str,
        asset_id: &str,
    ) -> AppResult<Product> {
        let mut product = self.get_product(id).await?;
        let variant = product
            .colors
            .iter_mut()
            .find(|v| v.variant_id == variant_id)
            .ok_or_else(|| {
                AppError::not_found(format!("Color variant {} not found", variant_id))
            })?;

        let in_base = variant.base_images.iter().any(|i| i.asset_id == asset_id);
        let in_layer = variant.layer_images.iter().any(|i| i.asset_id == asset_id);
        if !in_base && !in_layer {
            return Err(AppError::not_found(format!("Image {} not found", asset_id)));
        }
        if in_base && variant.base_images.len() == 1 {
            return Err(AppError::validation(
                "Cannot remove the last base image of a color variant",
            ));
        }

        variant.base_images.retain(|i| i.asset_id != asset_id);
        variant.layer_images.retain(|i| i.asset_id != asset_id);
        // Keep the main-image invariant if the main one was removed
        if in_base && !variant.base_images.iter().any(|i| i.is_main)
            && let Some(first) = variant.base_images.first_mut()
        {
            first.is_main = true;
        }

        cleanup::delete_all(self.assets.as_ref(), &[asset_id.to_string()]).await;
        Ok(self.products.replace(id, product).await?)
    }
}
