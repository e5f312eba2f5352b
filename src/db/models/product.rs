//! Product model
//!
//! The product aggregate owns its color variants; variants own their image
//! references. An [`ImageRef`] is a value object pointing at an asset held
//! by the remote asset store: it is never edited in place. Replacing an
//! image means deleting the old asset and inserting a new reference.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

pub type ProductId = RecordId;

/// Reference to an image held by the asset store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRef {
    /// Asset store public identifier, unique within a product
    pub asset_id: String,
    pub url: String,
    #[serde(default)]
    pub is_main: bool,
}

/// Overlay image tinting a color group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerImageRef {
    pub asset_id: String,
    pub url: String,
    /// Overlay tint
    pub color_code: String,
    /// Back-reference to the color group this overlay tints. Not an
    /// ownership link; may point at a sibling variant.
    pub color_variant_id: String,
    #[serde(default)]
    pub is_main: bool,
}

/// One purchasable color option of a product.
///
/// `variant_id` is assigned by the catalog service on first persistence and
/// never changes afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorVariant {
    pub variant_id: String,
    pub name: String,
    /// Hex color, `#RRGGBB`
    pub color_code: String,
    /// Single shape tag (unlike the product-level shape set)
    pub shape: String,
    /// At least one, exactly one marked main
    pub base_images: Vec<ImageRef>,
    #[serde(default)]
    pub layer_images: Vec<LayerImageRef>,
}

impl ColorVariant {
    /// Every asset id referenced by this variant (base + layer).
    pub fn asset_ids(&self) -> Vec<String> {
        self.base_images
            .iter()
            .map(|img| img.asset_id.clone())
            .chain(self.layer_images.iter().map(|img| img.asset_id.clone()))
            .collect()
    }
}

/// Price for one material option, in minor currency units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialPrice {
    pub material: String,
    pub price: u64,
}

/// Structured pricing: per-material base prices plus adjustments keyed by
/// knot-density tier and pile-height tier.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Pricing {
    #[serde(default)]
    pub material_prices: Vec<MaterialPrice>,
    #[serde(default)]
    pub knot_density: BTreeMap<String, i64>,
    #[serde(default)]
    pub pile_height: BTreeMap<String, i64>,
}

/// Product aggregate root
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<ProductId>,
    pub name: String,
    pub description: String,
    /// Shape tags (product level; variants carry a single shape each)
    pub shape: Vec<String>,
    pub category: Vec<String>,
    pub rug_type: Vec<String>,
    /// Free-text delivery estimate
    pub delivery_time: String,
    #[serde(default)]
    pub pricing: Pricing,
    /// Invariant: never empty once persisted
    pub colors: Vec<ColorVariant>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Every asset id referenced anywhere in the aggregate.
    pub fn asset_ids(&self) -> Vec<String> {
        self.colors.iter().flat_map(|c| c.asset_ids()).collect()
    }
}

// =============================================================================
// Submission DTOs
// =============================================================================

/// Image as submitted by the client. All identifying fields are optional at
/// the wire level; the catalog layer decides what to reject, skip, or trust.
/// `color_code`/`color_variant_id` are only meaningful for layer images.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImageSubmission {
    pub asset_id: Option<String>,
    pub url: Option<String>,
    #[serde(default)]
    pub is_main: bool,
    pub color_code: Option<String>,
    pub color_variant_id: Option<String>,
}

/// Color variant as submitted by the client.
///
/// A present `variant_id` means "edit this variant"; an absent one means
/// "create a new variant". Scalar fields are optional at the wire level so
/// that a malformed entry can be skipped instead of failing the whole
/// request body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ColorSubmission {
    pub variant_id: Option<String>,
    pub name: Option<String>,
    pub color_code: Option<String>,
    pub shape: Option<String>,
    #[serde(default)]
    pub base_images: Vec<ImageSubmission>,
    #[serde(default)]
    pub layer_images: Vec<ImageSubmission>,
}

/// Payload for product creation. All fields required; colors are validated
/// strictly (per-index aggregated messages) before anything is persisted.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductCreate {
    pub name: String,
    pub description: String,
    pub shape: Vec<String>,
    pub category: Vec<String>,
    pub rug_type: Vec<String>,
    pub delivery_time: String,
    #[serde(default)]
    pub pricing: Pricing,
    pub colors: Vec<ColorSubmission>,
}

/// Payload for product update. Present scalar fields overwrite; a present
/// `colors` array goes through the reconciler.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub shape: Option<Vec<String>>,
    pub category: Option<Vec<String>>,
    pub rug_type: Option<Vec<String>>,
    pub delivery_time: Option<String>,
    pub pricing: Option<Pricing>,
    pub colors: Option<Vec<ColorSubmission>>,
}
