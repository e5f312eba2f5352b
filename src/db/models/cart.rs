//! Cart model
//!
//! One cart document per user. Items snapshot the customization and price
//! at the time they were added; two identical additions stay as two items
//! (the storefront never merges lines).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Selected rug size, in the buyer's original unit plus normalized area.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SizeSelection {
    pub width: Option<f64>,
    pub length: Option<f64>,
    pub area: Option<f64>,
    pub original_unit: Option<String>,
}

/// One line in the cart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItem {
    /// Line identifier, assigned when the item is added
    pub item_id: String,
    /// Product document id, `product:xxx`
    pub product_id: String,
    pub quantity: u32,
    /// Unit price snapshot in minor currency units
    pub price: u64,
    #[serde(default)]
    pub size: SizeSelection,
    pub material: Option<String>,
    pub shape: Option<String>,
    pub pile_height: Option<String>,
    pub knot_density: Option<String>,
    /// Chosen color code per color group
    #[serde(default)]
    pub color_code: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cart {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    /// Owning user id, `user:xxx`
    pub user: String,
    #[serde(default)]
    pub items: Vec<CartItem>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl Cart {
    pub fn empty(user: String) -> Self {
        Self {
            id: None,
            user,
            items: Vec::new(),
            updated_at: Utc::now(),
        }
    }

    /// Total item count
    pub fn count(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Total price in minor currency units
    pub fn total(&self) -> u64 {
        self.items
            .iter()
            .map(|i| i.price * u64::from(i.quantity))
            .sum()
    }
}

/// Payload for adding an item to the cart.
#[derive(Debug, Clone, Deserialize)]
pub struct CartItemCreate {
    pub product_id: String,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    pub price: u64,
    #[serde(default)]
    pub size: SizeSelection,
    pub material: Option<String>,
    pub shape: Option<String>,
    pub pile_height: Option<String>,
    pub knot_density: Option<String>,
    pub color_code: Option<String>,
}

fn default_quantity() -> u32 {
    1
}
