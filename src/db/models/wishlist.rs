//! Wishlist model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// One wishlist document per user, holding product document ids.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wishlist {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    /// Owning user id, `user:xxx`
    pub user: String,
    #[serde(default)]
    pub products: Vec<String>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl Wishlist {
    pub fn empty(user: String) -> Self {
        Self {
            id: None,
            user,
            products: Vec::new(),
            updated_at: Utc::now(),
        }
    }
}
