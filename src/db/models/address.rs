//! Address model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Address {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    /// Owning user id, `user:xxx`
    pub user: String,
    pub full_name: String,
    pub phone_number: String,
    pub street_address: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AddressCreate {
    #[validate(length(min = 1, max = 200))]
    pub full_name: String,
    #[validate(length(min = 1, max = 100))]
    pub phone_number: String,
    #[validate(length(min = 1, max = 500))]
    pub street_address: String,
    #[validate(length(min = 1, max = 200))]
    pub city: String,
    #[validate(length(min = 1, max = 200))]
    pub state: String,
    #[validate(length(min = 1, max = 100))]
    pub postal_code: String,
    #[validate(length(min = 1, max = 200))]
    pub country: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct AddressUpdate {
    #[validate(length(min = 1, max = 200))]
    pub full_name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub phone_number: Option<String>,
    #[validate(length(min = 1, max = 500))]
    pub street_address: Option<String>,
    #[validate(length(min = 1, max = 200))]
    pub city: Option<String>,
    #[validate(length(min = 1, max = 200))]
    pub state: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub postal_code: Option<String>,
    #[validate(length(min = 1, max = 200))]
    pub country: Option<String>,
}
