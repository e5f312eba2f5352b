//! User model
//!
//! Accounts are created through the OTP flow; there is no password login.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

pub type UserId = RecordId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    User,
    Admin,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<UserId>,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    #[serde(default)]
    pub is_verified: bool,
    pub role: UserRole,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(email: String) -> Self {
        Self {
            id: None,
            email,
            first_name: None,
            last_name: None,
            phone_number: None,
            is_verified: false,
            role: UserRole::User,
            created_at: Utc::now(),
        }
    }
}
