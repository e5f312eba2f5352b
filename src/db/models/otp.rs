//! OTP model
//!
//! One record per (email, purpose) pair; resending replaces the record.
//! Only the SHA-256 hash of the code is stored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// What the code is being verified for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OtpPurpose {
    Registration,
    Login,
    PasswordReset,
}

impl OtpPurpose {
    pub fn as_str(&self) -> &'static str {
        match self {
            OtpPurpose::Registration => "registration",
            OtpPurpose::Login => "login",
            OtpPurpose::PasswordReset => "password_reset",
        }
    }
}

impl std::fmt::Display for OtpPurpose {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OtpRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub email: String,
    pub purpose: OtpPurpose,
    /// SHA-256 hex digest of the code
    pub code_hash: String,
    pub expires_at: DateTime<Utc>,
    #[serde(default)]
    pub attempts: u32,
    #[serde(default)]
    pub verified: bool,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}
