//! Outbound mail seam
//!
//! Email delivery is an external collaborator; the OTP service only needs
//! "send this code to this address". The log implementation backs local
//! development and tests.

use async_trait::async_trait;
use thiserror::Error;

use crate::db::models::OtpPurpose;

#[derive(Debug, Error)]
#[error("Mail delivery failed: {0}")]
pub struct MailError(pub String);

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_code(&self, email: &str, code: &str, purpose: OtpPurpose)
    -> Result<(), MailError>;
}

/// Logs codes instead of sending them. Development only.
#[derive(Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send_code(
        &self,
        email: &str,
        code: &str,
        purpose: OtpPurpose,
    ) -> Result<(), MailError> {
        tracing::info!(%email, %purpose, %code, "OTP code (log mailer)");
        Ok(())
    }
}
