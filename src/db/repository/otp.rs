//! OTP repository
//!
//! One live record per (email, purpose). Issuing a new code deletes any
//! previous record first so stale codes can never verify.

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{OtpPurpose, OtpRecord};

const OTP_TABLE: &str = "otp";

#[derive(Clone)]
pub struct OtpRepository {
    base: BaseRepository,
}

impl OtpRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find(&self, email: &str, purpose: OtpPurpose) -> RepoResult<Option<OtpRecord>> {
        let records: Vec<OtpRecord> = self
            .base
            .db()
            .query("SELECT * FROM otp WHERE email = $email AND purpose = $purpose LIMIT 1")
            .bind(("email", email.to_lowercase()))
            .bind(("purpose", purpose))
            .await?
            .take(0)?;
        Ok(records.into_iter().next())
    }

    /// Replace any existing record for this (email, purpose) with a fresh one.
    pub async fn issue(&self, mut record: OtpRecord) -> RepoResult<OtpRecord> {
        record.email = record.email.to_lowercase();
        self.remove(&record.email, record.purpose).await?;
        let created: Option<OtpRecord> = self.base.db().create(OTP_TABLE).content(record).await?;
        created.ok_or_else(|| RepoError::Database("Failed to store OTP".to_string()))
    }

    /// Bump the failed-attempt counter; returns the updated record.
    pub async fn record_attempt(&self, record: &OtpRecord) -> RepoResult<OtpRecord> {
        let id = record
            .id
            .clone()
            .ok_or_else(|| RepoError::Database("OTP record has no id".to_string()))?;
        let mut updated = record.clone();
        updated.attempts += 1;
        updated.id = None;
        let saved: Option<OtpRecord> = self.base.db().update(id).content(updated).await?;
        saved.ok_or_else(|| RepoError::Database("Failed to update OTP".to_string()))
    }

    pub async fn remove(&self, email: &str, purpose: OtpPurpose) -> RepoResult<()> {
        self.base
            .db()
            .query("DELETE otp WHERE email = $email AND purpose = $purpose")
            .bind(("email", email.to_lowercase()))
            .bind(("purpose", purpose))
            .await?;
        Ok(())
    }
}
