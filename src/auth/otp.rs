//! OTP service
//!
//! Email code flow: request a code (throttled per address and purpose),
//! verify it within its lifetime and attempt budget, receive a bearer token.
//! Only the SHA-256 hash of a code is ever persisted.

use std::sync::Arc;

use chrono::{Duration, Utc};
use rand::Rng;
use sha2::{Digest, Sha256};

use crate::auth::mailer::Mailer;
use crate::auth::throttle::ThrottleStore;
use crate::auth::JwtService;
use crate::db::models::{OtpPurpose, OtpRecord, User};
use crate::db::repository::{OtpRepository, UserRepository};
use crate::utils::{AppError, AppResult};

const CODE_LEN: usize = 6;
const CODE_TTL_MINUTES: i64 = 10;
const MAX_ATTEMPTS: u32 = 3;

/// Issued after a successful verification.
#[derive(Debug, serde::Serialize)]
pub struct AuthToken {
    pub token: String,
    pub email: String,
}

#[derive(Clone)]
pub struct OtpService {
    users: UserRepository,
    codes: OtpRepository,
    throttle: Arc<dyn ThrottleStore>,
    mailer: Arc<dyn Mailer>,
    jwt: Arc<JwtService>,
}

impl OtpService {
    pub fn new(
        users: UserRepository,
        codes: OtpRepository,
        throttle: Arc<dyn ThrottleStore>,
        mailer: Arc<dyn Mailer>,
        jwt: Arc<JwtService>,
    ) -> Self {
        Self {
            users,
            codes,
            throttle,
            mailer,
            jwt,
        }
    }

    /// Generate, store and send a code. Rejected inside the cooldown window.
    pub async fn send_code(&self, email: &str, purpose: OtpPurpose) -> AppResult<()> {
        let email = email.trim().to_lowercase();
        if !crate::utils::validation::is_email(&email) {
            return Err(AppError::validation("Invalid email address"));
        }

        match purpose {
            OtpPurpose::Registration => {
                if let Some(user) = self.users.find_by_email(&email).await?
                    && user.is_verified
                {
                    return Err(AppError::conflict("Account already registered"));
                }
            }
            OtpPurpose::Login | OtpPurpose::PasswordReset => {
                if self.users.find_by_email(&email).await?.is_none() {
                    return Err(AppError::not_found("No account with this email"));
                }
            }
        }

        let key = format!("{}:{}", email, purpose);
        if let Some(retry_in) = self.throttle.check_and_record(&key, Utc::now()) {
            return Err(AppError::TooManyRequests(format!(
                "Please wait {retry_in}s before requesting another code"
            )));
        }

        let code = generate_code();
        self.codes
            .issue(OtpRecord {
                id: None,
                email: email.clone(),
                purpose,
                code_hash: hash_code(&code),
                expires_at: Utc::now() + Duration::minutes(CODE_TTL_MINUTES),
                attempts: 0,
                verified: false,
                created_at: Utc::now(),
            })
            .await?;

        self.mailer
            .send_code(&email, &code, purpose)
            .await
            .map_err(|e| AppError::internal(e.to_string()))?;

        tracing::info!(%email, %purpose, "OTP code sent");
        Ok(())
    }

    /// Check a submitted code and hand out a token on success.
    pub async fn verify_code(
        &self,
        email: &str,
        purpose: OtpPurpose,
        code: &str,
    ) -> AppResult<AuthToken> {
        let email = email.trim().to_lowercase();
        let record = self
            .codes
            .find(&email, purpose)
            .await?
            .ok_or_else(|| AppError::validation("No code was requested for this email"))?;

        if record.expires_at < Utc::now() {
            self.codes.remove(&email, purpose).await?;
            return Err(AppError::validation("Code expired, request a new one"));
        }
        if record.attempts >= MAX_ATTEMPTS {
            self.codes.remove(&email, purpose).await?;
            return Err(AppError::TooManyRequests(
                "Too many failed attempts, request a new code".to_string(),
            ));
        }
        if hash_code(code.trim()) != record.code_hash {
            let updated = self.codes.record_attempt(&record).await?;
            let left = MAX_ATTEMPTS.saturating_sub(updated.attempts);
            return Err(AppError::validation(format!(
                "Invalid code, {left} attempts left"
            )));
        }

        self.codes.remove(&email, purpose).await?;

        let user = match self.users.find_by_email(&email).await? {
            Some(user) if user.is_verified => user,
            Some(_) => self.users.mark_verified(&email).await?,
            None if purpose == OtpPurpose::Registration => {
                self.users.create(User::new(email.clone())).await?;
                self.users.mark_verified(&email).await?
            }
            None => return Err(AppError::not_found("No account with this email")),
        };

        let user_id = user
            .id
            .as_ref()
            .map(|id| id.to_string())
            .ok_or_else(|| AppError::internal("User record has no id"))?;
        let token = self.jwt.generate_token(&user_id, &user.email, user.role)?;

        tracing::info!(%email, %purpose, "OTP verified, token issued");
        Ok(AuthToken {
            token,
            email: user.email,
        })
    }
}

fn generate_code() -> String {
    let mut rng = rand::thread_rng();
    (0..CODE_LEN)
        .map(|_| char::from(b'0' + rng.gen_range(0..10)))
        .collect()
}

fn hash_code(code: &str) -> String {
    hex::encode(Sha256::digest(code.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_six_digits() {
        for _ in 0..50 {
            let code = generate_code();
            assert_eq!(code.len(), 6);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn hash_is_stable_and_hex() {
        let a = hash_code("123456");
        let b = hash_code("123456");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert_ne!(a, hash_code("654321"));
    }
}
