//! JWT token service
//!
//! Issues and validates the access tokens handed out after a successful OTP
//! verification.

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::db::models::UserRole;
use crate::utils::AppError;

#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Signing secret, at least 32 bytes
    pub secret: String,
    /// Token lifetime in minutes
    pub expiration_minutes: i64,
    pub issuer: String,
    pub audience: String,
}

impl JwtConfig {
    pub fn new(secret: String) -> Self {
        Self {
            secret,
            expiration_minutes: 1440,
            issuer: "rugloom-server".to_string(),
            audience: "rugloom-clients".to_string(),
        }
    }
}

/// Claims carried in every token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User record id (subject)
    pub sub: String,
    pub email: String,
    /// "user" or "admin"
    pub role: String,
    /// Expiry timestamp
    pub exp: i64,
    /// Issued-at timestamp
    pub iat: i64,
    pub iss: String,
    pub aud: String,
}

#[derive(Debug, Error)]
pub enum JwtError {
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Token expired")]
    ExpiredToken,

    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Token generation failed: {0}")]
    GenerationFailed(String),
}

impl From<JwtError> for AppError {
    fn from(e: JwtError) -> Self {
        match e {
            JwtError::ExpiredToken => AppError::TokenExpired,
            JwtError::InvalidToken(msg) => AppError::InvalidToken(msg),
            JwtError::InvalidSignature => AppError::InvalidToken("Invalid signature".to_string()),
            JwtError::GenerationFailed(msg) => AppError::Internal(msg),
        }
    }
}

#[derive(Clone)]
pub struct JwtService {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtService {
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());
        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    pub fn generate_token(
        &self,
        user_id: &str,
        email: &str,
        role: UserRole,
    ) -> Result<String, JwtError> {
        let now = Utc::now();
        let expiration = now + Duration::minutes(self.config.expiration_minutes);

        let claims = Claims {
            sub: user_id.to_string(),
            email: email.to_string(),
            role: match role {
                UserRole::Admin => "admin".to_string(),
                UserRole::User => "user".to_string(),
            },
            exp: expiration.timestamp(),
            iat: now.timestamp(),
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| JwtError::GenerationFailed(e.to_string()))
    }

    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[&self.config.audience]);
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_required_spec_claims(&["sub", "exp", "iat", "iss", "aud"]);

        let token_data =
            decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::ExpiredToken,
                ErrorKind::InvalidSignature => JwtError::InvalidSignature,
                _ => JwtError::InvalidToken(e.to_string()),
            })?;

        Ok(token_data.claims)
    }

    /// Extract the bearer token from an Authorization header value.
    pub fn extract_from_header(header: &str) -> Option<&str> {
        header.strip_prefix("Bearer ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> JwtService {
        JwtService::new(JwtConfig::new(
            "test-secret-with-at-least-32-bytes!!".to_string(),
        ))
    }

    #[test]
    fn round_trips_claims() {
        let service = service();
        let token = service
            .generate_token("user:abc", "shopper@example.com", UserRole::User)
            .unwrap();
        let claims = service.validate_token(&token).unwrap();

        assert_eq!(claims.sub, "user:abc");
        assert_eq!(claims.email, "shopper@example.com");
        assert_eq!(claims.role, "user");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn rejects_token_signed_with_other_secret() {
        let other = JwtService::new(JwtConfig::new(
            "another-secret-with-at-least-32-bytes".to_string(),
        ));
        let token = other
            .generate_token("user:abc", "shopper@example.com", UserRole::Admin)
            .unwrap();

        assert!(service().validate_token(&token).is_err());
    }

    #[test]
    fn bearer_prefix_extraction() {
        assert_eq!(JwtService::extract_from_header("Bearer abc"), Some("abc"));
        assert_eq!(JwtService::extract_from_header("Basic abc"), None);
    }
}
