//! JWT auth extractor
//!
//! Use [`CurrentUser`] as a handler argument to require a valid bearer token.
//! [`AdminUser`] additionally requires the admin role.

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::auth::{Claims, JwtService};
use crate::core::ServerState;
use crate::utils::AppError;

/// Authenticated caller, resolved from the bearer token.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: String,
    pub email: String,
    pub is_admin: bool,
}

impl From<Claims> for CurrentUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            email: claims.email,
            is_admin: claims.role == "admin",
        }
    }
}

impl FromRequestParts<ServerState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok());

        let token = match auth_header {
            Some(header) => JwtService::extract_from_header(header)
                .ok_or_else(|| AppError::invalid_token("Invalid authorization header"))?,
            None => {
                tracing::warn!(uri = ?parts.uri, "Request without authorization header");
                return Err(AppError::Unauthorized);
            }
        };

        let claims = state.jwt.validate_token(token)?;
        Ok(CurrentUser::from(claims))
    }
}

/// Authenticated caller with the admin role.
#[derive(Debug, Clone)]
pub struct AdminUser(pub CurrentUser);

impl FromRequestParts<ServerState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        let user = CurrentUser::from_request_parts(parts, state).await?;
        if !user.is_admin {
            tracing::warn!(user = %user.id, uri = ?parts.uri, "Admin endpoint denied");
            return Err(AppError::Unauthorized);
        }
        Ok(AdminUser(user))
    }
}
