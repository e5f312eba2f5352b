//! Server configuration
//!
//! Everything comes from the environment (a `.env` file is loaded first in
//! `main`). Asset store credentials are optional: without them the server
//! falls back to the in-memory store, which only makes sense in development.

use crate::utils::{AppError, AppResult};

const DEV_JWT_SECRET: &str = "rugloom-development-secret-not-for-production";

#[derive(Debug, Clone)]
pub struct AssetStoreConfig {
    pub base_url: String,
    pub api_key: String,
    pub api_secret: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    /// On-disk database directory
    pub data_dir: String,
    pub http_port: u16,
    pub environment: String,
    pub jwt_secret: String,
    /// None means no asset store is configured
    pub asset_store: Option<AssetStoreConfig>,
}

impl Config {
    pub fn from_env() -> AppResult<Self> {
        let environment =
            std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        let jwt_secret = match std::env::var("JWT_SECRET") {
            Ok(secret) if secret.len() >= 32 => secret,
            Ok(_) => {
                return Err(AppError::internal(
                    "JWT_SECRET must be at least 32 characters",
                ));
            }
            Err(_) if environment == "production" => {
                return Err(AppError::internal("JWT_SECRET must be set in production"));
            }
            Err(_) => {
                tracing::warn!("JWT_SECRET not set, using development secret");
                DEV_JWT_SECRET.to_string()
            }
        };

        let asset_store = match (
            std::env::var("ASSET_STORE_URL"),
            std::env::var("ASSET_STORE_KEY"),
            std::env::var("ASSET_STORE_SECRET"),
        ) {
            (Ok(base_url), Ok(api_key), Ok(api_secret)) => Some(AssetStoreConfig {
                base_url,
                api_key,
                api_secret,
            }),
            _ if environment == "production" => {
                return Err(AppError::internal(
                    "ASSET_STORE_URL/KEY/SECRET must be set in production",
                ));
            }
            _ => None,
        };

        Ok(Self {
            data_dir: std::env::var("DATA_DIR").unwrap_or_else(|_| "./data".to_string()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            environment,
            jwt_secret,
            asset_store,
        })
    }
}
