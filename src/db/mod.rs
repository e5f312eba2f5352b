//! Database module
//!
//! Embedded SurrealDB document store. Products, taxonomy and storefront
//! documents all live in one namespace; per-document atomic replace is the
//! only consistency primitive the rest of the code relies on.

pub mod models;
pub mod repository;

use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem, RocksDb};

use crate::utils::AppError;

const NAMESPACE: &str = "rugloom";
const DATABASE: &str = "main";

/// Database service, owns the embedded SurrealDB handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open (or create) the on-disk database under `data_dir`.
    pub async fn new(data_dir: &str) -> Result<Self, AppError> {
        let db = Surreal::new::<RocksDb>(data_dir)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;

        db.use_ns(NAMESPACE)
            .use_db(DATABASE)
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;

        tracing::info!(path = %data_dir, "Database connection established (SurrealDB/RocksDB)");

        Ok(Self { db })
    }

    /// In-memory database for tests and local development.
    pub async fn in_memory() -> Result<Self, AppError> {
        let db = Surreal::new::<Mem>(())
            .await
            .map_err(|e| AppError::database(format!("Failed to open in-memory database: {e}")))?;

        db.use_ns(NAMESPACE)
            .use_db(DATABASE)
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;

        Ok(Self { db })
    }
}
