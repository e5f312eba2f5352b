//! Asset store
//!
//! Product images live in an external asset store; the database only keeps
//! references. [`AssetStore`] is the seam: the HTTP implementation talks to
//! the real service, the in-memory one backs tests and local development.

pub mod cleanup;
pub mod http;
pub mod memory;

pub use http::HttpAssetStore;
pub use memory::MemoryAssetStore;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("Asset upload failed: {0}")]
    Upload(String),

    #[error("Asset deletion failed: {0}")]
    Delete(String),

    #[error("Asset store unreachable: {0}")]
    Transport(String),
}

/// Result of a successful upload.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredAsset {
    /// Store-assigned public identifier, used for later deletion
    pub asset_id: String,
    /// Serving URL
    pub url: String,
}

/// Remote store for binary assets. Deletions are best effort: callers log
/// failures and move on, they never fail a catalog write over one.
#[async_trait]
pub trait AssetStore: Send + Sync {
    async fn upload(
        &self,
        filename: &str,
        bytes: Vec<u8>,
        folder: &str,
    ) -> Result<StoredAsset, AssetError>;

    async fn delete(&self, asset_id: &str) -> Result<(), AssetError>;
}
