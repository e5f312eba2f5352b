//! In-memory asset store
//!
//! Backs tests and local development when no store credentials are
//! configured. Supports per-asset failure injection so cleanup paths can be
//! exercised.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use dashmap::{DashMap, DashSet};
use uuid::Uuid;

use super::{AssetError, AssetStore, StoredAsset};

#[derive(Default)]
pub struct MemoryAssetStore {
    assets: DashMap<String, Vec<u8>>,
    failing_deletes: DashSet<String>,
    failing_uploads: DashSet<String>,
    delete_calls: AtomicU64,
}

impl MemoryAssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an asset directly, bypassing upload.
    pub fn insert(&self, asset_id: &str) {
        self.assets.insert(asset_id.to_string(), Vec::new());
    }

    pub fn contains(&self, asset_id: &str) -> bool {
        self.assets.contains_key(asset_id)
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// Make future deletes of `asset_id` fail.
    pub fn fail_delete(&self, asset_id: &str) {
        self.failing_deletes.insert(asset_id.to_string());
    }

    /// Make future uploads of `filename` fail.
    pub fn fail_upload(&self, filename: &str) {
        self.failing_uploads.insert(filename.to_string());
    }

    pub fn delete_calls(&self) -> u64 {
        self.delete_calls.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl AssetStore for MemoryAssetStore {
    async fn upload(
        &self,
        filename: &str,
        bytes: Vec<u8>,
        folder: &str,
    ) -> Result<StoredAsset, AssetError> {
        if self.failing_uploads.contains(filename) {
            return Err(AssetError::Upload(format!("Injected failure: {filename}")));
        }
        let asset_id = format!("{}/{}", folder, Uuid::new_v4());
        let url = format!("memory://{}/{}", asset_id, filename);
        self.assets.insert(asset_id.clone(), bytes);
        Ok(StoredAsset { asset_id, url })
    }

    async fn delete(&self, asset_id: &str) -> Result<(), AssetError> {
        self.delete_calls.fetch_add(1, Ordering::Relaxed);
        if self.failing_deletes.contains(asset_id) {
            return Err(AssetError::Delete(format!("Injected failure: {asset_id}")));
        }
        self.assets.remove(asset_id);
        Ok(())
    }
}
