//! Best-effort asset cleanup
//!
//! Deletions of orphaned assets must never fail a catalog write and must
//! never stop early: every id gets its own delete attempt, failures are
//! logged and counted.

use futures::future::join_all;

use super::AssetStore;

/// Delete every asset in `asset_ids`, attempting all of them regardless of
/// individual failures. Returns the number of successful deletions.
pub async fn delete_all(store: &dyn AssetStore, asset_ids: &[String]) -> usize {
    if asset_ids.is_empty() {
        return 0;
    }

    let results = join_all(asset_ids.iter().map(|id| store.delete(id))).await;

    let mut deleted = 0;
    for (id, result) in asset_ids.iter().zip(results) {
        match result {
            Ok(()) => deleted += 1,
            Err(err) => {
                tracing::warn!(asset_id = %id, error = %err, "Asset deletion failed");
            }
        }
    }
    deleted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::MemoryAssetStore;

    #[tokio::test]
    async fn deletes_everything() {
        let store = MemoryAssetStore::new();
        store.insert("a");
        store.insert("b");
        store.insert("c");

        let ids = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let deleted = delete_all(&store, &ids).await;

        assert_eq!(deleted, 3);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn failure_does_not_stop_remaining_deletes() {
        let store = MemoryAssetStore::new();
        store.insert("a");
        store.insert("b");
        store.insert("c");
        store.fail_delete("b");

        let ids = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let deleted = delete_all(&store, &ids).await;

        assert_eq!(deleted, 2);
        assert_eq!(store.delete_calls(), 3);
        assert!(store.contains("b"));
        assert!(!store.contains("a"));
        assert!(!store.contains("c"));
    }

    #[tokio::test]
    async fn empty_list_is_a_no_op() {
        let store = MemoryAssetStore::new();
        assert_eq!(delete_all(&store, &[]).await, 0);
        assert_eq!(store.delete_calls(), 0);
    }
}
