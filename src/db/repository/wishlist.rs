//! Wishlist repository

use chrono::Utc;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::Wishlist;

const WISHLIST_TABLE: &str = "wishlist";

#[derive(Clone)]
pub struct WishlistRepository {
    base: BaseRepository,
}

impl WishlistRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_or_create(&self, user: &str) -> RepoResult<Wishlist> {
        let existing: Vec<Wishlist> = self
            .base
            .db()
            .query("SELECT * FROM wishlist WHERE user = $user LIMIT 1")
            .bind(("user", user.to_string()))
            .await?
            .take(0)?;
        if let Some(wishlist) = existing.into_iter().next() {
            return Ok(wishlist);
        }
        let created: Option<Wishlist> = self
            .base
            .db()
            .create(WISHLIST_TABLE)
            .content(Wishlist::empty(user.to_string()))
            .await?;
        created.ok_or_else(|| RepoError::Database("Failed to create wishlist".to_string()))
    }

    /// Add a product; a second add of the same product is a duplicate error.
    pub async fn add_product(&self, user: &str, product_id: &str) -> RepoResult<Wishlist> {
        let mut wishlist = self.find_or_create(user).await?;
        if wishlist.products.iter().any(|p| p == product_id) {
            return Err(RepoError::Duplicate(
                "Product already in wishlist".to_string(),
            ));
        }
        wishlist.products.push(product_id.to_string());
        self.save(wishlist).await
    }

    pub async fn remove_product(&self, user: &str, product_id: &str) -> RepoResult<Wishlist> {
        let mut wishlist = self.find_or_create(user).await?;
        let before = wishlist.products.len();
        wishlist.products.retain(|p| p != product_id);
        if wishlist.products.len() == before {
            return Err(RepoError::NotFound(format!(
                "Product {} not in wishlist",
                product_id
            )));
        }
        self.save(wishlist).await
    }

    async fn save(&self, mut wishlist: Wishlist) -> RepoResult<Wishlist> {
        let id = wishlist
            .id
            .take()
            .ok_or_else(|| RepoError::Database("Wishlist record has no id".to_string()))?;
        wishlist.updated_at = Utc::now();
        let saved: Option<Wishlist> = self.base.db().update(id).content(wishlist).await?;
        saved.ok_or_else(|| RepoError::Database("Failed to save wishlist".to_string()))
    }
}
