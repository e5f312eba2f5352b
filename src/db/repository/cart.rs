//! Cart repository
//!
//! One cart document per user, created lazily on first read.

use chrono::Utc;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use uuid::Uuid;

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Cart, CartItem, CartItemCreate};

const CART_TABLE: &str = "cart";

#[derive(Clone)]
pub struct CartRepository {
    base: BaseRepository,
}

impl CartRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Fetch the user's cart, creating an empty one if none exists yet.
    pub async fn find_or_create(&self, user: &str) -> RepoResult<Cart> {
        if let Some(cart) = self.find_by_user(user).await? {
            return Ok(cart);
        }
        let created: Option<Cart> = self
            .base
            .db()
            .create(CART_TABLE)
            .content(Cart::empty(user.to_string()))
            .await?;
        created.ok_or_else(|| RepoError::Database("Failed to create cart".to_string()))
    }

    async fn find_by_user(&self, user: &str) -> RepoResult<Option<Cart>> {
        let carts: Vec<Cart> = self
            .base
            .db()
            .query("SELECT * FROM cart WHERE user = $user LIMIT 1")
            .bind(("user", user.to_string()))
            .await?
            .take(0)?;
        Ok(carts.into_iter().next())
    }

    /// Append a new line; identical lines are kept separate.
    pub async fn add_item(&self, user: &str, item: CartItemCreate) -> RepoResult<Cart> {
        let mut cart = self.find_or_create(user).await?;
        cart.items.push(CartItem {
            item_id: Uuid::new_v4().to_string(),
            product_id: item.product_id,
            quantity: item.quantity.max(1),
            price: item.price,
            size: item.size,
            material: item.material,
            shape: item.shape,
            pile_height: item.pile_height,
            knot_density: item.knot_density,
            color_code: item.color_code,
        });
        self.save(cart).await
    }

    pub async fn update_quantity(
        &self,
        user: &str,
        item_id: &str,
        quantity: u32,
    ) -> RepoResult<Cart> {
        let mut cart = self.find_or_create(user).await?;
        let item = cart
            .items
            .iter_mut()
            .find(|i| i.item_id == item_id)
            .ok_or_else(|| RepoError::NotFound(format!("Cart item {} not found", item_id)))?;
        if quantity == 0 {
            cart.items.retain(|i| i.item_id != item_id);
        } else {
            item.quantity = quantity;
        }
        self.save(cart).await
    }

    pub async fn remove_item(&self, user: &str, item_id: &str) -> RepoResult<Cart> {
        let mut cart = self.find_or_create(user).await?;
        let before = cart.items.len();
        cart.items.retain(|i| i.item_id != item_id);
        if cart.items.len() == before {
            return Err(RepoError::NotFound(format!(
                "Cart item {} not found",
                item_id
            )));
        }
        self.save(cart).await
    }

    pub async fn clear(&self, user: &str) -> RepoResult<Cart> {
        let mut cart = self.find_or_create(user).await?;
        cart.items.clear();
        self.save(cart).await
    }

    async fn save(&self, mut cart: Cart) -> RepoResult<Cart> {
        let id = cart
            .id
            .take()
            .ok_or_else(|| RepoError::Database("Cart record has no id".to_string()))?;
        cart.updated_at = Utc::now();
        let saved: Option<Cart> = self.base.db().update(id).content(cart).await?;
        saved.ok_or_else(|| RepoError::Database("Failed to save cart".to_string()))
    }
}
