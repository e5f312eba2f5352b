//! Product repository
//!
//! The product document is always written whole (`UPDATE ... CONTENT`),
//! which is the per-document atomic replace the catalog service relies on;
//! there is no field-level patching at this layer.

use serde::Deserialize;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::{BaseRepository, RepoError, RepoResult, strip_table_prefix};
use crate::db::models::Product;

const PRODUCT_TABLE: &str = "product";

/// Sort order for product listings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProductSort {
    #[default]
    Newest,
    NameAsc,
    NameDesc,
    PriceAsc,
    PriceDesc,
}

impl ProductSort {
    /// Price ordering uses the first (base) material price of the product.
    fn order_clause(self) -> &'static str {
        match self {
            ProductSort::Newest => "created_at DESC",
            ProductSort::NameAsc => "name ASC",
            ProductSort::NameDesc => "name DESC",
            ProductSort::PriceAsc => "pricing.material_prices[0].price ASC",
            ProductSort::PriceDesc => "pricing.material_prices[0].price DESC",
        }
    }
}

/// Filters and pagination for product listings
#[derive(Debug, Clone, Default)]
pub struct ProductQuery {
    pub page: u32,
    pub limit: u32,
    pub categories: Vec<String>,
    /// Matched against the per-variant shape inside `colors`
    pub shapes: Vec<String>,
    pub search: Option<String>,
    pub sort: ProductSort,
}

/// One page of results plus totals
#[derive(Debug, Clone)]
pub struct ProductPage {
    pub products: Vec<Product>,
    pub total: u64,
    pub page: u32,
    pub total_pages: u32,
}

#[derive(Clone)]
pub struct ProductRepository {
    base: BaseRepository,
}

impl ProductRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Product>> {
        let pure_id = strip_table_prefix(PRODUCT_TABLE, id);
        let product: Option<Product> = self.base.db().select((PRODUCT_TABLE, pure_id)).await?;
        Ok(product)
    }

    /// Filtered, paginated listing.
    pub async fn find_page(&self, query: ProductQuery) -> RepoResult<ProductPage> {
        let limit = query.limit.clamp(1, 100) as i64;
        let page = query.page.max(1);
        let start = (page as i64 - 1) * limit;

        // Build the WHERE clause from whichever filters are present
        let mut conditions: Vec<&str> = Vec::new();
        if !query.categories.is_empty() {
            conditions.push("category CONTAINSANY $categories");
        }
        if !query.shapes.is_empty() {
            conditions.push("colors.shape ANYINSIDE $shapes");
        }
        if query.search.is_some() {
            conditions.push(
                "(string::contains(string::lowercase(name), $search) \
                 OR string::contains(string::lowercase(description), $search))",
            );
        }
        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", conditions.join(" AND "))
        };

        let select = format!(
            "SELECT * FROM product{} ORDER BY {} LIMIT $limit START $start",
            where_clause,
            query.sort.order_clause()
        );
        let count = format!("SELECT count() AS total FROM product{} GROUP ALL", where_clause);

        let mut request = self
            .base
            .db()
            .query(&select)
            .query(&count)
            .bind(("limit", limit))
            .bind(("start", start));
        if !query.categories.is_empty() {
            request = request.bind(("categories", query.categories.clone()));
        }
        if !query.shapes.is_empty() {
            request = request.bind(("shapes", query.shapes.clone()));
        }
        if let Some(search) = &query.search {
            request = request.bind(("search", search.to_lowercase()));
        }

        let mut result = request.await?;
        let products: Vec<Product> = result.take(0)?;

        #[derive(Deserialize)]
        struct CountRow {
            total: u64,
        }
        let counts: Vec<CountRow> = result.take(1)?;
        let total = counts.first().map(|c| c.total).unwrap_or(0);
        let total_pages = total.div_ceil(limit as u64) as u32;

        Ok(ProductPage {
            products,
            total,
            page,
            total_pages,
        })
    }

    pub async fn create(&self, mut product: Product) -> RepoResult<Product> {
        product.id = None;
        let created: Option<Product> = self
            .base
            .db()
            .create(PRODUCT_TABLE)
            .content(product)
            .await?;
        created.ok_or_else(|| RepoError::Database("Failed to create product".to_string()))
    }

    /// Atomic whole-document replace.
    pub async fn replace(&self, id: &str, mut product: Product) -> RepoResult<Product> {
        let pure_id = strip_table_prefix(PRODUCT_TABLE, id).to_string();
        // The record keeps its id; content must not carry one
        product.id = None;
        let updated: Option<Product> = self
            .base
            .db()
            .update((PRODUCT_TABLE, pure_id))
            .content(product)
            .await?;
        updated.ok_or_else(|| RepoError::NotFound(format!("Product {} not found", id)))
    }

    pub async fn delete(&self, id: &str) -> RepoResult<Product> {
        let pure_id = strip_table_prefix(PRODUCT_TABLE, id);
        let deleted: Option<Product> = self.base.db().delete((PRODUCT_TABLE, pure_id)).await?;
        deleted.ok_or_else(|| RepoError::NotFound(format!("Product {} not found", id)))
    }

    /// Existence probe used by cart/wishlist handlers.
    pub async fn exists(&self, id: &str) -> RepoResult<bool> {
        Ok(self.find_by_id(id).await?.is_some())
    }
}
