//! Repository module
//!
//! CRUD access to the SurrealDB tables. Each repository wraps
//! [`BaseRepository`] and exposes typed operations; errors are mapped to
//! [`RepoError`] and never leak `surrealdb::Error` upwards.

pub mod address;
pub mod cart;
pub mod otp;
pub mod product;
pub mod taxonomy;
pub mod user;
pub mod wishlist;

pub use address::AddressRepository;
pub use cart::CartRepository;
pub use otp::OtpRepository;
pub use product::{ProductPage, ProductQuery, ProductRepository, ProductSort};
pub use taxonomy::TaxonomyRepository;
pub use user::UserRepository;
pub use wishlist::WishlistRepository;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Shared handle wrapper all repositories are built on
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}

// =============================================================================
// ID convention: the API accepts both "table:id" and bare "id" forms
// =============================================================================

/// Strip a `table:` prefix if the caller passed the fully qualified form.
pub fn strip_table_prefix<'a>(table: &str, id: &'a str) -> &'a str {
    id.strip_prefix(table)
        .and_then(|rest| rest.strip_prefix(':'))
        .unwrap_or(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_only_matching_prefix() {
        assert_eq!(strip_table_prefix("product", "product:abc"), "abc");
        assert_eq!(strip_table_prefix("product", "abc"), "abc");
        assert_eq!(strip_table_prefix("product", "category:abc"), "category:abc");
    }
}
