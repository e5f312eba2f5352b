//! User repository

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::User;

const USER_TABLE: &str = "user";

#[derive(Clone)]
pub struct UserRepository {
    base: BaseRepository,
}

impl UserRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let users: Vec<User> = self
            .base
            .db()
            .query("SELECT * FROM user WHERE email = $email LIMIT 1")
            .bind(("email", email.to_lowercase()))
            .await?
            .take(0)?;
        Ok(users.into_iter().next())
    }

    pub async fn create(&self, mut user: User) -> RepoResult<User> {
        user.email = user.email.to_lowercase();
        if self.find_by_email(&user.email).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "User {} already exists",
                user.email
            )));
        }
        let created: Option<User> = self.base.db().create(USER_TABLE).content(user).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create user".to_string()))
    }

    /// Flip the verified flag after a successful OTP check.
    pub async fn mark_verified(&self, email: &str) -> RepoResult<User> {
        let users: Vec<User> = self
            .base
            .db()
            .query("UPDATE user SET is_verified = true WHERE email = $email")
            .bind(("email", email.to_lowercase()))
            .await?
            .take(0)?;
        users
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("User {} not found", email)))
    }
}
