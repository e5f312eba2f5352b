//! Taxonomy repository
//!
//! One generic repository serves all five taxonomy tables; the table name
//! and uniqueness key come from [`TaxonomyRecord`].

use std::marker::PhantomData;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::{BaseRepository, RepoError, RepoResult, strip_table_prefix};
use crate::db::models::TaxonomyRecord;

#[derive(Clone)]
pub struct TaxonomyRepository<T: TaxonomyRecord> {
    base: BaseRepository,
    _marker: PhantomData<T>,
}

impl<T: TaxonomyRecord> TaxonomyRepository<T> {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
            _marker: PhantomData,
        }
    }

    pub async fn find_all(&self) -> RepoResult<Vec<T>> {
        let query = format!("SELECT * FROM {} ORDER BY created_at DESC", T::TABLE);
        let records: Vec<T> = self.base.db().query(&query).await?.take(0)?;
        Ok(records)
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<T>> {
        let pure_id = strip_table_prefix(T::TABLE, id);
        let record: Option<T> = self.base.db().select((T::TABLE, pure_id)).await?;
        Ok(record)
    }

    /// Uniqueness probe on the record's natural key (name / code / height).
    pub async fn find_by_key(&self, key: &str) -> RepoResult<Option<T>> {
        let query = format!(
            "SELECT * FROM {} WHERE {} = $key LIMIT 1",
            T::TABLE,
            T::KEY_FIELD
        );
        let records: Vec<T> = self
            .base
            .db()
            .query(&query)
            .bind(("key", key.to_string()))
            .await?
            .take(0)?;
        Ok(records.into_iter().next())
    }

    pub async fn create(&self, record: T) -> RepoResult<T> {
        if self.find_by_key(record.unique_key()).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "{} '{}' already exists",
                T::RESOURCE,
                record.unique_key()
            )));
        }
        let created: Option<T> = self.base.db().create(T::TABLE).content(record).await?;
        created.ok_or_else(|| {
            RepoError::Database(format!("Failed to create {}", T::RESOURCE.to_lowercase()))
        })
    }

    pub async fn delete(&self, id: &str) -> RepoResult<T> {
        let pure_id = strip_table_prefix(T::TABLE, id);
        let deleted: Option<T> = self.base.db().delete((T::TABLE, pure_id)).await?;
        deleted.ok_or_else(|| RepoError::NotFound(format!("{} {} not found", T::RESOURCE, id)))
    }
}
