//! Address repository
//!
//! Addresses are user-scoped; every lookup re-checks ownership so a caller
//! can never touch another user's address by guessing ids.

use chrono::Utc;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::{BaseRepository, RepoError, RepoResult, strip_table_prefix};
use crate::db::models::{Address, AddressCreate, AddressUpdate};

const ADDRESS_TABLE: &str = "address";

#[derive(Clone)]
pub struct AddressRepository {
    base: BaseRepository,
}

impl AddressRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_all(&self, user: &str) -> RepoResult<Vec<Address>> {
        let addresses: Vec<Address> = self
            .base
            .db()
            .query("SELECT * FROM address WHERE user = $user ORDER BY created_at DESC")
            .bind(("user", user.to_string()))
            .await?
            .take(0)?;
        Ok(addresses)
    }

    pub async fn find_owned(&self, user: &str, id: &str) -> RepoResult<Address> {
        let pure_id = strip_table_prefix(ADDRESS_TABLE, id);
        let address: Option<Address> = self.base.db().select((ADDRESS_TABLE, pure_id)).await?;
        match address {
            Some(a) if a.user == user => Ok(a),
            _ => Err(RepoError::NotFound(format!("Address {} not found", id))),
        }
    }

    pub async fn create(&self, user: &str, payload: AddressCreate) -> RepoResult<Address> {
        let address = Address {
            id: None,
            user: user.to_string(),
            full_name: payload.full_name,
            phone_number: payload.phone_number,
            street_address: payload.street_address,
            city: payload.city,
            state: payload.state,
            postal_code: payload.postal_code,
            country: payload.country,
            created_at: Utc::now(),
        };
        let created: Option<Address> = self
            .base
            .db()
            .create(ADDRESS_TABLE)
            .content(address)
            .await?;
        created.ok_or_else(|| RepoError::Database("Failed to create address".to_string()))
    }

    pub async fn update(
        &self,
        user: &str,
        id: &str,
        payload: AddressUpdate,
    ) -> RepoResult<Address> {
        let mut address = self.find_owned(user, id).await?;
        if let Some(full_name) = payload.full_name {
            address.full_name = full_name;
        }
        if let Some(phone_number) = payload.phone_number {
            address.phone_number = phone_number;
        }
        if let Some(street_address) = payload.street_address {
            address.street_address = street_address;
        }
        if let Some(city) = payload.city {
            address.city = city;
        }
        if let Some(state) = payload.state {
            address.state = state;
        }
        if let Some(postal_code) = payload.postal_code {
            address.postal_code = postal_code;
        }
        if let Some(country) = payload.country {
            address.country = country;
        }

        let record_id = address
            .id
            .take()
            .ok_or_else(|| RepoError::Database("Address record has no id".to_string()))?;
        let updated: Option<Address> = self.base.db().update(record_id).content(address).await?;
        updated.ok_or_else(|| RepoError::NotFound(format!("Address {} not found", id)))
    }

    pub async fn delete(&self, user: &str, id: &str) -> RepoResult<Address> {
        // Ownership check first, then delete by key
        self.find_owned(user, id).await?;
        let pure_id = strip_table_prefix(ADDRESS_TABLE, id);
        let deleted: Option<Address> = self.base.db().delete((ADDRESS_TABLE, pure_id)).await?;
        deleted.ok_or_else(|| RepoError::NotFound(format!("Address {} not found", id)))
    }
}
