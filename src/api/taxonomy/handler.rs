//! Generic taxonomy handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::assets::cleanup;
use crate::auth::AdminUser;
use crate::core::ServerState;
use crate::db::models::TaxonomyRecord;
use crate::db::repository::TaxonomyRepository;
use crate::utils::{AppError, AppResponse, AppResult, ok, ok_with_message};

/// Binds a taxonomy record type to its repository in the server state.
pub trait TaxonomyState: TaxonomyRecord {
    fn repository(state: &ServerState) -> &TaxonomyRepository<Self>;
}

/// GET /
pub async fn list<T: TaxonomyState>(
    State(state): State<ServerState>,
) -> AppResult<Json<AppResponse<Vec<T>>>> {
    let records = T::repository(&state).find_all().await?;
    Ok(ok(records))
}

/// GET /:id
pub async fn get_by_id<T: TaxonomyState>(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<T>>> {
    let record = T::repository(&state)
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("{} {} not found", T::RESOURCE, id)))?;
    Ok(ok(record))
}

/// POST /
pub async fn create<T: TaxonomyState>(
    State(state): State<ServerState>,
    _admin: AdminUser,
    Json(payload): Json<T::Create>,
) -> AppResult<Json<AppResponse<T>>> {
    let record = T::from_create(payload).map_err(AppError::validation)?;
    let created = T::repository(&state).create(record).await?;
    Ok(ok_with_message(created, format!("{} created", T::RESOURCE)))
}

/// DELETE /:id
///
/// Deletes the record first, then best-effort deletes its presentation image
/// at the asset store.
pub async fn delete<T: TaxonomyState>(
    State(state): State<ServerState>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<T>>> {
    let deleted = T::repository(&state).delete(&id).await?;
    if let Some(image) = deleted.image() {
        cleanup::delete_all(state.assets.as_ref(), &[image.asset_id.clone()]).await;
    }
    Ok(ok_with_message(deleted, format!("{} deleted", T::RESOURCE)))
}
