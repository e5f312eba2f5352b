//! Address API handlers
//!
//! All routes are scoped to the calling user; cross-user access resolves to
//! not-found rather than forbidden so ids cannot be probed.

use axum::{
    Json,
    extract::{Path, State},
};
use validator::Validate;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Address, AddressCreate, AddressUpdate};
use crate::utils::{AppError, AppResponse, AppResult, ok, ok_with_message};

fn validation_messages(errors: validator::ValidationErrors) -> AppError {
    let messages = errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| {
            let detail = errs
                .first()
                .and_then(|e| e.message.as_ref())
                .map(|m| m.to_string())
                .unwrap_or_else(|| "invalid value".to_string());
            format!("{field}: {detail}")
        })
        .collect();
    AppError::ValidationErrors(messages)
}

/// GET /api/addresses
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<AppResponse<Vec<Address>>>> {
    let addresses = state.addresses.find_all(&user.id).await?;
    Ok(ok(addresses))
}

/// GET /api/addresses/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<Address>>> {
    let address = state.addresses.find_owned(&user.id, &id).await?;
    Ok(ok(address))
}

/// POST /api/addresses
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<AddressCreate>,
) -> AppResult<Json<AppResponse<Address>>> {
    payload.validate().map_err(validation_messages)?;
    let address = state.addresses.create(&user.id, payload).await?;
    Ok(ok_with_message(address, "Address created"))
}

/// PUT /api/addresses/:id
pub async fn update(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<AddressUpdate>,
) -> AppResult<Json<AppResponse<Address>>> {
    payload.validate().map_err(validation_messages)?;
    let address = state.addresses.update(&user.id, &id, payload).await?;
    Ok(ok_with_message(address, "Address updated"))
}

/// DELETE /api/addresses/:id
pub async fn delete(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<Address>>> {
    let address = state.addresses.delete(&user.id, &id).await?;
    Ok(ok_with_message(address, "Address deleted"))
}
