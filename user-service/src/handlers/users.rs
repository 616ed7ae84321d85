//! User CRUD handlers.
//!
//! Each handler parses and validates its input, performs its store work under
//! the configured time budget, and answers with the response envelope.

use crate::dtos::{CreatedUserResponse, UserRequest, UserResponse};
use crate::models::{User, UserFields};
use crate::services::{with_budget, StoreError};
use crate::startup::AppState;
use crate::utils::{UserId, ValidatedJson};
use axum::{extract::State, http::StatusCode};
use service_core::error::AppError;
use service_core::response::Envelope;

pub const USER_NOT_FOUND: &str = "User with specified ID not found!";
pub const USER_DELETED: &str = "User successfully deleted!";

#[tracing::instrument(skip(state, request))]
pub async fn create_user(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<UserRequest>,
) -> Result<Envelope<CreatedUserResponse>, AppError> {
    let user = User::new(UserFields::from(request));
    let created_at = user.created_at.clone();

    let inserted_id =
        with_budget("insert", state.store_timeout(), state.store.insert(user)).await?;

    tracing::info!(user_id = %inserted_id, created_at = %created_at, "User created");

    Ok(Envelope::success(
        StatusCode::CREATED,
        CreatedUserResponse { inserted_id },
    ))
}

#[tracing::instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    UserId(user_id): UserId,
) -> Result<Envelope<UserResponse>, AppError> {
    let user = with_budget("find_one", state.store_timeout(), async {
        state
            .store
            .find_by_id(&user_id)
            .await?
            .ok_or_else(|| StoreError::NoDocument(user_id.clone()))
    })
    .await?;

    Ok(Envelope::success(StatusCode::OK, UserResponse::from(user)))
}

/// Replace the business fields of a user and return the stored result.
///
/// An id that matches nothing is answered with 404, like delete.
#[tracing::instrument(skip(state, request))]
pub async fn edit_user(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    ValidatedJson(request): ValidatedJson<UserRequest>,
) -> Result<Envelope<UserResponse>, AppError> {
    let fields = UserFields::from(request);

    let updated = with_budget("update", state.store_timeout(), async {
        let matched = state.store.update_by_id(&user_id, &fields).await?;
        if matched == 0 {
            return Ok(None);
        }
        state.store.find_by_id(&user_id).await
    })
    .await?;

    let user = updated.ok_or_else(|| {
        tracing::info!(user_id = %user_id, "Edit matched no user");
        AppError::NotFound(anyhow::anyhow!(USER_NOT_FOUND))
    })?;

    tracing::info!(user_id = %user_id, "User updated");

    Ok(Envelope::success(StatusCode::OK, UserResponse::from(user)))
}

#[tracing::instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    UserId(user_id): UserId,
) -> Result<Envelope<&'static str>, AppError> {
    let deleted = with_budget(
        "delete",
        state.store_timeout(),
        state.store.delete_by_id(&user_id),
    )
    .await?;

    if deleted < 1 {
        return Err(AppError::NotFound(anyhow::anyhow!(USER_NOT_FOUND)));
    }

    tracing::info!(user_id = %user_id, "User deleted");

    Ok(Envelope::success(StatusCode::OK, USER_DELETED))
}

#[tracing::instrument(skip(state))]
pub async fn get_all_users(
    State(state): State<AppState>,
) -> Result<Envelope<Vec<UserResponse>>, AppError> {
    let users = with_budget("find_all", state.store_timeout(), state.store.find_all()).await?;

    tracing::debug!(count = users.len(), "Listed users");

    Ok(Envelope::success(
        StatusCode::OK,
        users.into_iter().map(UserResponse::from).collect(),
    ))
}
