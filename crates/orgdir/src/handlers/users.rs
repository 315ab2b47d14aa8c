//! User CRUD handlers, scoped to an organisation.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use uuid::Uuid;

use orgdir_core::user::{CreateUser, UpdateUser, User};

use crate::{handlers::AppError, state::AppState};

/// List the users of an organisation (GET /v1/organisations/{id}/users).
pub async fn list_users(
    State(state): State<AppState>,
    Path(organisation_id): Path<Uuid>,
) -> Result<Json<Vec<User>>, AppError> {
    Ok(Json(state.users.get_users(organisation_id).await?))
}

/// Create a user (POST /v1/organisations/{id}/users).
pub async fn create_user(
    State(state): State<AppState>,
    Path(organisation_id): Path<Uuid>,
    Json(payload): Json<CreateUser>,
) -> Result<impl IntoResponse, AppError> {
    let id = state.users.add_user(organisation_id, payload).await?;

    tracing::info!(%organisation_id, user_id = %id, "Created user");

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "id": id,
            "message": "User created",
        })),
    ))
}

/// Get a single user (GET /v1/organisations/{id}/users/{user_id}).
pub async fn get_user(
    State(state): State<AppState>,
    Path((organisation_id, user_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<User>, AppError> {
    Ok(Json(state.users.get_user(organisation_id, user_id).await?))
}

/// Update a user and return it (PUT /v1/organisations/{id}/users/{user_id}).
pub async fn update_user(
    State(state): State<AppState>,
    Path((organisation_id, user_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<UpdateUser>,
) -> Result<Json<User>, AppError> {
    let user = state
        .users
        .update_user(organisation_id, user_id, payload)
        .await?;

    tracing::info!(%organisation_id, %user_id, "Updated user");

    Ok(Json(user))
}

/// Delete a user (DELETE /v1/organisations/{id}/users/{user_id}).
pub async fn delete_user(
    State(state): State<AppState>,
    Path((organisation_id, user_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, AppError> {
    state.users.delete_user(organisation_id, user_id).await?;

    tracing::info!(%organisation_id, %user_id, "Deleted user");

    Ok(Json(json!({ "status": "ok" })))
}
