//! Organisation CRUD handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use uuid::Uuid;

use orgdir_core::organisation::{CreateOrganisation, Organisation, UpdateOrganisation};

use crate::{handlers::AppError, state::AppState};

/// List all organisations, sorted by name (GET /v1/organisations).
pub async fn list_organisations(
    State(state): State<AppState>,
) -> Result<Json<Vec<Organisation>>, AppError> {
    Ok(Json(state.organisations.get_organisations().await?))
}

/// Create an organisation (POST /v1/organisations).
pub async fn create_organisation(
    State(state): State<AppState>,
    Json(payload): Json<CreateOrganisation>,
) -> Result<impl IntoResponse, AppError> {
    let id = state.organisations.add_organisation(payload).await?;

    tracing::info!(organisation_id = %id, "Created organisation");

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "id": id,
            "message": "Organisation created",
        })),
    ))
}

/// Get a single organisation (GET /v1/organisations/{id}).
pub async fn get_organisation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Organisation>, AppError> {
    Ok(Json(state.organisations.get_organisation(id).await?))
}

/// Update an organisation (PUT /v1/organisations/{id}).
pub async fn update_organisation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateOrganisation>,
) -> Result<impl IntoResponse, AppError> {
    state.organisations.update_organisation(id, payload).await?;

    tracing::info!(organisation_id = %id, "Updated organisation");

    Ok(Json(json!({ "status": "ok" })))
}

/// Delete an organisation and all of its users (DELETE /v1/organisations/{id}).
pub async fn delete_organisation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    state.organisations.delete_organisation(id).await?;

    tracing::info!(organisation_id = %id, "Deleted organisation");

    Ok(Json(json!({ "status": "ok" })))
}
