//! Trash, restore, and permanent delete handlers.

use axum::Json;
use axum::extract::{Path, State};
use uuid::Uuid;

use stowage_entity::{Contents, Entity};

use crate::dto::request::{EntityTypeRequest, RestoreManyRequest};
use crate::dto::response::{AffectedResponse, ApiResponse, MessageResponse};
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// POST /api/trash/{id}
pub async fn trash_entity(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<EntityTypeRequest>,
) -> Result<Json<ApiResponse<Entity>>, ApiError> {
    let entity = state.trash_service.trash(&auth, req.kind, id).await?;
    Ok(Json(ApiResponse::ok(entity)))
}

/// PUT /api/trash/restore/{id}
pub async fn restore_entity(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<EntityTypeRequest>,
) -> Result<Json<ApiResponse<Entity>>, ApiError> {
    let entity = state.trash_service.restore(&auth, req.kind, id).await?;
    Ok(Json(ApiResponse::ok(entity)))
}

/// PUT /api/trash/restore
pub async fn restore_many(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<RestoreManyRequest>,
) -> Result<Json<ApiResponse<AffectedResponse>>, ApiError> {
    let affected = state
        .trash_service
        .restore_many(&auth, req.files, req.folders)
        .await?;
    Ok(Json(ApiResponse::ok(AffectedResponse { affected })))
}

/// PUT /api/trash/restore-all
pub async fn restore_all(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<AffectedResponse>>, ApiError> {
    let affected = state.trash_service.restore_all(&auth).await?;
    Ok(Json(ApiResponse::ok(AffectedResponse { affected })))
}

/// DELETE /api/trash/{id}
pub async fn delete_entity(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<EntityTypeRequest>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state
        .trash_service
        .permanently_delete(&auth, req.kind, id)
        .await?;
    Ok(Json(ApiResponse::ok(MessageResponse {
        message: "Permanently deleted".to_string(),
    })))
}

/// GET /api/trash
pub async fn list_trash(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<Contents>>, ApiError> {
    let trashed = state.trash_service.list_trashed(&auth).await?;
    Ok(Json(ApiResponse::ok(trashed)))
}
