//! Folder create, list, rename, and move handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use uuid::Uuid;
use validator::Validate;

use stowage_entity::{Folder, ParentFilter};

use crate::dto::request::{CreateFolderRequest, MoveRequest, ParentQuery, RenameRequest};
use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::{AuthUser, parse_parent};
use crate::state::AppState;

/// POST /api/folders
pub async fn create_folder(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateFolderRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Folder>>), ApiError> {
    req.validate()?;
    let folder = state
        .folder_service
        .create_folder(&auth, &req.name, req.parent)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(folder)),
    ))
}

/// GET /api/folders?parent=...
///
/// Without `parent` every active folder is listed.
pub async fn list_folders(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ParentQuery>,
) -> Result<Json<ApiResponse<Vec<Folder>>>, ApiError> {
    let parent = parse_parent(query.parent.as_deref(), ParentFilter::Any)?;
    let folders = state.folder_service.list_folders(&auth, parent).await?;
    Ok(Json(ApiResponse::ok(folders)))
}

/// PUT /api/folders/{id}
pub async fn rename_folder(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<RenameRequest>,
) -> Result<Json<ApiResponse<Folder>>, ApiError> {
    req.validate()?;
    let folder = state.folder_service.rename_folder(&auth, id, &req.name).await?;
    Ok(Json(ApiResponse::ok(folder)))
}

/// PUT /api/folders/{id}/move
pub async fn move_folder(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<MoveRequest>,
) -> Result<Json<ApiResponse<Folder>>, ApiError> {
    let folder = state.folder_service.move_folder(&auth, id, req.parent).await?;
    Ok(Json(ApiResponse::ok(folder)))
}
