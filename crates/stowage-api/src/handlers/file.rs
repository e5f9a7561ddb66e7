//! File list, rename, move, upload, and download handlers.

use axum::Json;
use axum::body::Body;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::Response;
use bytes::Bytes;
use uuid::Uuid;
use validator::Validate;

use stowage_core::error::AppError;
use stowage_entity::{File, ParentFilter};
use stowage_service::{Download, UploadRequest};

use crate::dto::request::{FolderQuery, MoveRequest, RenameRequest};
use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::{AuthUser, parse_parent};
use crate::state::AppState;

/// GET /api/files?folder_id=...
///
/// Without `folder_id` the root level is listed.
pub async fn list_files(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<FolderQuery>,
) -> Result<Json<ApiResponse<Vec<File>>>, ApiError> {
    let parent = parse_parent(query.folder_id.as_deref(), ParentFilter::Root)?;
    let files = state.file_service.list_files(&auth, parent).await?;
    Ok(Json(ApiResponse::ok(files)))
}

/// PUT /api/files/{id}
pub async fn rename_file(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<RenameRequest>,
) -> Result<Json<ApiResponse<File>>, ApiError> {
    req.validate()?;
    let file = state.file_service.rename_file(&auth, id, &req.name).await?;
    Ok(Json(ApiResponse::ok(file)))
}

/// PUT /api/files/{id}/move
pub async fn move_file(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<MoveRequest>,
) -> Result<Json<ApiResponse<File>>, ApiError> {
    let file = state.file_service.move_file(&auth, id, req.parent).await?;
    Ok(Json(ApiResponse::ok(file)))
}

/// POST /api/files/upload, multipart with a `file` part and optional `folder_id`.
pub async fn upload_file(
    State(state): State<AppState>,
    auth: AuthUser,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<File>>), ApiError> {
    let mut parent = ParentFilter::Root;
    let mut file_name: Option<String> = None;
    let mut content_type: Option<String> = None;
    let mut data: Option<Bytes> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation(format!("Multipart error: {e}")))?
    {
        let part = field.name().unwrap_or_default().to_string();
        match part.as_str() {
            "folder_id" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::validation(format!("Read error: {e}")))?;
                parent = parse_parent(Some(&text), ParentFilter::Root)?;
            }
            "file" => {
                file_name = field.file_name().map(String::from);
                content_type = field.content_type().map(String::from);
                data = Some(
                    field
                        .bytes()
                        .await
                        .map_err(|e| AppError::validation(format!("Read error: {e}")))?,
                );
            }
            _ => {}
        }
    }

    let data = data.ok_or_else(|| AppError::validation("No file uploaded"))?;
    let name = file_name.ok_or_else(|| AppError::validation("Uploaded file has no name"))?;
    let parent_id = match parent {
        ParentFilter::Folder(id) => Some(id),
        ParentFilter::Root | ParentFilter::Any => None,
    };

    let file = state
        .upload_service
        .upload(
            &auth,
            UploadRequest {
                name,
                parent_id,
                content_type,
                data,
            },
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(file)),
    ))
}

/// GET /api/files/{id}/download
pub async fn download_file(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let download = state.download_service.download(&auth, id).await?;
    stream_response(download)
}

/// Build a streaming attachment response for a download.
pub(crate) fn stream_response(download: Download) -> Result<Response, ApiError> {
    let Download { file, stream } = download;
    let mime = file
        .mime_type
        .clone()
        .unwrap_or_else(|| "application/octet-stream".to_string());

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, mime)
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", disposition_name(&file.name)),
        )
        .header(header::CONTENT_LENGTH, file.size_bytes.max(0).to_string())
        .body(Body::from_stream(stream))
        .map_err(|e| ApiError(AppError::internal(format!("Failed to build response: {e}"))))
}

/// Header-safe rendition of a file name for `Content-Disposition`.
fn disposition_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '"' | '\\' => '_',
            c if c.is_control() || !c.is_ascii() => '_',
            c => c,
        })
        .collect()
}
