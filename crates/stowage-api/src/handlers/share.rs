//! Share link creation and anonymous download by token.

use axum::Json;
use axum::extract::{Path, State};
use axum::response::Response;
use uuid::Uuid;

use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::handlers::file::stream_response;
use crate::state::AppState;
use stowage_service::ShareLink;

/// POST /api/files/{id}/share
pub async fn create_share_link(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ShareLink>>, ApiError> {
    let link = state.share_service.share(&auth, id).await?;
    Ok(Json(ApiResponse::ok(link)))
}

/// GET /api/files/share/{token}, no authentication.
pub async fn download_shared(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Response, ApiError> {
    let download = state.download_service.download_shared(&token).await?;
    stream_response(download)
}
