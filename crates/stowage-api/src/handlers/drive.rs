//! Combined folder-and-file listing for one level of the drive.

use axum::Json;
use axum::extract::{Query, State};

use stowage_entity::{Contents, ParentFilter};

use crate::dto::request::ParentQuery;
use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::{AuthUser, parse_parent};
use crate::state::AppState;

/// GET /api/drive?parent=...
///
/// Without `parent` the root level is listed.
pub async fn list_drive(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ParentQuery>,
) -> Result<Json<ApiResponse<Contents>>, ApiError> {
    let parent = parse_parent(query.parent.as_deref(), ParentFilter::Root)?;
    let contents = state.folder_service.list_contents(&auth, parent).await?;
    Ok(Json(ApiResponse::ok(contents)))
}
