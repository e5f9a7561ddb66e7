//! Name search handler.

use axum::Json;
use axum::extract::{Query, State};

use stowage_entity::Contents;

use crate::dto::request::SearchQuery;
use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::{AuthUser, parse_uuid};
use crate::state::AppState;

/// GET /api/search?query=...&folder_id=...
pub async fn search(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<SearchQuery>,
) -> Result<Json<ApiResponse<Contents>>, ApiError> {
    let parent_id = params
        .folder_id
        .as_deref()
        .filter(|raw| !raw.trim().is_empty())
        .map(parse_uuid)
        .transpose()?;

    let results = state
        .search_service
        .search(&auth, &params.query, parent_id)
        .await?;

    Ok(Json(ApiResponse::ok(results)))
}
