//! User registration, login, and profile handlers.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use validator::Validate;

use stowage_entity::User;
use stowage_service::RegisterUser;

use crate::dto::request::{LoginRequest, RegisterRequest};
use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// POST /api/users/register
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<User>>), ApiError> {
    req.validate()?;
    let user = state
        .user_service
        .register(RegisterUser {
            name: req.name,
            email: req.email,
            external_id: req.external_id,
        })
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(user)),
    ))
}

/// POST /api/users/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<ApiResponse<User>>, ApiError> {
    req.validate()?;
    let user = state.user_service.login(&req.external_id).await?;
    Ok(Json(ApiResponse::ok(user)))
}

/// GET /api/users/profile
pub async fn profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<User>>, ApiError> {
    let user = state.user_service.profile(auth.user_id).await?;
    Ok(Json(ApiResponse::ok(user)))
}
