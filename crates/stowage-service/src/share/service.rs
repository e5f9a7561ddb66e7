//! Lazily created share links.

use std::sync::Arc;

use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use stowage_core::error::AppError;
use stowage_core::result::AppResult;
use stowage_database::EntityStore;
use stowage_entity::LifecycleState;

use super::link::generate_token;
use crate::context::RequestContext;

/// A file's public link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShareLink {
    pub file_id: Uuid,
    pub token: String,
    pub url: String,
}

#[derive(Debug, Clone)]
pub struct ShareService {
    store: Arc<dyn EntityStore>,
    public_base_url: String,
}

impl ShareService {
    pub fn new(store: Arc<dyn EntityStore>, public_base_url: impl Into<String>) -> Self {
        Self {
            store,
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Return the file's share link, creating its token on first use.
    ///
    /// The token is assigned with a single conditional update, so concurrent
    /// calls agree on one token.
    pub async fn share(&self, ctx: &RequestContext, file_id: Uuid) -> AppResult<ShareLink> {
        let file = self
            .store
            .find_file(ctx.user_id, file_id)
            .await?
            .ok_or_else(|| AppError::not_found("File not found"))?;
        if file.state() == LifecycleState::Trashed {
            return Err(AppError::invalid_state("Trashed files cannot be shared"));
        }

        let token = match file.share_token {
            Some(token) => token,
            None => {
                let shared = self
                    .store
                    .assign_share_token(ctx.user_id, file_id, &generate_token())
                    .await?
                    .ok_or_else(|| AppError::not_found("File not found"))?;
                info!(user_id = %ctx.user_id, file_id = %file_id, "Share link created");
                shared
                    .share_token
                    .ok_or_else(|| AppError::internal("Share token was not stored"))?
            }
        };

        Ok(ShareLink {
            file_id,
            url: format!("{}/api/files/share/{token}", self.public_base_url),
            token,
        })
    }
}
