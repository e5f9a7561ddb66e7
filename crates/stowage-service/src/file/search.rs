//! Name search over active folders and files.

use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use stowage_core::result::AppResult;
use stowage_database::EntityStore;
use stowage_entity::Contents;

use crate::context::RequestContext;

/// Case-insensitive substring search, newest first, capped per kind.
#[derive(Debug, Clone)]
pub struct SearchService {
    store: Arc<dyn EntityStore>,
    result_limit: u32,
}

impl SearchService {
    pub fn new(store: Arc<dyn EntityStore>, result_limit: u32) -> Self {
        Self {
            store,
            result_limit,
        }
    }

    /// Search by name, optionally within one parent folder. An empty query
    /// matches nothing; any other query is matched as given, whitespace
    /// included.
    pub async fn search(
        &self,
        ctx: &RequestContext,
        query: &str,
        parent_id: Option<Uuid>,
    ) -> AppResult<Contents> {
        if query.is_empty() {
            return Ok(Contents::empty());
        }

        let folders = self
            .store
            .search_folders(ctx.user_id, query, parent_id, self.result_limit)
            .await?;
        let files = self
            .store
            .search_files(ctx.user_id, query, parent_id, self.result_limit)
            .await?;

        debug!(
            user_id = %ctx.user_id,
            folders = folders.len(),
            files = files.len(),
            "Search completed"
        );
        Ok(Contents { folders, files })
    }
}
