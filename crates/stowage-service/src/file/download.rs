//! Serving stored content, to the owner or through a share token.

use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use stowage_core::error::AppError;
use stowage_core::result::AppResult;
use stowage_core::traits::{ByteStream, StorageProvider};
use stowage_database::EntityStore;
use stowage_entity::{File, LifecycleState};

use crate::context::RequestContext;

/// A file record together with its content stream.
pub struct Download {
    pub file: File,
    pub stream: ByteStream,
}

impl std::fmt::Debug for Download {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Download").field("file", &self.file).finish()
    }
}

/// Streams file content.
#[derive(Debug, Clone)]
pub struct DownloadService {
    store: Arc<dyn EntityStore>,
    storage: Arc<dyn StorageProvider>,
}

impl DownloadService {
    pub fn new(store: Arc<dyn EntityStore>, storage: Arc<dyn StorageProvider>) -> Self {
        Self { store, storage }
    }

    /// Download an owned file. Trashed files stay downloadable by their owner.
    pub async fn download(&self, ctx: &RequestContext, file_id: Uuid) -> AppResult<Download> {
        let file = self
            .store
            .find_file(ctx.user_id, file_id)
            .await?
            .ok_or_else(|| AppError::not_found("File not found"))?;
        debug!(user_id = %ctx.user_id, file_id = %file.id, "Owner download");
        self.open(file).await
    }

    /// Download through a share token, without authentication. Trashed files
    /// do not resolve.
    pub async fn download_shared(&self, token: &str) -> AppResult<Download> {
        let file = self
            .store
            .find_file_by_share_token(token)
            .await?
            .filter(|f| f.state() == LifecycleState::Active)
            .ok_or_else(|| AppError::not_found("Invalid share link"))?;
        debug!(file_id = %file.id, "Shared download");
        self.open(file).await
    }

    async fn open(&self, file: File) -> AppResult<Download> {
        let stream = self.storage.read(&file.location).await?;
        Ok(Download { file, stream })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Harness, upload_fixture};
    use futures::StreamExt;
    use stowage_core::error::ErrorKind;
    use stowage_entity::{EntityKind, UnitOfWork};

    async fn collect(mut stream: ByteStream) -> Vec<u8> {
        let mut out = Vec::new();
        while let Some(chunk) = stream.next().await {
            out.extend_from_slice(&chunk.unwrap());
        }
        out
    }

    #[tokio::test]
    async fn test_owner_download() {
        let h = Harness::new().await;
        let service = DownloadService::new(h.store.clone(), h.storage.clone());
        let file = upload_fixture(&h, "notes.txt", None).await;

        let download = service.download(&h.ctx, file.id).await.unwrap();
        assert_eq!(download.file.name, "notes.txt");
        assert_eq!(collect(download.stream).await, b"contents of notes.txt");

        let err = service.download(&h.stranger(), file.id).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_shared_download_hides_trashed_files() {
        let h = Harness::new().await;
        let service = DownloadService::new(h.store.clone(), h.storage.clone());
        let file = upload_fixture(&h, "shared.txt", None).await;
        h.store
            .assign_share_token(h.ctx.user_id, file.id, "token-1")
            .await
            .unwrap();

        assert!(service.download_shared("token-1").await.is_ok());
        assert!(service.download_shared("token-2").await.is_err());

        h.store
            .apply(UnitOfWork::trash(h.ctx.user_id, EntityKind::File, file.id))
            .await
            .unwrap();
        let err = service.download_shared("token-1").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }
}
