//! Storing uploaded content and creating the file record.

use std::sync::Arc;

use bytes::Bytes;
use tracing::{info, warn};
use uuid::Uuid;

use stowage_core::result::AppResult;
use stowage_core::traits::StorageProvider;
use stowage_database::EntityStore;
use stowage_entity::{CreateFile, File};
use stowage_storage::{blob_location, content_type};

use crate::context::RequestContext;
use crate::folder::require_parent;
use crate::naming::normalize_name;

/// An upload as received from the client.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    /// Original file name; becomes the display name.
    pub name: String,
    /// Target folder, `None` for the root.
    pub parent_id: Option<Uuid>,
    /// Client-declared content type, if any.
    pub content_type: Option<String>,
    pub data: Bytes,
}

/// Handles file uploads.
#[derive(Debug, Clone)]
pub struct UploadService {
    store: Arc<dyn EntityStore>,
    storage: Arc<dyn StorageProvider>,
}

impl UploadService {
    pub fn new(store: Arc<dyn EntityStore>, storage: Arc<dyn StorageProvider>) -> Self {
        Self { store, storage }
    }

    /// Write the bytes to content storage, then insert the record. If the
    /// insert fails the blob is removed again.
    pub async fn upload(&self, ctx: &RequestContext, req: UploadRequest) -> AppResult<File> {
        let name = normalize_name(&req.name, "File name")?;
        require_parent(self.store.as_ref(), ctx, req.parent_id).await?;

        let location = blob_location(ctx.user_id, Uuid::new_v4());
        let mime_type = req
            .content_type
            .filter(|ct| !ct.is_empty() && ct != "application/octet-stream")
            .unwrap_or_else(|| content_type(&name));
        let size_bytes = req.data.len() as i64;

        self.storage.write(&location, req.data).await?;

        let created = self
            .store
            .insert_file(&CreateFile {
                owner_id: ctx.user_id,
                parent_id: req.parent_id,
                name,
                location: location.clone(),
                mime_type: Some(mime_type),
                size_bytes,
            })
            .await;

        match created {
            Ok(file) => {
                info!(
                    user_id = %ctx.user_id,
                    file_id = %file.id,
                    parent_id = ?file.parent_id,
                    size = size_bytes,
                    "File uploaded"
                );
                Ok(file)
            }
            Err(e) => {
                if let Err(cleanup) = self.storage.delete(&location).await {
                    warn!(location = %location, error = %cleanup, "Failed to remove orphaned upload");
                }
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Harness;
    use stowage_core::error::ErrorKind;

    #[tokio::test]
    async fn test_upload_stores_bytes_and_record() {
        let h = Harness::new().await;
        let service = UploadService::new(h.store.clone(), h.storage.clone());
        let file = service
            .upload(
                &h.ctx,
                UploadRequest {
                    name: "q1.pdf".into(),
                    parent_id: None,
                    content_type: None,
                    data: Bytes::from_static(b"%PDF-1.7"),
                },
            )
            .await
            .unwrap();

        assert_eq!(file.size_bytes, 8);
        assert_eq!(file.mime_type.as_deref(), Some("application/pdf"));
        assert!(file.location.starts_with(&h.ctx.user_id.to_string()));
        assert_eq!(
            h.storage.read_bytes(&file.location).await.unwrap(),
            Bytes::from_static(b"%PDF-1.7")
        );
    }

    #[tokio::test]
    async fn test_upload_into_missing_folder_writes_nothing() {
        let h = Harness::new().await;
        let service = UploadService::new(h.store.clone(), h.storage.clone());
        let err = service
            .upload(
                &h.ctx,
                UploadRequest {
                    name: "a.txt".into(),
                    parent_id: Some(Uuid::new_v4()),
                    content_type: Some("text/plain".into()),
                    data: Bytes::from_static(b"a"),
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
        assert!(
            h.store
                .list_files(h.ctx.user_id, false, stowage_entity::ParentFilter::Any)
                .await
                .unwrap()
                .is_empty()
        );
    }
}
