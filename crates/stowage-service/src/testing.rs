//! Shared fixtures for service tests.

use std::sync::Arc;

use bytes::Bytes;
use stowage_core::traits::StorageProvider;
use stowage_database::{EntityStore, MemoryEntityStore};
use stowage_entity::File;
use stowage_storage::LocalStorageProvider;
use uuid::Uuid;

use crate::context::RequestContext;
use crate::file::{UploadRequest, UploadService};

pub(crate) struct Harness {
    pub store: Arc<dyn EntityStore>,
    pub storage: Arc<dyn StorageProvider>,
    pub ctx: RequestContext,
    _dir: tempfile::TempDir,
}

impl Harness {
    pub async fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorageProvider::new(dir.path().to_str().unwrap())
            .await
            .unwrap();
        Self {
            store: Arc::new(MemoryEntityStore::new()),
            storage: Arc::new(storage),
            ctx: RequestContext::new(Uuid::new_v4()),
            _dir: dir,
        }
    }

    /// A context for a different user.
    pub fn stranger(&self) -> RequestContext {
        RequestContext::new(Uuid::new_v4())
    }
}

/// Upload a small text file as the harness user.
pub(crate) async fn upload_fixture(h: &Harness, name: &str, parent_id: Option<Uuid>) -> File {
    UploadService::new(h.store.clone(), h.storage.clone())
        .upload(
            &h.ctx,
            UploadRequest {
                name: name.to_string(),
                parent_id,
                content_type: None,
                data: Bytes::from(format!("contents of {name}")),
            },
        )
        .await
        .unwrap()
}
