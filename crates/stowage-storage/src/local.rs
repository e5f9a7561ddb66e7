//! Local filesystem storage provider.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::fs;
use tokio_util::io::ReaderStream;
use tracing::debug;

use stowage_core::error::{AppError, ErrorKind};
use stowage_core::result::AppResult;
use stowage_core::traits::{ByteStream, StorageProvider};

/// Stores blobs as plain files under a root directory.
#[derive(Debug, Clone)]
pub struct LocalStorageProvider {
    root: PathBuf,
}

impl LocalStorageProvider {
    /// Create the provider, creating `root_path` if needed.
    pub async fn new(root_path: &str) -> AppResult<Self> {
        let root = PathBuf::from(root_path);
        fs::create_dir_all(&root).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create storage root: {}", root.display()),
                e,
            )
        })?;
        Ok(Self { root })
    }

    /// Map a location to a path under the root. Locations that would escape
    /// the root are rejected.
    fn resolve(&self, location: &str) -> AppResult<PathBuf> {
        let relative = Path::new(location.trim_start_matches('/'));
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes || location.trim().is_empty() {
            return Err(AppError::storage(format!("Invalid storage location: {location}")));
        }
        Ok(self.root.join(relative))
    }

    async fn ensure_parent(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to create parent directory: {}", parent.display()),
                    e,
                )
            })?;
        }
        Ok(())
    }
}

fn open_error(location: &str, e: std::io::Error) -> AppError {
    if e.kind() == std::io::ErrorKind::NotFound {
        AppError::not_found(format!("Content not found: {location}"))
    } else {
        AppError::with_source(
            ErrorKind::Storage,
            format!("Failed to open content: {location}"),
            e,
        )
    }
}

#[async_trait]
impl StorageProvider for LocalStorageProvider {
    fn provider_type(&self) -> &str {
        "local"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(fs::metadata(&self.root)
            .await
            .map(|meta| meta.is_dir())
            .unwrap_or(false))
    }

    async fn read(&self, location: &str) -> AppResult<ByteStream> {
        let full_path = self.resolve(location)?;
        let file = fs::File::open(&full_path)
            .await
            .map_err(|e| open_error(location, e))?;
        debug!(location, "Streaming content");
        Ok(Box::pin(ReaderStream::new(file)))
    }

    async fn read_bytes(&self, location: &str) -> AppResult<Bytes> {
        let full_path = self.resolve(location)?;
        let data = fs::read(&full_path)
            .await
            .map_err(|e| open_error(location, e))?;
        Ok(Bytes::from(data))
    }

    async fn write(&self, location: &str, data: Bytes) -> AppResult<()> {
        let full_path = self.resolve(location)?;
        self.ensure_parent(&full_path).await?;

        fs::write(&full_path, &data).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to write content: {location}"),
                e,
            )
        })?;

        debug!(location, bytes = data.len(), "Wrote content");
        Ok(())
    }

    async fn delete(&self, location: &str) -> AppResult<()> {
        let full_path = self.resolve(location)?;
        match fs::remove_file(&full_path).await {
            Ok(()) => {
                debug!(location, "Deleted content");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to delete content: {location}"),
                e,
            )),
        }
    }

    async fn exists(&self, location: &str) -> AppResult<bool> {
        let full_path = self.resolve(location)?;
        Ok(fs::try_exists(&full_path).await.unwrap_or(false))
    }
}
