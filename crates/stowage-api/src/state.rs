//! Shared application state passed to all handlers via Axum's `State`.

use std::sync::Arc;

use stowage_core::config::AppConfig;
use stowage_core::traits::identity::IdentityResolver;
use stowage_core::traits::storage::StorageProvider;
use stowage_database::EntityStore;
use stowage_service::{
    DownloadService, FileService, FolderService, SearchService, ShareService, TrashService,
    UploadService, UserService,
};

/// Application state shared across all request handlers.
///
/// All fields are `Arc`-wrapped and cheaply cloneable.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Entity store (PostgreSQL or in-memory).
    pub store: Arc<dyn EntityStore>,
    /// File content storage.
    pub storage: Arc<dyn StorageProvider>,
    /// Bearer credential verification.
    pub identity: Arc<dyn IdentityResolver>,

    pub folder_service: Arc<FolderService>,
    pub file_service: Arc<FileService>,
    pub upload_service: Arc<UploadService>,
    pub download_service: Arc<DownloadService>,
    pub search_service: Arc<SearchService>,
    pub trash_service: Arc<TrashService>,
    pub share_service: Arc<ShareService>,
    pub user_service: Arc<UserService>,
}

impl AppState {
    /// Wire every service on top of the given infrastructure.
    pub fn new(
        config: AppConfig,
        store: Arc<dyn EntityStore>,
        storage: Arc<dyn StorageProvider>,
        identity: Arc<dyn IdentityResolver>,
    ) -> Self {
        let folder_service = Arc::new(FolderService::new(Arc::clone(&store)));
        let file_service = Arc::new(FileService::new(Arc::clone(&store)));
        let upload_service = Arc::new(UploadService::new(
            Arc::clone(&store),
            Arc::clone(&storage),
        ));
        let download_service = Arc::new(DownloadService::new(
            Arc::clone(&store),
            Arc::clone(&storage),
        ));
        let search_service = Arc::new(SearchService::new(
            Arc::clone(&store),
            config.search.result_limit,
        ));
        let trash_service = Arc::new(TrashService::new(Arc::clone(&store), Arc::clone(&storage)));
        let share_service = Arc::new(ShareService::new(
            Arc::clone(&store),
            config.server.public_base_url.clone(),
        ));
        let user_service = Arc::new(UserService::new(Arc::clone(&store)));

        Self {
            config: Arc::new(config),
            store,
            storage,
            identity,
            folder_service,
            file_service,
            upload_service,
            download_service,
            search_service,
            trash_service,
            share_service,
            user_service,
        }
    }
}
