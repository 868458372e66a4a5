use ingest::{FileIdGenerator, LocalStore, UploadPolicy};

use crate::config::AppConfig;

/// Shared per-process state: configuration plus the read-only collaborators
/// every request handler needs. No mutable state lives here.
pub struct AppState {
    pub config: AppConfig,
    pub policy: UploadPolicy,
    pub ids: FileIdGenerator,
    pub store: LocalStore,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let policy = UploadPolicy {
            allowed_extensions: config.allowed_extensions.clone(),
            max_size_bytes: config.max_upload_size_bytes,
        };
        let store = LocalStore::new(config.files_root.clone(), config.io_buffer_size);
        Self {
            config,
            policy,
            ids: FileIdGenerator::default(),
            store,
        }
    }
}
