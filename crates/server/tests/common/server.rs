//! Server test utilities.

use std::sync::Arc;
use strata_core::config::{AppConfig, StorageConfig};
use strata_server::{AppState, create_router};
use strata_storage::{FilesystemBackend, ObjectStore, SessionManager};
use tempfile::TempDir;

/// A test server over a temporary filesystem backend.
/// Note: #[allow(dead_code)] because each test file compiles common/ separately.
#[allow(dead_code)]
pub struct TestServer {
    pub router: axum::Router,
    pub state: AppState,
    _temp_dir: TempDir,
}

#[allow(dead_code)]
impl TestServer {
    /// Create a new test server with temporary storage.
    pub async fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
        let storage_path = temp_dir.path().join("storage");

        let storage: Arc<dyn ObjectStore> = Arc::new(
            FilesystemBackend::new(&storage_path)
                .await
                .expect("Failed to create storage backend"),
        );

        let config = AppConfig {
            server: Default::default(),
            storage: StorageConfig::Filesystem { path: storage_path },
        };

        let state = AppState::new(config, storage, SessionManager::new());
        let router = create_router(state.clone());

        Self {
            router,
            state,
            _temp_dir: temp_dir,
        }
    }

    /// Get access to the underlying object store.
    pub fn storage(&self) -> Arc<dyn ObjectStore> {
        self.state.storage.clone()
    }
}
