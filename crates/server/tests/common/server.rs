//! Server test utilities.

use crate::common::storage::MemoryBackend;
use amen_core::config::AppConfig;
use amen_metadata::{MetadataStore, SqliteStore};
use amen_server::{AppState, create_router};
use amen_storage::ObjectStore;
use std::sync::Arc;
use tempfile::TempDir;

/// A test server wrapper with all dependencies.
/// Note: #[allow(dead_code)] because each test file compiles common/ separately.
#[allow(dead_code)]
pub struct TestServer {
    pub router: axum::Router,
    pub state: AppState,
    pub storage: Arc<MemoryBackend>,
    _temp_dir: TempDir,
}

#[allow(dead_code)]
impl TestServer {
    /// Create a new test server with in-memory storage and SQLite metadata.
    pub async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    /// Create a test server with custom config modifications.
    pub async fn with_config<F>(modifier: F) -> Self
    where
        F: FnOnce(&mut AppConfig),
    {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");

        let storage = Arc::new(MemoryBackend::new());

        let db_path = temp_dir.path().join("metadata.db");
        let metadata: Arc<dyn MetadataStore> = Arc::new(
            SqliteStore::new(&db_path)
                .await
                .expect("Failed to create metadata store"),
        );

        let mut config = AppConfig::for_testing();
        modifier(&mut config);

        let state = AppState::new(
            config,
            storage.clone() as Arc<dyn ObjectStore>,
            metadata,
        );
        let router = create_router(state.clone());

        Self {
            router,
            state,
            storage,
            _temp_dir: temp_dir,
        }
    }

    /// Get access to the underlying metadata store.
    pub fn metadata(&self) -> Arc<dyn MetadataStore> {
        self.state.metadata.clone()
    }
}
