//! Application state shared across handlers.

use amen_core::config::AppConfig;
use amen_metadata::MetadataStore;
use amen_storage::ObjectStore;
use std::sync::Arc;
use std::time::Duration;

/// Timeout for upstream proxy fetches.
const PROXY_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Object storage backend.
    pub storage: Arc<dyn ObjectStore>,
    /// Metadata store.
    pub metadata: Arc<dyn MetadataStore>,
    /// Shared HTTP client for upstream proxy fetches.
    pub http: reqwest::Client,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Panics
    ///
    /// Panics if configuration validation fails or the shared HTTP client
    /// cannot be constructed. Both must hold before any handler runs; a
    /// bad environment is a startup failure, not a per-request 500.
    pub fn new(
        config: AppConfig,
        storage: Arc<dyn ObjectStore>,
        metadata: Arc<dyn MetadataStore>,
    ) -> Self {
        if let Err(error) = config.validate() {
            panic!("Invalid configuration: {}", error);
        }

        let http = reqwest::Client::builder()
            .timeout(PROXY_FETCH_TIMEOUT)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            config: Arc::new(config),
            storage,
            metadata,
            http,
        }
    }
}
