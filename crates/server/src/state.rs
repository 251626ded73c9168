//! Application state shared across handlers.

use std::sync::Arc;
use strata_core::config::AppConfig;
use strata_storage::{ObjectStore, SessionManager};

/// Shared application state.
///
/// Deliberately small: all durable state lives in the object store, so
/// handlers re-derive everything per request and the process restarts
/// losslessly.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Object storage backend.
    pub storage: Arc<dyn ObjectStore>,
    /// Upload session protocol.
    pub sessions: Arc<SessionManager>,
}

impl AppState {
    /// Create a new application state.
    pub fn new(config: AppConfig, storage: Arc<dyn ObjectStore>, sessions: SessionManager) -> Self {
        Self {
            config: Arc::new(config),
            storage,
            sessions: Arc::new(sessions),
        }
    }
}
