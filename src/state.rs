use std::sync::Arc;

use crate::config::AppConfig;
use crate::database::DatabaseManager;

/// Shared application state: the immutable configuration and the master
/// database pool, both created once in `main` and cloned into handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub db: DatabaseManager,
}

impl AppState {
    pub fn new(config: AppConfig, db: DatabaseManager) -> Self {
        Self {
            config: Arc::new(config),
            db,
        }
    }
}
