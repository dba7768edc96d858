pub mod memory;

use std::sync::Arc;
use std::time::Duration;

use shared_config::AppConfig;

pub use memory::{SchedulingStore, StoreError, StoreTransaction};

/// Shared application state injected into every router.
///
/// The store is constructed once here and handed to each service at
/// construction; nothing reaches for module-level state.
pub struct AppState {
    pub config: AppConfig,
    pub store: Arc<SchedulingStore>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let store = Arc::new(SchedulingStore::new(
            config.store_max_transactions,
            Duration::from_millis(config.store_acquire_timeout_ms),
        ));
        Self { config, store }
    }
}
