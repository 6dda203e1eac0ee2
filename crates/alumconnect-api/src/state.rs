//! Application state management

use alumconnect_core::AppConfig;
use std::sync::Arc;
use std::time::Instant;

use crate::auth::{MemoryUserStore, UserStore};
use crate::mail::{LogMailer, Mailer};

/// Application state shared across handlers
pub struct AppState {
    /// Application configuration
    pub config: AppConfig,
    /// Credential store
    pub store: Arc<dyn UserStore>,
    /// Outbound mail
    pub mailer: Arc<dyn Mailer>,
    /// Server start time
    pub start_time: Instant,
}

impl AppState {
    pub fn new(config: AppConfig, store: Arc<dyn UserStore>, mailer: Arc<dyn Mailer>) -> Self {
        Self {
            config,
            store,
            mailer,
            start_time: Instant::now(),
        }
    }

    /// In-memory state for tests and development.
    pub fn in_memory(config: AppConfig) -> Self {
        Self::new(config, Arc::new(MemoryUserStore::new()), Arc::new(LogMailer))
    }

    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::in_memory(AppConfig::default())
    }
}
