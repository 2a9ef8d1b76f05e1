//! Application state

use std::sync::Arc;
use std::time::Duration;

use crate::auth::{JwtService, NonceBroker};
use crate::core::Config;
use crate::db::Storage;
use crate::notify::Notifier;

/// Shared application state, cloned into every handler
#[derive(Clone)]
pub struct AppState {
    pub storage: Storage,
    pub jwt: Arc<JwtService>,
    pub nonces: Arc<NonceBroker>,
    pub notifier: Notifier,
    pub config: Arc<Config>,
}

impl AppState {
    /// Open the record store under the configured data directory and
    /// wire up all services
    pub fn initialize(config: &Config) -> anyhow::Result<Self> {
        std::fs::create_dir_all(&config.data_dir)?;
        let storage = Storage::open(config.data_dir.join("store.redb"))?;
        Ok(Self::with_storage(config.clone(), storage))
    }

    /// Build state around an existing store (used by tests)
    pub fn with_storage(config: Config, storage: Storage) -> Self {
        Self {
            storage,
            jwt: Arc::new(JwtService::new(&config.jwt)),
            nonces: Arc::new(NonceBroker::new(Duration::from_secs(config.nonce_ttl_secs))),
            notifier: Notifier::from_config(&config),
            config: Arc::new(config),
        }
    }

    /// Verification link sent to the administrator for a nonce
    pub fn verify_url(&self, nonce: &str) -> String {
        format!("{}/api/admin/verify?nonce={}", self.config.base_url, nonce)
    }
}
