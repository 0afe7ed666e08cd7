use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::config::loader::load_config;
use crate::config::types::Config;
use crate::errors::ConfigError;

/// Process-wide config reference shared between the refresh loop and the
/// reload listener.
///
/// Readers take an `Arc<Config>` snapshot; `reload` swaps the snapshot only
/// after a full successful load, so no reader ever observes a
/// partially-updated config.
#[derive(Debug)]
pub struct ConfigStore {
    path: PathBuf,
    active: RwLock<Arc<Config>>,
}

impl ConfigStore {
    /// Load the config once and pin the path for later reloads.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref().to_path_buf();
        let config = load_config(&path)?;
        Ok(Self {
            path,
            active: RwLock::new(Arc::new(config)),
        })
    }

    /// Current config snapshot. An in-flight refresh cycle keeps using the
    /// snapshot it took even if a reload lands mid-cycle.
    pub async fn snapshot(&self) -> Arc<Config> {
        self.active.read().await.clone()
    }

    /// Re-load from the original path and atomically replace the active
    /// snapshot. On failure the previously active config is left untouched.
    pub async fn reload(&self) -> Result<(), ConfigError> {
        let fresh = load_config(&self.path)?;
        *self.active.write().await = Arc::new(fresh);
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
