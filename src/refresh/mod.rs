use std::sync::Arc;

use anyhow::Result;
use tokio::select;
use tokio::sync::watch;
use tokio::time::sleep;
use tracing::{debug, info};

use crate::cache::token_file::TokenCache;
use crate::config::store::ConfigStore;
use crate::sources::renewing::TokenSource;

/// Background task keeping the cache file in step with the token source.
///
/// Each cycle reads the cached value as the authoritative baseline, asks the
/// source for the current token, and writes only when the value changed.
/// Cache or source failures propagate out and end the process: a credential
/// the daemon cannot refresh defeats its purpose, so there is no retry.
pub struct RefreshLoop<S> {
    store: Arc<ConfigStore>,
    source: S,
    shutdown: watch::Receiver<bool>,
}

impl<S: TokenSource> RefreshLoop<S> {
    pub fn new(store: Arc<ConfigStore>, source: S, shutdown: watch::Receiver<bool>) -> Self {
        Self {
            store,
            source,
            shutdown,
        }
    }

    /// One check cycle. Returns whether the cache was rewritten.
    pub async fn run_once(&self) -> Result<bool> {
        let config = self.store.snapshot().await;
        let cache = TokenCache::new(&config.access_token_path);

        let baseline = cache.read().await?;
        let current = self.source.token().await?;

        if current == baseline {
            debug!("token unchanged, skipping write");
            return Ok(false);
        }

        cache.write(&current).await?;
        info!("token changed, cache rewritten");
        Ok(true)
    }

    /// Run cycles until shutdown is signalled. The sleep between cycles is
    /// interruptible and its length is re-read from the config snapshot, so
    /// a reload can retune the cadence without a restart.
    pub async fn run(mut self) -> Result<()> {
        loop {
            let interval = self.store.snapshot().await.refresh_interval();
            select! {
                _ = sleep(interval) => {}
                _ = self.shutdown.changed() => {
                    info!("refresh loop shutting down");
                    return Ok(());
                }
            }
            self.run_once().await?;
        }
    }
}
