use std::sync::Arc;

use tokio::signal::unix::{signal, SignalKind};
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::config::store::ConfigStore;
use crate::sources::oauth2::register_body_auth_endpoint;

/// One pending trigger may buffer while a reload is in flight; anything
/// beyond that is dropped. Reload is low-frequency and idempotent to repeat.
const TRIGGER_BUFFER: usize = 1;

pub fn trigger_channel() -> (mpsc::Sender<()>, mpsc::Receiver<()>) {
    mpsc::channel(TRIGGER_BUFFER)
}

/// Install the SIGHUP handler and hand back the forwarding task for the
/// caller to spawn. A daemon that can never reload should not start at all,
/// so an installation failure is returned as a startup error.
pub fn sighup_trigger(
    tx: mpsc::Sender<()>,
) -> std::io::Result<impl std::future::Future<Output = ()>> {
    let mut hangup = signal(SignalKind::hangup())?;
    Ok(async move {
        while hangup.recv().await.is_some() {
            if tx.try_send(()).is_err() {
                debug!("reload already pending, trigger dropped");
            }
        }
    })
}

/// Waits for reload triggers and swaps the active config in place, without
/// ever halting the refresh loop. A malformed config file is logged and the
/// previously active config stays in effect.
pub struct ReloadListener {
    store: Arc<ConfigStore>,
    triggers: mpsc::Receiver<()>,
}

impl ReloadListener {
    pub fn new(store: Arc<ConfigStore>, triggers: mpsc::Receiver<()>) -> Self {
        Self { store, triggers }
    }

    pub async fn run(mut self) {
        while self.triggers.recv().await.is_some() {
            match self.store.reload().await {
                Ok(()) => {
                    // a reload may point at a new endpoint; it must be
                    // registered before any exchange against it
                    let config = self.store.snapshot().await;
                    register_body_auth_endpoint(&config.token_url);
                    info!("config reloaded from {}", self.store.path().display());
                }
                Err(err) => error!("config reload failed, keeping previous config: {err}"),
            }
        }
    }
}
