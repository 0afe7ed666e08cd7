use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::config::store::ConfigStore;
use crate::errors::AuthError;
use crate::sources::oauth2::{AccessToken, TokenClient};

/// Renewal happens this long before the provider deadline, so a token is
/// never handed out within a hair of expiring.
const EXPIRY_SAFETY_MARGIN: Duration = Duration::from_secs(10);

/// Seam between the refresh loop and whatever produces token values.
pub trait TokenSource {
    /// Current token value, renewing transparently when needed.
    fn token(&self) -> impl Future<Output = Result<String, AuthError>> + Send;
}

#[derive(Debug)]
struct Held {
    value: String,
    deadline: Option<Instant>,
    refresh_token: Option<String>,
}

impl Held {
    fn from_token(token: AccessToken) -> Self {
        Self {
            // an absurdly large provider TTL overflows Instant arithmetic;
            // such a token is long-lived either way, so no deadline
            deadline: token
                .expires_in
                .and_then(|ttl| Instant::now().checked_add(ttl.saturating_sub(EXPIRY_SAFETY_MARGIN))),
            value: token.value,
            refresh_token: token.refresh_token,
        }
    }

    fn is_valid(&self) -> bool {
        match self.deadline {
            // provider reported no expiry; treat the token as long-lived
            None => true,
            Some(deadline) => Instant::now() < deadline,
        }
    }
}

/// Token source that returns the held token while the provider still honors
/// it and silently re-authenticates once it is provider-expired.
#[derive(Debug)]
pub struct RenewingTokenSource {
    store: Arc<ConfigStore>,
    client: TokenClient,
    held: Mutex<Held>,
}

impl RenewingTokenSource {
    /// Seed the source with a freshly acquired token.
    pub fn new(store: Arc<ConfigStore>, client: TokenClient, initial: AccessToken) -> Self {
        Self {
            store,
            client,
            held: Mutex::new(Held::from_token(initial)),
        }
    }

    async fn renew(&self, held: &mut Held) -> Result<(), AuthError> {
        let config = self.store.snapshot().await;
        let renewed = match &held.refresh_token {
            Some(refresh_token) => {
                info!("held token expired, running refresh grant");
                self.client.refresh(&config, refresh_token).await?
            }
            // provider issued no refresh token; a fresh password grant is
            // the only renewal path left
            None => {
                info!("held token expired, re-running password grant");
                self.client.acquire(&config).await?
            }
        };
        *held = Held::from_token(renewed);
        Ok(())
    }
}

impl TokenSource for RenewingTokenSource {
    async fn token(&self) -> Result<String, AuthError> {
        let mut held = self.held.lock().await;
        if !held.is_valid() {
            self.renew(&mut held).await?;
        } else {
            debug!("held token still valid");
        }
        Ok(held.value.clone())
    }
}
