use std::collections::HashSet;
use std::sync::{Mutex, OnceLock};
use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::config::types::Config;
use crate::errors::AuthError;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(90);
const POOL_MAX_IDLE_PER_HOST: usize = 2;

/// Token endpoints whose providers reject HTTP Basic client authentication.
/// Registered endpoints receive client credentials in the form body instead.
static BODY_AUTH_ENDPOINTS: OnceLock<Mutex<HashSet<String>>> = OnceLock::new();

fn body_auth_endpoints() -> &'static Mutex<HashSet<String>> {
    BODY_AUTH_ENDPOINTS.get_or_init(|| Mutex::new(HashSet::new()))
}

/// Register a token endpoint as needing client credentials in the request
/// body. Must happen before any exchange against that endpoint; repeat
/// registration is a no-op.
pub fn register_body_auth_endpoint(token_url: &str) {
    body_auth_endpoints()
        .lock()
        .expect("body-auth endpoint registry poisoned")
        .insert(token_url.to_owned());
}

fn uses_body_auth(token_url: &str) -> bool {
    body_auth_endpoints()
        .lock()
        .expect("body-auth endpoint registry poisoned")
        .contains(token_url)
}

/// Opaque access token plus the renewal material the provider handed back.
/// Only `value` ever leaves the source layer; expiry and the refresh token
/// stay invisible to the cache.
#[derive(Debug, Clone)]
pub struct AccessToken {
    pub value: String,
    pub expires_in: Option<Duration>,
    pub refresh_token: Option<String>,
}

/// Standard OAuth2 JSON token response.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
    #[serde(default)]
    refresh_token: Option<String>,
}

/// HTTP client for the password and refresh-token grants.
#[derive(Debug, Clone)]
pub struct TokenClient {
    client: Client,
}

impl TokenClient {
    pub fn new() -> Result<Self, AuthError> {
        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .pool_idle_timeout(POOL_IDLE_TIMEOUT)
            .pool_max_idle_per_host(POOL_MAX_IDLE_PER_HOST)
            .build()?;
        Ok(Self { client })
    }

    /// One-time resource-owner-password-credentials exchange producing the
    /// first token.
    pub async fn acquire(&self, config: &Config) -> Result<AccessToken, AuthError> {
        config.check_acquisition_fields()?;

        let mut form = vec![
            ("grant_type", "password".to_owned()),
            ("username", config.username.clone()),
            ("password", config.password.clone()),
        ];
        if !config.scope.is_empty() {
            form.push(("scope", config.scope.join(" ")));
        }

        debug!("password grant against {}", config.token_url);
        self.exchange(config, form).await
    }

    /// Refresh-token grant, used by the renewing source once the held token
    /// is provider-expired.
    pub async fn refresh(
        &self,
        config: &Config,
        refresh_token: &str,
    ) -> Result<AccessToken, AuthError> {
        config.check_acquisition_fields()?;

        let form = vec![
            ("grant_type", "refresh_token".to_owned()),
            ("refresh_token", refresh_token.to_owned()),
        ];

        debug!("refresh grant against {}", config.token_url);
        self.exchange(config, form).await
    }

    async fn exchange(
        &self,
        config: &Config,
        mut form: Vec<(&'static str, String)>,
    ) -> Result<AccessToken, AuthError> {
        let mut request = self.client.post(&config.token_url);
        if uses_body_auth(&config.token_url) {
            form.push(("client_id", config.client_id.clone()));
            form.push(("client_secret", config.client_secret.clone()));
        } else {
            request = request.basic_auth(&config.client_id, Some(&config.client_secret));
        }

        let response = request.form(&form).send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(AuthError::Provider { status, body });
        }

        let parsed: TokenResponse = serde_json::from_str(&body).map_err(AuthError::Malformed)?;
        if parsed.access_token.is_empty() {
            return Err(AuthError::EmptyToken);
        }

        Ok(AccessToken {
            value: parsed.access_token,
            expires_in: parsed.expires_in.map(Duration::from_secs),
            refresh_token: parsed.refresh_token,
        })
    }
}
