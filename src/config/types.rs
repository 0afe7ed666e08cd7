use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::errors::AuthError;

const DEFAULT_REFRESH_INTERVAL_SECONDS: u64 = 60;

/// Credentials and paths for one token lifecycle.
///
/// Loaded from a JSON file at startup and replaced wholesale on reload.
/// Fields are not validated here; requiredness is checked lazily when an
/// acquisition is actually attempted.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub client_secret: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub scope: Vec<String>,
    #[serde(default)]
    pub token_url: String,
    pub access_token_path: PathBuf,
    pub refresh_interval_seconds: Option<u64>,
}

impl Config {
    /// Every field the password grant needs must be non-empty at the moment
    /// acquisition is attempted.
    pub fn check_acquisition_fields(&self) -> Result<(), AuthError> {
        for (name, value) in [
            ("client_id", &self.client_id),
            ("client_secret", &self.client_secret),
            ("username", &self.username),
            ("password", &self.password),
            ("token_url", &self.token_url),
        ] {
            if value.is_empty() {
                return Err(AuthError::MissingField(name));
            }
        }
        Ok(())
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(
            self.refresh_interval_seconds
                .unwrap_or(DEFAULT_REFRESH_INTERVAL_SECONDS),
        )
    }
}
