use std::path::PathBuf;

use thiserror::Error;

/// Config file could not be read or parsed.
///
/// Fatal at startup; during a hot reload the previous config is retained
/// and the failure is only logged.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed config file '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Token acquisition or refresh failed. Always fatal: a credential the
/// daemon cannot renew defeats its purpose, so there is no internal retry.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("token request transport failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("token endpoint returned {status}: {body}")]
    Provider {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("malformed token response: {0}")]
    Malformed(#[source] serde_json::Error),
    #[error("token response carried an empty access_token")]
    EmptyToken,
    #[error("config field '{0}' is required for acquisition but is empty")]
    MissingField(&'static str),
}

/// Token cache file could not be read or written. Fatal in the main loop:
/// the cache file is the program's sole externally visible output.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cannot read token cache '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot write token cache '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
