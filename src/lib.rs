//! # Token Keeper Library
//!
//! Maintains a valid OAuth2 access token for a downstream API and publishes
//! it to a single-value cache file that cooperating processes read as a
//! bearer credential.
//!
//! Modules:
//! - `config` — credentials config, loading, hot-reloadable store
//! - `sources` — password/refresh grant client and the renewing token source
//! - `cache` — token cache file
//! - `refresh` — background refresh loop with change-detection writes
//! - `reload` — reload trigger plumbing and listener

pub mod cache;
pub mod config;
pub mod errors;
pub mod refresh;
pub mod reload;
pub mod sources;
pub mod tests;
pub mod utils;

pub use crate::config::types::Config;
pub use crate::sources::oauth2::AccessToken;
