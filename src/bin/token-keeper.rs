use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use token_keeper::cache::token_file::TokenCache;
use token_keeper::config::store::ConfigStore;
use token_keeper::refresh::RefreshLoop;
use token_keeper::reload::{sighup_trigger, trigger_channel, ReloadListener};
use token_keeper::sources::oauth2::{register_body_auth_endpoint, TokenClient};
use token_keeper::sources::renewing::RenewingTokenSource;
use token_keeper::utils::logging;
use token_keeper::utils::logging::{LogFormat, LogLevel};
use tokio::sync::watch;
use tracing::info;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the JSON config file; re-read on every SIGHUP.
    config: String,
    #[arg(long, env = "LOG_LEVEL", value_enum)]
    log_level: Option<LogLevel>,
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value = "compact")]
    log_format: LogFormat,
}

#[tokio::main]
async fn main() -> Result<()> {
    // -------------------------------
    // 1. Parse args, init logging
    // -------------------------------

    let args = Args::parse();
    logging::init_logging(args.log_level, args.log_format);

    // -------------------------------
    // 2. Load config; bad config at startup is fatal
    // -------------------------------

    let store = Arc::new(ConfigStore::open(&args.config)?);
    let config = store.snapshot().await;

    // -------------------------------
    // 3. Acquire the first token and publish it
    // -------------------------------

    register_body_auth_endpoint(&config.token_url);

    let client = TokenClient::new()?;
    let token = client.acquire(&config).await?;

    let cache = TokenCache::new(&config.access_token_path);
    cache.write(&token.value).await?;
    info!("initial token published to {}", cache.path().display());

    // -------------------------------
    // 4. Wire SIGHUP to the reload listener
    // -------------------------------

    let (trigger_tx, trigger_rx) = trigger_channel();
    tokio::spawn(sighup_trigger(trigger_tx)?);
    tokio::spawn(ReloadListener::new(store.clone(), trigger_rx).run());

    // -------------------------------
    // 5. Run the refresh loop until externally terminated
    // -------------------------------

    let source = RenewingTokenSource::new(store.clone(), client, token);
    let (_shutdown_tx, shutdown_rx) = watch::channel(false);

    info!("token keeper running");
    RefreshLoop::new(store, source, shutdown_rx).run().await
}
