//! Shared setup for the demo binaries
//!
//! Every demo reads `discord_game_sdk.toml` (or `$DISCORD_GAME_SDK_CONFIG`),
//! creating a default one on first run, then drives the core from a simple
//! fixed-rate loop.

use std::ops::ControlFlow;
use std::thread;
use std::time::Duration;

use dgs_core::config::default_path;
use dgs_core::{Discord, Result, SdkConfig};
use tracing_subscriber::EnvFilter;

/// Load the config and install the `tracing` subscriber.
///
/// `RUST_LOG` wins over the config's `tracing_filter`.
pub fn init() -> Result<SdkConfig> {
    let config = SdkConfig::load_or_default(default_path())?;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.tracing_filter));
    // Another subscriber may already be installed
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    if config.client_id == 0 {
        tracing::warn!("client_id is 0, set it in {:?}", default_path());
    }
    Ok(config)
}

/// Drain callbacks every `interval`, then run `tick` with the tick count,
/// until `tick` breaks or fails.
pub fn pump<F>(discords: &[&Discord], interval: Duration, mut tick: F) -> Result<()>
where
    F: FnMut(u64) -> Result<ControlFlow<()>>,
{
    for count in 0.. {
        thread::sleep(interval);
        for discord in discords {
            discord.run_callbacks()?;
        }
        if tick(count)?.is_break() {
            break;
        }
    }
    Ok(())
}

/// Log the outcome of a fire-and-forget request
pub fn report(operation: &'static str) -> impl FnOnce(Result<()>) + 'static {
    move |result| match result {
        Ok(()) => tracing::info!("{} succeeded", operation),
        Err(e) => tracing::warn!("{} failed: {}", operation, e),
    }
}
