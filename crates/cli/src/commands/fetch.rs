//! Fetch CLI command: snapshot the three HTTP feeds into the cache.
//!
//! Reference-exchange candle files are produced by a separate downloader
//! and only read here; this command covers the venue, analytics, and
//! market-cap snapshots.

use anyhow::Result;
use clap::Args;
use tracing::info;

use hl_screen_core::ConfigLoader;
use hl_screen_data::cache::{analytics_file, PayloadCache, MARKETCAP_FILE, VENUE_SNAPSHOT_FILE};
use hl_screen_feeds::{SnapshotFetcher, ANALYTICS_QUERIES};

/// Arguments for the fetch command.
#[derive(Args, Debug, Clone)]
pub struct FetchArgs {
    /// Config file path
    #[arg(short, long, default_value = "config/Config.toml")]
    pub config: String,

    /// Market-cap API key (CMC_API_KEY env var if not provided)
    #[arg(long, env = "CMC_API_KEY")]
    pub api_key: Option<String>,

    /// Re-download even when every snapshot is already cached
    #[arg(long)]
    pub force: bool,
}

/// Runs the fetch command.
///
/// # Errors
/// Returns an error if configuration loading, a required feed download, or
/// a cache write fails.
pub async fn run_fetch(args: FetchArgs) -> Result<()> {
    let config = ConfigLoader::load_from(&args.config)?;
    let cache = PayloadCache::new(&config.cache_dir);

    if !args.force && snapshots_cached(&cache, args.api_key.is_some()) {
        info!("All feed snapshots already cached; use --force to re-download");
        return Ok(());
    }

    let fetcher = SnapshotFetcher::new(&config.feeds, args.api_key);
    let snapshots = fetcher.fetch_all().await?;

    cache.store(VENUE_SNAPSHOT_FILE, &snapshots.venue)?;
    for (query, payload) in &snapshots.analytics {
        cache.store(&analytics_file(query), payload)?;
    }
    if let Some(listings) = &snapshots.marketcap {
        cache.store(MARKETCAP_FILE, listings)?;
    }

    info!(cache_dir = %config.cache_dir, "feed snapshots cached");
    Ok(())
}

fn snapshots_cached(cache: &PayloadCache, expect_marketcap: bool) -> bool {
    cache.has(VENUE_SNAPSHOT_FILE)
        && ANALYTICS_QUERIES.iter().all(|query| cache.has(&analytics_file(query)))
        && (!expect_marketcap || cache.has(MARKETCAP_FILE))
}
