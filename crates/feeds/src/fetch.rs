//! Concurrent snapshot fetch across the three HTTP feeds.

use std::collections::BTreeMap;
use std::time::Duration;

use anyhow::{Context, Result};
use hl_screen_core::config::FeedsConfig;
use tokio::time::timeout;
use tracing::{info, warn};

use crate::analytics::{AnalyticsClient, ANALYTICS_QUERIES};
use crate::marketcap::MarketCapClient;
use crate::venue::VenueClient;

const CALL_TIMEOUT: Duration = Duration::from_secs(30);

/// Raw payloads of one fetch pass, ready for the cache.
pub struct FeedSnapshots {
    pub venue: serde_json::Value,
    pub analytics: BTreeMap<String, serde_json::Value>,
    /// Absent when no market-cap API key was provided.
    pub marketcap: Option<serde_json::Value>,
}

/// Fetches all feed snapshots with bounded concurrency and a per-call
/// timeout. The screener core never fetches; this is the only network side.
pub struct SnapshotFetcher {
    venue: VenueClient,
    analytics: AnalyticsClient,
    marketcap: Option<MarketCapClient>,
    marketcap_limit: u32,
}

impl SnapshotFetcher {
    #[must_use]
    pub fn new(config: &FeedsConfig, marketcap_api_key: Option<String>) -> Self {
        let marketcap = marketcap_api_key
            .map(|key| MarketCapClient::new(config.marketcap_api_url.clone(), key));
        Self {
            venue: VenueClient::new(config.venue_api_url.clone()),
            analytics: AnalyticsClient::new(config.analytics_url.clone()),
            marketcap,
            marketcap_limit: config.marketcap_limit,
        }
    }

    /// Runs the three feed downloads concurrently and returns the raw
    /// payloads.
    ///
    /// # Errors
    /// Returns an error if any required feed fails or times out. A missing
    /// market-cap key only logs a warning; that feed is optional.
    pub async fn fetch_all(&self) -> Result<FeedSnapshots> {
        let venue = async {
            timeout(CALL_TIMEOUT, self.venue.meta_and_asset_ctxs())
                .await
                .context("Venue universe fetch timed out")?
        };

        let analytics = async {
            let mut datasets = BTreeMap::new();
            for query in ANALYTICS_QUERIES {
                let payload = timeout(CALL_TIMEOUT, self.analytics.chart(query))
                    .await
                    .with_context(|| format!("Analytics dataset {query} timed out"))??;
                datasets.insert(query.to_string(), payload);
            }
            Ok::<_, anyhow::Error>(datasets)
        };

        let marketcap = async {
            match &self.marketcap {
                Some(client) => {
                    let payload = timeout(CALL_TIMEOUT, client.listings(self.marketcap_limit))
                        .await
                        .context("Market-cap listings fetch timed out")??;
                    Ok::<_, anyhow::Error>(Some(payload))
                }
                None => {
                    warn!("No market-cap API key; skipping the listings feed");
                    Ok(None)
                }
            }
        };

        let (venue, analytics, marketcap) = tokio::try_join!(venue, analytics, marketcap)?;
        info!(
            analytics_datasets = analytics.len(),
            has_marketcap = marketcap.is_some(),
            "fetched feed snapshots"
        );
        Ok(FeedSnapshots { venue, analytics, marketcap })
    }
}
