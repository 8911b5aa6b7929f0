use std::num::NonZeroU32;

use anyhow::{Context, Result};

use crate::client::HttpClient;

/// The chart datasets one screening run needs from the analytics feed.
pub const ANALYTICS_QUERIES: [&str; 5] = [
    "daily_usd_volume_by_coin",
    "total_volume",
    "asset_ctxs",
    "hlp_positions",
    "liquidity_by_coin",
];

/// Client for the public analytics chart feed.
pub struct AnalyticsClient {
    client: HttpClient,
    base_url: String,
}

impl AnalyticsClient {
    #[must_use]
    pub fn new(base_url: String) -> Self {
        let rps = NonZeroU32::new(4).unwrap_or(NonZeroU32::MIN);
        Self { client: HttpClient::new(rps), base_url }
    }

    /// Fetches one chart dataset by query name.
    ///
    /// # Errors
    /// Returns an error if the request or JSON decoding fails.
    pub async fn chart(&self, query: &str) -> Result<serde_json::Value> {
        let url = format!("{}/{query}", self.base_url);
        self.client
            .get_json(&url)
            .await
            .with_context(|| format!("Failed to fetch analytics dataset {query}"))
    }
}
