use std::num::NonZeroU32;

use anyhow::{Context, Result};

use crate::client::HttpClient;

/// Client for the market-capitalization listings API.
pub struct MarketCapClient {
    client: HttpClient,
    base_url: String,
    api_key: String,
}

impl MarketCapClient {
    #[must_use]
    pub fn new(base_url: String, api_key: String) -> Self {
        let rps = NonZeroU32::new(2).unwrap_or(NonZeroU32::MIN);
        Self { client: HttpClient::new(rps), base_url, api_key }
    }

    /// Fetches the latest listings page with USD quotes.
    ///
    /// # Errors
    /// Returns an error if the request or JSON decoding fails.
    pub async fn listings(&self, limit: u32) -> Result<serde_json::Value> {
        let url = format!(
            "{}/v1/cryptocurrency/listings/latest?CMC_PRO_API_KEY={}&limit={limit}",
            self.base_url, self.api_key
        );
        self.client.get_json(&url).await.context("Failed to fetch market-cap listings")
    }
}
