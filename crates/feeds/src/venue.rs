use std::num::NonZeroU32;

use anyhow::{Context, Result};
use serde_json::json;

use crate::client::HttpClient;

/// Client for the venue's public info endpoint.
pub struct VenueClient {
    client: HttpClient,
    base_url: String,
}

impl VenueClient {
    #[must_use]
    pub fn new(base_url: String) -> Self {
        // Public info endpoint allows 1200 weight/min; stay well under it.
        let rps = NonZeroU32::new(10).unwrap_or(NonZeroU32::MIN);
        Self { client: HttpClient::new(rps), base_url }
    }

    /// Fetches the raw `metaAndAssetCtxs` payload: universe metadata plus
    /// per-asset contexts.
    ///
    /// # Errors
    /// Returns an error if the request or JSON decoding fails.
    pub async fn meta_and_asset_ctxs(&self) -> Result<serde_json::Value> {
        let url = format!("{}/info", self.base_url);
        self.client
            .post_json(&url, json!({"type": "metaAndAssetCtxs"}))
            .await
            .context("Failed to fetch venue universe")
    }
}
