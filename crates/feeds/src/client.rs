use anyhow::{Context, Result};
use governor::{clock::DefaultClock, state::InMemoryState, Quota, RateLimiter};
use reqwest::Client;
use std::num::NonZeroU32;
use std::sync::Arc;

/// Rate-limited HTTP client shared by the feed wrappers. Public data
/// endpoints throttle aggressively, so every request waits its turn.
pub struct HttpClient {
    http: Client,
    rate_limiter: Arc<RateLimiter<governor::state::direct::NotKeyed, InMemoryState, DefaultClock>>,
}

impl HttpClient {
    #[must_use]
    pub fn new(requests_per_second: NonZeroU32) -> Self {
        let quota = Quota::per_second(requests_per_second);
        Self {
            http: Client::new(),
            rate_limiter: Arc::new(RateLimiter::direct(quota)),
        }
    }

    /// GET a JSON payload.
    ///
    /// # Errors
    /// Returns an error on transport failure, a non-success status, or a
    /// body that is not valid JSON.
    pub async fn get_json(&self, url: &str) -> Result<serde_json::Value> {
        self.rate_limiter.until_ready().await;
        let response = self
            .http
            .get(url)
            .send()
            .await
            .with_context(|| format!("GET {url} failed"))?
            .error_for_status()
            .with_context(|| format!("GET {url} returned an error status"))?;
        response.json().await.with_context(|| format!("GET {url} returned invalid JSON"))
    }

    /// POST a JSON body and parse the JSON response.
    ///
    /// # Errors
    /// Returns an error on transport failure, a non-success status, or a
    /// body that is not valid JSON.
    pub async fn post_json(&self, url: &str, body: serde_json::Value) -> Result<serde_json::Value> {
        self.rate_limiter.until_ready().await;
        let response = self
            .http
            .post(url)
            .json(&body)
            .send()
            .await
            .with_context(|| format!("POST {url} failed"))?
            .error_for_status()
            .with_context(|| format!("POST {url} returned an error status"))?;
        response.json().await.with_context(|| format!("POST {url} returned invalid JSON"))
    }
}
