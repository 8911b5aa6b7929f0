//! JSON payload cache shared by the fetcher and the screen run.
//!
//! Every feed snapshot lands in one file under the cache directory so a
//! screen run is reproducible offline and a re-fetch can skip work that is
//! already on disk. Reference-exchange candle files follow the downloader's
//! naming scheme and are read-only from this side.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;

use hl_screen_core::config::MarketType;

pub const VENUE_SNAPSHOT_FILE: &str = "venue_meta_and_ctxs.json";
pub const MARKETCAP_FILE: &str = "marketcap_listings.json";

/// Candle history for one exchange market side, interval-day.
#[must_use]
pub fn candle_file(exchange: &str, market_type: MarketType) -> String {
    format!("exch_candles_{exchange}_{market_type}_1d.json")
}

/// Optional per-symbol contract sizes for one exchange market side.
#[must_use]
pub fn contract_size_file(exchange: &str, market_type: MarketType) -> String {
    format!("exch_markets_{exchange}_{market_type}.json")
}

/// One analytics chart dataset.
#[must_use]
pub fn analytics_file(query: &str) -> String {
    format!("analytics_{query}.json")
}

pub struct PayloadCache {
    dir: PathBuf,
}

impl PayloadCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    #[must_use]
    pub fn has(&self, name: &str) -> bool {
        self.path(name).is_file()
    }

    /// Loads and deserializes one cached payload.
    ///
    /// # Errors
    /// Returns an error if the file is missing, unreadable, or not valid
    /// JSON for the requested type.
    pub fn load<T: DeserializeOwned>(&self, name: &str) -> Result<T> {
        let path = self.path(name);
        let raw = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read cached payload: {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse cached payload: {}", path.display()))
    }

    /// Serializes one payload into the cache, creating the directory on
    /// first use.
    ///
    /// # Errors
    /// Returns an error if the directory cannot be created or the file
    /// cannot be written.
    pub fn store<T: Serialize>(&self, name: &str, value: &T) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create cache dir: {}", self.dir.display()))?;
        let path = self.path(name);
        let raw = serde_json::to_string(value)?;
        fs::write(&path, raw)
            .with_context(|| format!("Failed to write cached payload: {}", path.display()))
    }
}

impl AsRef<Path> for PayloadCache {
    fn as_ref(&self) -> &Path {
        &self.dir
    }
}
