//! Venue universe metadata from the info endpoint.

use serde::{Deserialize, Serialize};

/// One perp asset as listed in the venue universe.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VenueAsset {
    pub name: String,
    pub max_leverage: u32,
    #[serde(default)]
    pub is_delisted: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VenueUniverse {
    pub universe: Vec<VenueAsset>,
}

/// Payload of the `metaAndAssetCtxs` info request: universe metadata
/// followed by per-asset market contexts. Only the universe half feeds the
/// screen; the contexts ride along untyped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetaAndAssetCtxs(pub VenueUniverse, pub serde_json::Value);
