pub mod cache;
pub mod extract;
pub mod models;

pub use cache::PayloadCache;
pub use models::analytics::{AnalyticsSnapshot, ChartPoint, ChartResponse, LiquidityResponse};
pub use models::candle::Candle;
pub use models::marketcap::{CapListing, CapResponse};
pub use models::venue::{MetaAndAssetCtxs, VenueAsset};
