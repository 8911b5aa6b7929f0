pub mod analytics;
pub mod client;
pub mod fetch;
pub mod marketcap;
pub mod venue;

pub use analytics::{AnalyticsClient, ANALYTICS_QUERIES};
pub use client::HttpClient;
pub use fetch::{FeedSnapshots, SnapshotFetcher};
pub use marketcap::MarketCapClient;
pub use venue::VenueClient;
