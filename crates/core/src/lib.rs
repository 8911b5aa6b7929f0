pub mod config;
pub mod config_loader;
pub mod correlation;
pub mod curve;
pub mod error;
pub mod merge;
pub mod recommend;
pub mod records;
pub mod score;
pub mod screen;
pub mod symbols;

/// Canonical uppercase ticker identifying one logical asset across sources.
pub type Coin = String;

pub use config::{AppConfig, FeedsConfig, MarketType, ReferenceExchange, ScoreCategory, ScreenConfig};
pub use config_loader::ConfigLoader;
pub use curve::{CurveKind, CurveSpec, ThresholdCurve};
pub use error::{ConfigError, CurveError};
pub use merge::MetricTable;
pub use recommend::{Recommendation, TierBounds};
pub use records::{sig_figs, AssetRecord};
pub use score::{CompositeScorer, ScoreBreakdown};
pub use screen::Screener;
pub use symbols::SymbolReconciler;
