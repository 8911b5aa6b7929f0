use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::curve::{CurveKind, CurveSpec};

/// Metric name of the venue's current leverage cap. Assets absent from the
/// venue universe get 0 here, which marks them as not listed.
pub const MAX_LEVERAGE_METRIC: &str = "Max Lev. on HL";

/// Canonical metric names shared between the extractors and the calibration
/// tables. Scoring looks metrics up by these exact strings.
pub mod metric {
    pub const MARKET_CAP: &str = "MC $m";
    pub const SPOT_VOLUME: &str = "Spot Volume $m";
    pub const SPOT_VOLUME_GEOMEAN: &str = "Spot Volume Geomean-3 $m";
    pub const SPOT_VOLATILITY: &str = "Spot Volatility (std)";
    pub const SPOT_INTRADAY_RANGE: &str = "Spot Intraday range (std)";
    pub const FUT_VOLUME: &str = "Fut Volume $m";
    pub const FUT_VOLUME_GEOMEAN: &str = "Fut Volume Geomean-3 $m";
    pub const FUT_VOLATILITY: &str = "Fut Volatility (std)";
    pub const FUT_INTRADAY_RANGE: &str = "Fut Intraday range (std)";
    pub const VOLUME_ON_HL: &str = "Volume on HL $m";
    pub const OI_ON_HL: &str = "OI on HL $m";
    pub const HLP_VOL_SHARE: &str = "HLP Vol Share %";
    pub const HLP_OI_SHARE: &str = "HLP OI Share %";
    pub const SLIPPAGE_3K: &str = "HL Slip. $3k";
    pub const SLIPPAGE_30K: &str = "HL Slip. $30k";
}

/// Which side of an exchange a candle window was sampled from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketType {
    Spot,
    Futures,
}

impl MarketType {
    /// Short label used in metric names ("Spot Volume $m", "Fut Volume $m").
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Spot => "Spot",
            Self::Futures => "Fut",
        }
    }
}

impl std::fmt::Display for MarketType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Spot => write!(f, "spot"),
            Self::Futures => write!(f, "futures"),
        }
    }
}

/// One metric inside a score category, with its calibration curve.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricCurve {
    pub metric: String,
    #[serde(flatten)]
    pub curve: CurveSpec,
}

/// Named group of metrics whose levels sum into one category score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreCategory {
    pub name: String,
    /// Venue-dependent categories are zeroed for assets that are not listed.
    #[serde(default)]
    pub venue_dependent: bool,
    pub metrics: Vec<MetricCurve>,
}

/// Per-exchange symbol override applied before the global alias table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExchangeAlias {
    pub symbol: String,
    pub exchange: String,
    pub canonical: String,
}

/// A reference exchange and the market sides it contributes candles for.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceExchange {
    pub name: String,
    pub markets: Vec<MarketType>,
}

/// Calibration tables for one screening run. Immutable once handed to a
/// [`crate::Screener`]; every table is explicit configuration rather than
/// process-wide state so instances stay deterministic and testable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreenConfig {
    /// Complete daily periods averaged per exchange window.
    pub days_to_consider: usize,
    /// Retained window in days; slightly larger than `days_to_consider` to
    /// tolerate gaps in upstream candle history.
    pub retained_window_days: usize,
    /// Assets excluded from all scoring and output.
    pub stable_coins: BTreeSet<String>,
    /// Synthetic-leverage markers stripped from raw symbols, matched longest
    /// first.
    pub leverage_markers: Vec<String>,
    /// Global symbol alias table.
    pub token_aliases: BTreeMap<String, String>,
    /// Per-exchange overrides that win over the global alias table.
    pub exchange_aliases: Vec<ExchangeAlias>,
    /// Manually curated assets granted a flat score boost.
    pub strict: BTreeSet<String>,
    pub strict_boost: f64,
    pub categories: Vec<ScoreCategory>,
    /// Categories whose combined score feeds the not-yet-listed boost.
    pub listing_boost_categories: Vec<String>,
    /// Total-score lower bound per leverage tier; falling below triggers a
    /// leverage cut or delisting.
    pub score_lower_bounds: BTreeMap<u32, f64>,
    /// Total-score upper bound per leverage tier; reaching it triggers a
    /// listing or a leverage raise.
    pub score_upper_bounds: BTreeMap<u32, f64>,
}

impl ScreenConfig {
    /// Every metric the merged table must carry, missing ones filled with 0.
    #[must_use]
    pub fn metric_schema(&self) -> BTreeSet<String> {
        let mut schema: BTreeSet<String> = self
            .categories
            .iter()
            .flat_map(|c| c.metrics.iter().map(|m| m.metric.clone()))
            .collect();
        schema.insert(MAX_LEVERAGE_METRIC.to_string());
        schema
    }
}

fn exp_curve(start: f64, end: f64, steps: u32) -> CurveSpec {
    CurveSpec { kind: CurveKind::Exp, start, end, steps }
}

fn linear_curve(start: f64, end: f64, steps: u32) -> CurveSpec {
    CurveSpec { kind: CurveKind::Linear, start, end, steps }
}

fn reverse_linear_curve(start: f64, end: f64, steps: u32) -> CurveSpec {
    CurveSpec { kind: CurveKind::ReverseLinear, start, end, steps }
}

fn curves(entries: &[(&str, CurveSpec)]) -> Vec<MetricCurve> {
    entries
        .iter()
        .map(|(name, curve)| MetricCurve { metric: (*name).to_string(), curve: *curve })
        .collect()
}

impl Default for ScreenConfig {
    fn default() -> Self {
        let token_aliases: BTreeMap<String, String> = [
            ("HPOS10I", "BITCOIN"),
            ("HPOS", "HPOS"),
            ("HPO", "HPOS"),
            ("BITCOIN", "HPOS"),
            ("NEIROCTO", "NEIRO"),
            ("1MCHEEMS", "CHEEMS"),
            ("1MBABYDOGE", "BABYDOGE"),
            ("JELLYJELLY", "JELLY"),
            ("UBTC", "BTC"),
            ("UETH", "ETH"),
            ("USOL", "SOL"),
            ("UFART", "FARTCOIN"),
            ("HPENGU", "PENGU"),
            ("UPUMP", "PUMP"),
            ("UUUSPX", "UUUSPX"),
            ("UBONK", "BONK"),
            ("UXPL", "XPL"),
            ("UWLD", "WLD"),
            ("LINK0", "LINK"),
            ("AVAX0", "AVAX"),
            ("AAVE0", "AAVE"),
            ("Neiro Ethereum", "NEIROETH"),
            ("HarryPotterObamaSonic10Inu (ERC-20)", "HPOS"),
            ("FRAX", "FXS"),
            ("Frax (prev. FXS)", "FXS"),
            ("XAUT0", "XAUT"),
            ("BabyDoge", "BABYDOGE"),
            ("TSTBSC", "TST"),
            ("BEAMX", "BEAM"),
            ("RONIN", "RON"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let exchange_aliases = ["bybit", "gate", "kucoin"]
            .into_iter()
            .map(|exchange| ExchangeAlias {
                symbol: "NEIRO".to_string(),
                exchange: exchange.to_string(),
                canonical: "NEIROETH".to_string(),
            })
            .collect();

        let categories = vec![
            ScoreCategory {
                name: "Market Cap Score".to_string(),
                venue_dependent: false,
                metrics: curves(&[(metric::MARKET_CAP, exp_curve(1.0, 5000.0, 15))]),
            },
            ScoreCategory {
                name: "Spot Volume Score".to_string(),
                venue_dependent: false,
                metrics: curves(&[
                    (metric::SPOT_VOLUME, exp_curve(0.01, 1000.0, 10)),
                    (metric::SPOT_VOLUME_GEOMEAN, exp_curve(0.01, 1000.0, 10)),
                ]),
            },
            ScoreCategory {
                name: "Futures Volume Score".to_string(),
                venue_dependent: false,
                metrics: curves(&[
                    (metric::FUT_VOLUME, exp_curve(0.01, 1000.0, 10)),
                    (metric::FUT_VOLUME_GEOMEAN, exp_curve(0.01, 1000.0, 10)),
                ]),
            },
            ScoreCategory {
                name: "Price Behavior Score".to_string(),
                venue_dependent: false,
                metrics: curves(&[
                    (metric::SPOT_VOLATILITY, reverse_linear_curve(0.13, 0.03, 5)),
                    (metric::SPOT_INTRADAY_RANGE, reverse_linear_curve(0.13, 0.03, 5)),
                ]),
            },
            ScoreCategory {
                name: "HL Activity Score".to_string(),
                venue_dependent: true,
                metrics: curves(&[
                    (metric::VOLUME_ON_HL, exp_curve(0.001, 1000.0, 10)),
                    (metric::OI_ON_HL, exp_curve(0.001, 1000.0, 5)),
                ]),
            },
            ScoreCategory {
                name: "HL Liquidity Score".to_string(),
                venue_dependent: true,
                metrics: curves(&[
                    (metric::HLP_VOL_SHARE, linear_curve(50.0, -0.5, 5)),
                    (metric::HLP_OI_SHARE, linear_curve(10.0, -0.5, 5)),
                    (metric::SLIPPAGE_3K, linear_curve(5.0, 0.0, 5)),
                    (metric::SLIPPAGE_30K, linear_curve(50.0, 0.0, 5)),
                ]),
            },
        ];

        Self {
            days_to_consider: 30,
            retained_window_days: 35,
            stable_coins: ["USDC", "USDT", "USDH", "USDE", "USD"]
                .into_iter()
                .map(String::from)
                .collect(),
            leverage_markers: ["10000000", "1000000", "1000", "k"]
                .into_iter()
                .map(String::from)
                .collect(),
            token_aliases,
            exchange_aliases,
            strict: [
                "PURR", "CATBAL", "HFUN", "PIP", "JEFF", "VAPOR", "SOLV", "FARM", "ATEHUN",
                "SCHIZO", "OMNIX", "POINTS", "RAGE",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            strict_boost: 5.0,
            categories,
            listing_boost_categories: vec![
                "Market Cap Score".to_string(),
                "Spot Volume Score".to_string(),
                "Futures Volume Score".to_string(),
            ],
            score_lower_bounds: [(0, 0.0), (3, 37.0), (5, 48.0), (10, 60.0)].into_iter().collect(),
            score_upper_bounds: [(0, 62.0), (3, 75.0), (5, 85.0), (10, 101.0)]
                .into_iter()
                .collect(),
        }
    }
}

/// Endpoints for the snapshot feeds the fetcher talks to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedsConfig {
    pub venue_api_url: String,
    pub analytics_url: String,
    pub marketcap_api_url: String,
    /// Listings page size requested from the market-cap feed.
    pub marketcap_limit: u32,
}

impl Default for FeedsConfig {
    fn default() -> Self {
        Self {
            venue_api_url: "https://api.hyperliquid.xyz".to_string(),
            analytics_url: "https://d2v1fiwobg9w6.cloudfront.net".to_string(),
            marketcap_api_url: "https://pro-api.coinmarketcap.com".to_string(),
            marketcap_limit: 5000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Directory holding downloaded feed payloads and candle caches.
    pub cache_dir: String,
    pub feeds: FeedsConfig,
    pub reference_exchanges: Vec<ReferenceExchange>,
    pub screen: ScreenConfig,
}

fn both_markets(name: &str) -> ReferenceExchange {
    ReferenceExchange {
        name: name.to_string(),
        markets: vec![MarketType::Spot, MarketType::Futures],
    }
}

fn one_market(name: &str, market: MarketType) -> ReferenceExchange {
    ReferenceExchange { name: name.to_string(), markets: vec![market] }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            cache_dir: "cache".to_string(),
            feeds: FeedsConfig::default(),
            reference_exchanges: vec![
                both_markets("binance"),
                both_markets("bybit"),
                both_markets("okx"),
                both_markets("gate"),
                both_markets("kucoin"),
                both_markets("mexc"),
                one_market("bitmex", MarketType::Futures),
                one_market("htx", MarketType::Futures),
                both_markets("cryptocom"),
                both_markets("coinbase"),
                one_market("kraken", MarketType::Spot),
                one_market("krakenfutures", MarketType::Futures),
                both_markets("hyperliquid"),
            ],
            screen: ScreenConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_schema_covers_all_category_metrics() {
        let config = ScreenConfig::default();
        let schema = config.metric_schema();
        assert!(schema.contains(MAX_LEVERAGE_METRIC));
        for category in &config.categories {
            for m in &category.metrics {
                assert!(schema.contains(&m.metric), "missing {}", m.metric);
            }
        }
    }

    #[test]
    fn venue_categories_are_flagged() {
        let config = ScreenConfig::default();
        let venue: Vec<&str> = config
            .categories
            .iter()
            .filter(|c| c.venue_dependent)
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(venue, vec!["HL Activity Score", "HL Liquidity Score"]);
    }

    #[test]
    fn tier_bound_tables_share_keys() {
        let config = ScreenConfig::default();
        let lower: Vec<u32> = config.score_lower_bounds.keys().copied().collect();
        let upper: Vec<u32> = config.score_upper_bounds.keys().copied().collect();
        assert_eq!(lower, upper);
        assert_eq!(lower, vec![0, 3, 5, 10]);
    }

    #[test]
    fn config_round_trips_through_json() {
        let config = ScreenConfig::default();
        let json = serde_json::to_string(&config).expect("serialize");
        let back: ScreenConfig = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back.categories.len(), config.categories.len());
        assert_eq!(back.strict, config.strict);
    }
}
