//! Composite scoring: per-metric levels, category sums, and the conditional
//! adjustments that produce one total score per asset.

use std::collections::{BTreeMap, BTreeSet};

use crate::config::{ScreenConfig, MAX_LEVERAGE_METRIC};
use crate::curve::ThresholdCurve;
use crate::error::ConfigError;

struct BuiltMetric {
    name: String,
    curve: ThresholdCurve,
}

struct BuiltCategory {
    name: String,
    venue_dependent: bool,
    metrics: Vec<BuiltMetric>,
}

/// Scores one merged metric row. Pure: the same row always yields the same
/// breakdown, and independent assets can be scored concurrently.
pub struct CompositeScorer {
    categories: Vec<BuiltCategory>,
    listing_boost_categories: Vec<String>,
    strict: BTreeSet<String>,
    strict_boost: f64,
}

/// Per-asset scoring result.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreBreakdown {
    pub metric_levels: BTreeMap<String, u32>,
    pub category_scores: BTreeMap<String, u32>,
    /// Bonus for unlisted assets with strong off-venue fundamentals.
    pub listing_boost: u32,
    pub strict: bool,
    pub total: f64,
}

impl CompositeScorer {
    /// Builds every configured curve up front.
    ///
    /// # Errors
    /// Returns a [`ConfigError`] for a malformed curve or a listing-boost
    /// category that does not exist; nothing is scored from a broken table.
    pub fn new(config: &ScreenConfig) -> Result<Self, ConfigError> {
        let mut categories = Vec::with_capacity(config.categories.len());
        for category in &config.categories {
            let mut metrics = Vec::with_capacity(category.metrics.len());
            for entry in &category.metrics {
                let curve = entry.curve.build().map_err(|source| ConfigError::Curve {
                    category: category.name.clone(),
                    metric: entry.metric.clone(),
                    source,
                })?;
                metrics.push(BuiltMetric { name: entry.metric.clone(), curve });
            }
            categories.push(BuiltCategory {
                name: category.name.clone(),
                venue_dependent: category.venue_dependent,
                metrics,
            });
        }

        for name in &config.listing_boost_categories {
            if !categories.iter().any(|c| &c.name == name) {
                return Err(ConfigError::UnknownBoostCategory(name.clone()));
            }
        }

        Ok(Self {
            categories,
            listing_boost_categories: config.listing_boost_categories.clone(),
            strict: config.strict.clone(),
            strict_boost: config.strict_boost,
        })
    }

    /// Scores one asset row. `metrics` must already be gap-filled by the
    /// merge pass; an absent metric still scores as 0 rather than panicking.
    #[must_use]
    pub fn score(&self, coin: &str, metrics: &BTreeMap<String, f64>) -> ScoreBreakdown {
        let listed = leverage_of(metrics) > 0;

        let mut metric_levels = BTreeMap::new();
        let mut category_scores = BTreeMap::new();
        for category in &self.categories {
            let zeroed = category.venue_dependent && !listed;
            let mut category_score = 0;
            for metric in &category.metrics {
                let level = if zeroed {
                    0
                } else {
                    let value = metrics.get(&metric.name).copied().unwrap_or(0.0);
                    metric.curve.level(value)
                };
                metric_levels.insert(metric.name.clone(), level);
                category_score += level;
            }
            category_scores.insert(category.name.clone(), category_score);
        }

        let listing_boost = if listed {
            0
        } else {
            let off_venue: u32 = self
                .listing_boost_categories
                .iter()
                .filter_map(|name| category_scores.get(name))
                .sum();
            (0.5 * f64::from(off_venue)).floor() as u32
        };

        let strict = self.strict.contains(coin);
        let total = f64::from(category_scores.values().sum::<u32>())
            + f64::from(listing_boost)
            + if strict { self.strict_boost } else { 0.0 };

        ScoreBreakdown { metric_levels, category_scores, listing_boost, strict, total }
    }
}

/// Reads the leverage tier out of a merged row; absent means not listed.
#[must_use]
pub fn leverage_of(metrics: &BTreeMap<String, f64>) -> u32 {
    metrics.get(MAX_LEVERAGE_METRIC).copied().unwrap_or(0.0).max(0.0) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::metric;

    fn scorer() -> CompositeScorer {
        CompositeScorer::new(&ScreenConfig::default()).unwrap()
    }

    fn row(entries: &[(&str, f64)]) -> BTreeMap<String, f64> {
        entries.iter().map(|(k, v)| ((*k).to_string(), *v)).collect()
    }

    #[test]
    fn venue_categories_zero_for_unlisted_assets() {
        let s = scorer();
        let metrics = row(&[
            (MAX_LEVERAGE_METRIC, 0.0),
            (metric::VOLUME_ON_HL, 500.0),
            (metric::OI_ON_HL, 100.0),
            (metric::HLP_VOL_SHARE, 0.0001),
            (metric::SLIPPAGE_3K, 0.0),
        ]);
        let breakdown = s.score("FOO", &metrics);
        assert_eq!(breakdown.category_scores["HL Activity Score"], 0);
        assert_eq!(breakdown.category_scores["HL Liquidity Score"], 0);
        assert_eq!(breakdown.metric_levels[metric::VOLUME_ON_HL], 0);
    }

    #[test]
    fn venue_categories_count_for_listed_assets() {
        let s = scorer();
        let metrics = row(&[(MAX_LEVERAGE_METRIC, 3.0), (metric::VOLUME_ON_HL, 1000.0)]);
        let breakdown = s.score("FOO", &metrics);
        assert_eq!(breakdown.metric_levels[metric::VOLUME_ON_HL], 10);
        assert_eq!(breakdown.category_scores["HL Activity Score"], 10);
    }

    #[test]
    fn listing_boost_is_half_the_off_venue_score_floored() {
        let s = scorer();
        // MC 5000 -> 15; spot volume 1000 (+ geomean 0) -> 10; futures 0.
        let metrics = row(&[
            (MAX_LEVERAGE_METRIC, 0.0),
            (metric::MARKET_CAP, 5000.0),
            (metric::SPOT_VOLUME, 1000.0),
        ]);
        let breakdown = s.score("FOO", &metrics);
        assert_eq!(breakdown.category_scores["Market Cap Score"], 15);
        assert_eq!(breakdown.category_scores["Spot Volume Score"], 10);
        // Absent volatility metrics read as 0, the favorable end of the
        // reverse_linear curves.
        assert_eq!(breakdown.category_scores["Price Behavior Score"], 10);
        assert_eq!(breakdown.listing_boost, 12); // floor(0.5 * 25)
        assert_eq!(breakdown.total, 47.0);
    }

    #[test]
    fn listing_boost_is_zero_once_listed() {
        let s = scorer();
        let metrics = row(&[
            (MAX_LEVERAGE_METRIC, 5.0),
            (metric::MARKET_CAP, 5000.0),
            (metric::SPOT_VOLUME, 1000.0),
        ]);
        assert_eq!(s.score("FOO", &metrics).listing_boost, 0);
    }

    #[test]
    fn strict_coins_get_the_flat_boost() {
        let s = scorer();
        let metrics = row(&[(MAX_LEVERAGE_METRIC, 3.0)]);
        let plain = s.score("FOO", &metrics);
        let strict = s.score("PURR", &metrics);
        assert!(!plain.strict);
        assert!(strict.strict);
        assert_eq!(strict.total, plain.total + 5.0);
    }

    #[test]
    fn scoring_is_idempotent() {
        let s = scorer();
        let metrics = row(&[
            (MAX_LEVERAGE_METRIC, 5.0),
            (metric::MARKET_CAP, 123.0),
            (metric::SPOT_VOLUME, 7.5),
            (metric::VOLUME_ON_HL, 42.0),
            (metric::SPOT_VOLATILITY, 0.06),
        ]);
        let first = s.score("BTC", &metrics);
        let second = s.score("BTC", &metrics);
        assert_eq!(first, second);
    }

    #[test]
    fn unknown_boost_category_is_a_config_error() {
        let mut config = ScreenConfig::default();
        config.listing_boost_categories.push("No Such Score".to_string());
        assert!(matches!(
            CompositeScorer::new(&config),
            Err(ConfigError::UnknownBoostCategory(_))
        ));
    }

    #[test]
    fn broken_curve_is_a_config_error() {
        let mut config = ScreenConfig::default();
        config.categories[0].metrics[0].curve.steps = 0;
        assert!(matches!(CompositeScorer::new(&config), Err(ConfigError::Curve { .. })));
    }
}
