//! Pipeline orchestration: merge the per-source tables, score every asset,
//! attach recommendations, and sort the result.

use tracing::info;

use crate::config::ScreenConfig;
use crate::error::ConfigError;
use crate::merge;
use crate::merge::MetricTable;
use crate::recommend::TierBounds;
use crate::records::{sort_records, AssetRecord};
use crate::score::{leverage_of, CompositeScorer};
use crate::symbols::SymbolReconciler;

/// The whole scoring engine behind one immutable configuration. Construction
/// validates every calibration table; after that a run is a pure transform
/// of the input tables.
pub struct Screener {
    config: ScreenConfig,
    reconciler: SymbolReconciler,
    scorer: CompositeScorer,
    bounds: TierBounds,
}

impl Screener {
    /// # Errors
    /// Returns a [`ConfigError`] for any malformed calibration table; a run
    /// never starts with a broken configuration.
    pub fn new(config: ScreenConfig) -> Result<Self, ConfigError> {
        let reconciler = SymbolReconciler::new(&config);
        let scorer = CompositeScorer::new(&config)?;
        let bounds = TierBounds::new(
            config.score_lower_bounds.clone(),
            config.score_upper_bounds.clone(),
        )?;
        Ok(Self { config, reconciler, scorer, bounds })
    }

    #[must_use]
    pub fn config(&self) -> &ScreenConfig {
        &self.config
    }

    #[must_use]
    pub fn reconciler(&self) -> &SymbolReconciler {
        &self.reconciler
    }

    /// Merges the source tables and produces the sorted, recommended record
    /// set. Deterministic for a given input snapshot.
    #[must_use]
    pub fn run(&self, sources: &[MetricTable]) -> Vec<AssetRecord> {
        let merged = merge::merge(sources, &self.reconciler, &self.config.metric_schema());

        let mut records: Vec<AssetRecord> = merged
            .into_iter()
            .map(|(coin, metrics)| {
                let max_leverage = leverage_of(&metrics);
                let breakdown = self.scorer.score(&coin, &metrics);
                let recommendation = self.bounds.recommend(max_leverage, breakdown.total);
                AssetRecord {
                    coin,
                    max_leverage,
                    strict: breakdown.strict,
                    recommendation,
                    score: breakdown.total,
                    category_scores: breakdown.category_scores,
                    metric_levels: breakdown.metric_levels,
                    listing_boost: breakdown.listing_boost,
                    metrics,
                }
            })
            .collect();

        sort_records(&mut records);

        let actionable = records
            .iter()
            .filter(|r| r.recommendation != crate::Recommendation::Hold)
            .count();
        info!(assets = records.len(), actionable, "screening run complete");
        records
    }
}
