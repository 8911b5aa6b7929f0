//! Outer join of per-source metric tables into one wide row per asset.

use std::collections::{BTreeMap, BTreeSet};

use crate::symbols::SymbolReconciler;
use crate::Coin;

/// One source extractor's output: canonical coin to named numeric metrics.
/// Sparse per coin; the merge pass fills the gaps.
pub type MetricTable = BTreeMap<Coin, BTreeMap<String, f64>>;

/// Full outer join of all source tables keyed by canonical coin.
///
/// Stable-coins are dropped entirely. After joining, every metric in
/// `schema` is present on every row, missing or non-finite values filled
/// with 0.0 so scoring never sees a gap. Later tables win when two sources
/// report the same metric name.
#[must_use]
pub fn merge(
    sources: &[MetricTable],
    reconciler: &SymbolReconciler,
    schema: &BTreeSet<String>,
) -> MetricTable {
    let mut merged = MetricTable::new();

    for table in sources {
        for (coin, metrics) in table {
            if reconciler.is_stable(coin) {
                continue;
            }
            let row = merged.entry(coin.clone()).or_default();
            for (name, value) in metrics {
                if value.is_finite() {
                    row.insert(name.clone(), *value);
                }
            }
        }
    }

    for row in merged.values_mut() {
        for name in schema {
            row.entry(name.clone()).or_insert(0.0);
        }
    }

    tracing::debug!(assets = merged.len(), sources = sources.len(), "merged metric tables");
    merged
}
