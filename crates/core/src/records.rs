//! The merged, scored, recommended row for one asset, and the display
//! rounding used when records leave the core.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::recommend::Recommendation;
use crate::Coin;

/// One fully processed asset. Built by the merge pass, scored, given a
/// recommendation, then read-only; nothing is persisted across runs.
#[derive(Debug, Clone, Serialize)]
pub struct AssetRecord {
    pub coin: Coin,
    /// Current leverage cap on the venue; 0 means not listed.
    pub max_leverage: u32,
    pub strict: bool,
    pub recommendation: Recommendation,
    pub score: f64,
    pub category_scores: BTreeMap<String, u32>,
    pub metric_levels: BTreeMap<String, u32>,
    pub listing_boost: u32,
    /// Raw merged metric values the scores were derived from.
    pub metrics: BTreeMap<String, f64>,
}

/// Sorts records by total score descending, coin ascending as tie-break so
/// output order is fully deterministic.
pub fn sort_records(records: &mut [AssetRecord]) {
    records.sort_by(|a, b| b.score.total_cmp(&a.score).then_with(|| a.coin.cmp(&b.coin)));
}

/// Rounds a value to `figs` significant figures for display. NaN and
/// non-positive values map to 0 so a gap never breaks report generation.
#[must_use]
pub fn sig_figs(value: f64, figs: u32) -> f64 {
    if !value.is_finite() || value <= 0.0 {
        return 0.0;
    }
    let digits = (f64::from(figs) - 1.0 - value.log10()).trunc() as i32;
    let factor = 10f64.powi(digits);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(coin: &str, score: f64) -> AssetRecord {
        AssetRecord {
            coin: coin.to_string(),
            max_leverage: 0,
            strict: false,
            recommendation: Recommendation::Hold,
            score,
            category_scores: BTreeMap::new(),
            metric_levels: BTreeMap::new(),
            listing_boost: 0,
            metrics: BTreeMap::new(),
        }
    }

    #[test]
    fn sorts_by_score_then_coin() {
        let mut records =
            vec![record("ETH", 50.0), record("BTC", 80.0), record("AAA", 50.0)];
        sort_records(&mut records);
        let order: Vec<&str> = records.iter().map(|r| r.coin.as_str()).collect();
        assert_eq!(order, vec!["BTC", "AAA", "ETH"]);
    }

    #[test]
    fn sig_figs_rounds_for_display() {
        assert_eq!(sig_figs(1234.0, 3), 1230.0);
        assert_eq!(sig_figs(567.8, 3), 568.0);
        assert_eq!(sig_figs(0.056_78, 3), 0.057);
        assert_eq!(sig_figs(12.34, 3), 12.0);
        assert_eq!(sig_figs(1.234, 3), 1.2);
    }

    #[test]
    fn sig_figs_maps_missing_values_to_zero() {
        assert_eq!(sig_figs(f64::NAN, 3), 0.0);
        assert_eq!(sig_figs(0.0, 3), 0.0);
        assert_eq!(sig_figs(-12.0, 3), 0.0);
        assert_eq!(sig_figs(f64::INFINITY, 3), 0.0);
    }

    #[test]
    fn recommendation_serializes_to_its_label() {
        let json = serde_json::to_string(&Recommendation::DecreaseLeverage).unwrap();
        assert_eq!(json, "\"Dec. Lev.\"");
        let json = serde_json::to_string(&Recommendation::Hold).unwrap();
        assert_eq!(json, "\"\"");
    }
}
