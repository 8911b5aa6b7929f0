//! Venue universe into the leverage metric.

use hl_screen_core::config::MAX_LEVERAGE_METRIC;
use hl_screen_core::{MetricTable, SymbolReconciler};
use tracing::debug;

use crate::models::venue::VenueAsset;

const VENUE_EXCHANGE: &str = "hyperliquid";

/// Emits `Max Lev. on HL` for every live universe entry. Delisted assets
/// are skipped so they fall back to leverage 0 like any unlisted coin. If
/// two entries canonicalize to the same coin the larger cap wins.
#[must_use]
pub fn extract(universe: &[VenueAsset], reconciler: &SymbolReconciler) -> MetricTable {
    let mut table = MetricTable::new();
    let mut skipped = 0usize;
    for asset in universe {
        if asset.is_delisted {
            skipped += 1;
            continue;
        }
        let coin = reconciler.canonicalize(&asset.name, VENUE_EXCHANGE);
        let leverage = f64::from(asset.max_leverage);
        table
            .entry(coin)
            .or_default()
            .entry(MAX_LEVERAGE_METRIC.to_string())
            .and_modify(|existing| *existing = existing.max(leverage))
            .or_insert(leverage);
    }
    debug!(assets = table.len(), skipped, "processed venue universe");
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use hl_screen_core::ScreenConfig;

    fn reconciler() -> SymbolReconciler {
        SymbolReconciler::new(&ScreenConfig::default())
    }

    fn asset(name: &str, max_leverage: u32, is_delisted: bool) -> VenueAsset {
        VenueAsset { name: name.to_string(), max_leverage, is_delisted }
    }

    #[test]
    fn live_assets_carry_their_leverage_cap() {
        let table = extract(&[asset("BTC", 40, false), asset("WIF", 5, false)], &reconciler());
        assert_eq!(table["BTC"][MAX_LEVERAGE_METRIC], 40.0);
        assert_eq!(table["WIF"][MAX_LEVERAGE_METRIC], 5.0);
    }

    #[test]
    fn delisted_assets_are_dropped() {
        let table = extract(&[asset("OLD", 3, true), asset("BTC", 40, false)], &reconciler());
        assert!(!table.contains_key("OLD"));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn denomination_prefix_is_stripped() {
        let table = extract(&[asset("kPEPE", 10, false)], &reconciler());
        assert_eq!(table["PEPE"][MAX_LEVERAGE_METRIC], 10.0);
    }

    #[test]
    fn colliding_entries_keep_the_larger_cap() {
        let table = extract(&[asset("kPEPE", 5, false), asset("PEPE", 10, false)], &reconciler());
        assert_eq!(table["PEPE"][MAX_LEVERAGE_METRIC], 10.0);
    }
}
