//! Market-cap listings into the `MC $m` metric.

use std::collections::BTreeMap;

use hl_screen_core::config::metric;
use hl_screen_core::{Coin, MetricTable, SymbolReconciler};
use tracing::debug;

use crate::models::marketcap::CapListing;

/// Reduces the listings feed to one market cap per canonical coin.
///
/// Listings alias by full *name* first (wrapped and renamed assets are
/// keyed that way upstream), then the ticker canonicalizes as usual. Across
/// duplicate listings the maximum cap wins, and a non-positive market cap
/// falls back to the fully-diluted cap.
#[must_use]
pub fn extract(listings: &[CapListing], reconciler: &SymbolReconciler) -> MetricTable {
    #[derive(Default)]
    struct Caps {
        market_cap: Option<f64>,
        fully_diluted: Option<f64>,
    }

    let mut grouped: BTreeMap<Coin, Caps> = BTreeMap::new();
    for listing in listings {
        let symbol = reconciler.alias(&listing.name).unwrap_or(&listing.symbol);
        let coin = reconciler.canonicalize(symbol, "");
        let caps = grouped.entry(coin).or_default();
        if let Some(cap) = listing.quote.usd.market_cap.filter(|c| c.is_finite()) {
            caps.market_cap = Some(caps.market_cap.map_or(cap, |c| c.max(cap)));
        }
        if let Some(cap) = listing.quote.usd.fully_diluted_market_cap.filter(|c| c.is_finite()) {
            caps.fully_diluted = Some(caps.fully_diluted.map_or(cap, |c| c.max(cap)));
        }
    }

    let mut table = MetricTable::new();
    for (coin, caps) in grouped {
        let cap = match caps.market_cap {
            Some(cap) if cap > 0.0 => Some(cap),
            _ => caps.fully_diluted,
        };
        if let Some(cap) = cap {
            table
                .entry(coin)
                .or_default()
                .insert(metric::MARKET_CAP.to_string(), cap / 1e6);
        }
    }
    debug!(coins = table.len(), listings = listings.len(), "processed market-cap listings");
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use hl_screen_core::ScreenConfig;

    fn reconciler() -> SymbolReconciler {
        SymbolReconciler::new(&ScreenConfig::default())
    }

    fn listing(name: &str, symbol: &str, mc: Option<f64>, fd: Option<f64>) -> CapListing {
        serde_json::from_value(serde_json::json!({
            "name": name,
            "symbol": symbol,
            "quote": {"USD": {"market_cap": mc, "fully_diluted_market_cap": fd}}
        }))
        .unwrap()
    }

    #[test]
    fn cap_lands_in_millions() {
        let table = extract(
            &[listing("Dogwifhat", "WIF", Some(2_500_000_000.0), Some(3_000_000_000.0))],
            &reconciler(),
        );
        assert_eq!(table["WIF"][metric::MARKET_CAP], 2500.0);
    }

    #[test]
    fn duplicate_listings_keep_the_max_cap() {
        let table = extract(
            &[
                listing("Dogwifhat", "WIF", Some(1_000_000.0), None),
                listing("Dogwifhat v2", "WIF", Some(9_000_000.0), None),
            ],
            &reconciler(),
        );
        assert_eq!(table["WIF"][metric::MARKET_CAP], 9.0);
    }

    #[test]
    fn non_positive_market_cap_falls_back_to_fully_diluted() {
        let table = extract(
            &[listing("Newcoin", "NEW", Some(0.0), Some(50_000_000.0))],
            &reconciler(),
        );
        assert_eq!(table["NEW"][metric::MARKET_CAP], 50.0);

        let table = extract(&[listing("Newcoin", "NEW", None, Some(8_000_000.0))], &reconciler());
        assert_eq!(table["NEW"][metric::MARKET_CAP], 8.0);
    }

    #[test]
    fn listings_without_any_cap_are_skipped() {
        let table = extract(&[listing("Ghost", "GST", None, None)], &reconciler());
        assert!(table.is_empty());
    }

    #[test]
    fn name_alias_wins_over_ticker() {
        let table = extract(
            &[listing("Neiro Ethereum", "NEIRO", Some(40_000_000.0), None)],
            &reconciler(),
        );
        assert!(table.contains_key("NEIROETH"));
        assert!(!table.contains_key("NEIRO"));
    }

    #[test]
    fn tickers_canonicalize_like_any_other_source() {
        let table = extract(
            &[listing("Some Fund", "1000SATS", Some(10_000_000.0), None)],
            &reconciler(),
        );
        assert!(table.contains_key("SATS"));
    }
}
