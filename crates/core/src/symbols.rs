//! Canonical asset identities.
//!
//! Raw tickers differ per source: pair suffixes, synthetic-leverage
//! denominations ("1000PEPE", "kSHIB"), and exchange-local renames all map
//! onto one canonical coin so the merger can join rows across sources.

use std::collections::{BTreeMap, BTreeSet};

use crate::config::ScreenConfig;
use crate::Coin;

/// Maps raw per-source symbols to canonical asset identities and knows which
/// identities are stable-coins. Built once from the calibration tables.
#[derive(Debug, Clone)]
pub struct SymbolReconciler {
    markers: Vec<String>,
    global: BTreeMap<String, String>,
    by_exchange: BTreeMap<(String, String), String>,
    stable: BTreeSet<String>,
}

impl SymbolReconciler {
    #[must_use]
    pub fn new(config: &ScreenConfig) -> Self {
        // Longest markers strip first so "1000" never eats into "1000000".
        let mut markers = config.leverage_markers.clone();
        markers.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

        let by_exchange = config
            .exchange_aliases
            .iter()
            .map(|a| ((a.symbol.clone(), a.exchange.clone()), a.canonical.clone()))
            .collect();

        Self {
            markers,
            global: config.token_aliases.clone(),
            by_exchange,
            stable: config.stable_coins.clone(),
        }
    }

    /// Canonicalizes one raw symbol from the given source exchange.
    ///
    /// Order: keep the base before the pair separator, strip leverage
    /// markers, then the per-exchange override wins outright; otherwise the
    /// global alias table applies; otherwise the stripped symbol stands.
    #[must_use]
    pub fn canonicalize(&self, raw: &str, exchange: &str) -> Coin {
        let base = raw.split('/').next().unwrap_or(raw);
        let mut coin = base.to_string();
        for marker in &self.markers {
            coin = coin.replace(marker.as_str(), "");
        }
        if let Some(canonical) = self.by_exchange.get(&(coin.clone(), exchange.to_string())) {
            return canonical.clone();
        }
        self.global.get(&coin).cloned().unwrap_or(coin)
    }

    /// Global alias lookup without stripping, used for sources keyed by
    /// listing name rather than ticker.
    #[must_use]
    pub fn alias(&self, raw: &str) -> Option<&str> {
        self.global.get(raw).map(String::as_str)
    }

    #[must_use]
    pub fn is_stable(&self, coin: &str) -> bool {
        self.stable.contains(coin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reconciler() -> SymbolReconciler {
        SymbolReconciler::new(&ScreenConfig::default())
    }

    #[test]
    fn strips_pair_suffix() {
        let r = reconciler();
        assert_eq!(r.canonicalize("BTC/USDT", "binance"), "BTC");
        assert_eq!(r.canonicalize("ETH/USD:USD", "krakenfutures"), "ETH");
    }

    #[test]
    fn strips_leverage_markers_longest_first() {
        let r = reconciler();
        assert_eq!(r.canonicalize("1000PEPE/USDT:USDT", "binance"), "PEPE");
        assert_eq!(r.canonicalize("1000000MOG/USDT", "gate"), "MOG");
        assert_eq!(r.canonicalize("10000000AIDOGE/USDT", "okx"), "AIDOGE");
        assert_eq!(r.canonicalize("kSHIB/USD", "hyperliquid"), "SHIB");
    }

    #[test]
    fn exchange_override_beats_global_alias() {
        let r = reconciler();
        assert_eq!(r.canonicalize("NEIRO/USDT", "bybit"), "NEIROETH");
        assert_eq!(r.canonicalize("NEIRO/USDT", "kucoin"), "NEIROETH");
        // No override configured for binance, and no global alias either.
        assert_eq!(r.canonicalize("NEIRO/USDT", "binance"), "NEIRO");
    }

    #[test]
    fn global_alias_applies_once_without_chaining() {
        let r = reconciler();
        // HPOS10I -> BITCOIN even though BITCOIN itself aliases to HPOS.
        assert_eq!(r.canonicalize("HPOS10I", ""), "BITCOIN");
        assert_eq!(r.canonicalize("BITCOIN", ""), "HPOS");
        assert_eq!(r.canonicalize("FRAX/USDT", "binance"), "FXS");
        assert_eq!(r.canonicalize("UBTC/USDC", "hyperliquid"), "BTC");
    }

    #[test]
    fn unknown_symbols_pass_through() {
        let r = reconciler();
        assert_eq!(r.canonicalize("WIF/USDT", "binance"), "WIF");
    }

    #[test]
    fn stable_coins_are_flagged() {
        let r = reconciler();
        assert!(r.is_stable("USDT"));
        assert!(r.is_stable("USDE"));
        assert!(!r.is_stable("BTC"));
    }

    #[test]
    fn alias_lookup_by_listing_name() {
        let r = reconciler();
        assert_eq!(r.alias("Neiro Ethereum"), Some("NEIROETH"));
        assert_eq!(r.alias("Frax (prev. FXS)"), Some("FXS"));
        assert_eq!(r.alias("Dogecoin"), None);
    }
}
