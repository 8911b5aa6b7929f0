//! Reference-exchange candle windows into volume and volatility metrics.
//!
//! Per (exchange, market side, symbol) the window value is the mean daily
//! notional over the most recent complete days, pricing each day at
//! `min(low, last_close)` so a single upward wick cannot inflate the
//! estimate. Cross-exchange aggregation then reduces per coin: volumes sum
//! and take a concentration-robust top-3 geometric mean, dispersion metrics
//! take the median.

use std::collections::BTreeMap;

use hl_screen_core::config::{metric, MarketType};
use hl_screen_core::{Coin, MetricTable, SymbolReconciler};
use tracing::debug;

use crate::models::candle::Candle;

const MS_PER_DAY: i64 = 86_400_000;

/// One cached candle window: every symbol of one exchange market side, plus
/// the contract sizes needed to turn contract volume into notional.
#[derive(Debug, Clone)]
pub struct ReferenceWindow {
    pub exchange: String,
    pub market_type: MarketType,
    pub candles: BTreeMap<String, Vec<Candle>>,
    pub contract_sizes: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, Copy)]
struct WindowStats {
    volume_m: f64,
    volatility: f64,
    intraday_range: f64,
}

/// Reduces all exchange windows into one metric table keyed by canonical
/// coin. `now_ms` anchors the retained window so runs are reproducible.
#[must_use]
pub fn extract(
    windows: &[ReferenceWindow],
    reconciler: &SymbolReconciler,
    days_to_consider: usize,
    retained_window_days: usize,
    now_ms: i64,
) -> MetricTable {
    let earliest_ms = now_ms - retained_window_days as i64 * MS_PER_DAY;

    // (market side, coin) -> exchange -> stats; duplicate listings within
    // one exchange keep the larger volume observation.
    let mut grouped: BTreeMap<(MarketType, Coin), BTreeMap<String, WindowStats>> = BTreeMap::new();

    for window in windows {
        let mut kept = 0usize;
        for (symbol, candles) in &window.candles {
            let contract_size = window
                .contract_sizes
                .get(symbol)
                .copied()
                .filter(|size| *size > 0.0)
                .unwrap_or(1.0)
                .min(1.0);
            let Some(stats) = window_stats(candles, contract_size, days_to_consider, earliest_ms)
            else {
                continue;
            };
            kept += 1;

            let coin = reconciler.canonicalize(symbol, &window.exchange);
            let slot = grouped
                .entry((window.market_type, coin))
                .or_default()
                .entry(window.exchange.clone());
            slot.and_modify(|existing| {
                if stats.volume_m >= existing.volume_m {
                    *existing = stats;
                }
            })
            .or_insert(stats);
        }
        debug!(
            exchange = %window.exchange,
            market = %window.market_type,
            symbols = window.candles.len(),
            kept,
            "processed reference window"
        );
    }

    let mut table = MetricTable::new();
    for ((market_type, coin), per_exchange) in grouped {
        let (volume_name, geomean_name, volatility_name, range_name) = metric_names(market_type);

        let volumes: Vec<f64> = per_exchange.values().map(|s| s.volume_m).collect();
        let row = table.entry(coin).or_default();
        row.insert(volume_name.to_string(), volumes.iter().sum());
        row.insert(geomean_name.to_string(), geomean_three(&volumes));
        if let Some(value) = median(per_exchange.values().map(|s| s.volatility)) {
            row.insert(volatility_name.to_string(), value);
        }
        if let Some(value) = median(per_exchange.values().map(|s| s.intraday_range)) {
            row.insert(range_name.to_string(), value);
        }
    }
    table
}

fn metric_names(market_type: MarketType) -> (&'static str, &'static str, &'static str, &'static str) {
    match market_type {
        MarketType::Spot => (
            metric::SPOT_VOLUME,
            metric::SPOT_VOLUME_GEOMEAN,
            metric::SPOT_VOLATILITY,
            metric::SPOT_INTRADAY_RANGE,
        ),
        MarketType::Futures => (
            metric::FUT_VOLUME,
            metric::FUT_VOLUME_GEOMEAN,
            metric::FUT_VOLATILITY,
            metric::FUT_INTRADAY_RANGE,
        ),
    }
}

/// Window stats for one symbol, or `None` when too little history survives
/// the cutoff. The most recent candle is always dropped as incomplete.
fn window_stats(
    candles: &[Candle],
    contract_size: f64,
    days: usize,
    earliest_ms: i64,
) -> Option<WindowStats> {
    let mut sorted: Vec<Candle> = candles
        .iter()
        .copied()
        .filter(|c| c.timestamp_ms >= earliest_ms)
        .collect();
    sorted.sort_by_key(|c| c.timestamp_ms);
    if sorted.len() < 2 {
        return None;
    }

    let end = sorted.len() - 1;
    let start = end.saturating_sub(days);
    let window = &sorted[start..end];
    let last_close = window[window.len() - 1].close;

    let notional_sum: f64 = window.iter().map(|c| c.low.min(last_close) * c.volume).sum();
    let volume_m = notional_sum / window.len() as f64 * contract_size / 1e6;

    let returns: Vec<f64> = window.windows(2).map(|pair| pair[1].close / pair[0].close - 1.0).collect();
    let ranges: Vec<f64> = window.iter().map(|c| c.high / c.low - 1.0).collect();

    Some(WindowStats {
        volume_m: if volume_m.is_finite() { volume_m } else { 0.0 },
        volatility: sample_std(tail(&returns, 2)).unwrap_or(0.0),
        intraday_range: sample_std(tail(&ranges, 2)).unwrap_or(0.0),
    })
}

fn tail(values: &[f64], count: usize) -> &[f64] {
    &values[values.len().saturating_sub(count)..]
}

/// Sample standard deviation; undefined below two values.
fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    let std = variance.sqrt();
    std.is_finite().then_some(std)
}

/// Geometric mean of the three largest values under a log1p transform:
/// `exp(sum(ln(v + 1) for top 3) / 3) - 1`. The divisor stays 3 even when
/// fewer exchanges report, penalizing thin cross-exchange coverage.
fn geomean_three(values: &[f64]) -> f64 {
    let mut logs: Vec<f64> = values.iter().map(|v| (v + 1.0).ln()).collect();
    logs.sort_by(f64::total_cmp);
    let top: f64 = logs.iter().rev().take(3).sum();
    (top / 3.0).exp() - 1.0
}

fn median(values: impl Iterator<Item = f64>) -> Option<f64> {
    let mut sorted: Vec<f64> = values.filter(|v| v.is_finite()).collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        Some(sorted[mid])
    } else {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hl_screen_core::ScreenConfig;

    const DAY: i64 = MS_PER_DAY;

    fn reconciler() -> SymbolReconciler {
        SymbolReconciler::new(&ScreenConfig::default())
    }

    fn flat_candles(count: usize, close: f64, volume: f64) -> Vec<Candle> {
        (0..count)
            .map(|i| Candle {
                timestamp_ms: i as i64 * DAY,
                open: close,
                high: close,
                low: close,
                close,
                volume,
            })
            .collect()
    }

    fn window(exchange: &str, market_type: MarketType, symbol: &str, candles: Vec<Candle>) -> ReferenceWindow {
        ReferenceWindow {
            exchange: exchange.to_string(),
            market_type,
            candles: [(symbol.to_string(), candles)].into_iter().collect(),
            contract_sizes: BTreeMap::new(),
        }
    }

    fn now_after(count: usize) -> i64 {
        count as i64 * DAY
    }

    #[test]
    fn volume_is_mean_notional_in_millions_excluding_last_candle() {
        // 31 candles at close 2.0, volume 1e6: the last one is dropped, the
        // remaining 30 average to 2.0 * 1e6 = 2 $m per day.
        let candles = flat_candles(31, 2.0, 1_000_000.0);
        let table = extract(
            &[window("binance", MarketType::Spot, "FOO/USDT", candles)],
            &reconciler(),
            30,
            35,
            now_after(31),
        );
        let volume = table["FOO"][metric::SPOT_VOLUME];
        assert!((volume - 2.0).abs() < 1e-9, "volume was {volume}");
    }

    #[test]
    fn upward_wicks_are_discounted_by_last_close() {
        // One candle spikes to low 50 while the window closes at 2.0: the
        // spike day prices at min(low, last_close) = 2.0, not 50.
        let mut candles = flat_candles(11, 2.0, 1_000_000.0);
        candles[5].low = 50.0;
        candles[5].high = 80.0;
        candles[5].close = 60.0;
        let table = extract(
            &[window("binance", MarketType::Spot, "FOO/USDT", candles)],
            &reconciler(),
            30,
            35,
            now_after(11),
        );
        let volume = table["FOO"][metric::SPOT_VOLUME];
        assert!((volume - 2.0).abs() < 0.2, "volume was {volume}");
    }

    #[test]
    fn stale_candles_outside_the_retained_window_are_ignored() {
        let mut candles = flat_candles(40, 2.0, 1_000_000.0);
        // Shift everything far into the past except the last three days.
        let recent = candles.split_off(37);
        for c in &mut candles {
            c.timestamp_ms -= 400 * DAY;
        }
        candles.extend(recent);
        let table = extract(
            &[window("binance", MarketType::Spot, "FOO/USDT", candles)],
            &reconciler(),
            30,
            35,
            now_after(40),
        );
        // Only the three recent candles qualify; two complete days remain.
        assert!(table.contains_key("FOO"));
    }

    #[test]
    fn duplicate_listings_keep_the_larger_volume() {
        let small = flat_candles(11, 1.0, 100.0);
        let large = flat_candles(11, 1.0, 9_000_000.0);
        let mut candles = BTreeMap::new();
        candles.insert("1000PEPE/USDT".to_string(), small);
        candles.insert("PEPE/USDT".to_string(), large);
        let w = ReferenceWindow {
            exchange: "gate".to_string(),
            market_type: MarketType::Spot,
            candles,
            contract_sizes: BTreeMap::new(),
        };
        let table = extract(&[w], &reconciler(), 30, 35, now_after(11));
        let volume = table["PEPE"][metric::SPOT_VOLUME];
        assert!((volume - 9.0).abs() < 1e-9, "volume was {volume}");
    }

    #[test]
    fn volumes_sum_across_exchanges() {
        let a = window("binance", MarketType::Futures, "FOO/USDT:USDT", flat_candles(11, 1.0, 3_000_000.0));
        let b = window("bybit", MarketType::Futures, "FOO/USDT:USDT", flat_candles(11, 1.0, 5_000_000.0));
        let table = extract(&[a, b], &reconciler(), 30, 35, now_after(11));
        let volume = table["FOO"][metric::FUT_VOLUME];
        assert!((volume - 8.0).abs() < 1e-9, "volume was {volume}");
    }

    #[test]
    fn geomean_divides_by_three_even_for_one_exchange() {
        let table = extract(
            &[window("binance", MarketType::Spot, "FOO/USDT", flat_candles(11, 1.0, 8_000_000.0))],
            &reconciler(),
            30,
            35,
            now_after(11),
        );
        let geomean = table["FOO"][metric::SPOT_VOLUME_GEOMEAN];
        let manual = ((8.0f64 + 1.0).ln() / 3.0).exp() - 1.0;
        assert!((geomean - manual).abs() < 1e-9, "geomean was {geomean}");
    }

    #[test]
    fn geomean_uses_only_the_three_largest() {
        let windows: Vec<ReferenceWindow> = [("binance", 1.0), ("bybit", 7.0), ("okx", 7.0), ("gate", 7.0)]
            .into_iter()
            .map(|(exchange, millions)| {
                window(
                    exchange,
                    MarketType::Spot,
                    "FOO/USDT",
                    flat_candles(11, 1.0, millions * 1e6),
                )
            })
            .collect();
        let table = extract(&windows, &reconciler(), 30, 35, now_after(11));
        let geomean = table["FOO"][metric::SPOT_VOLUME_GEOMEAN];
        // Top three are the 7 $m windows; the 1 $m window drops out.
        assert!((geomean - 7.0).abs() < 1e-9, "geomean was {geomean}");
    }

    #[test]
    fn contract_size_is_capped_at_one() {
        let mut w = window("bitmex", MarketType::Futures, "FOO/USD:USD", flat_candles(11, 1.0, 1_000_000.0));
        w.contract_sizes.insert("FOO/USD:USD".to_string(), 100.0);
        let table = extract(&[w], &reconciler(), 30, 35, now_after(11));
        let volume = table["FOO"][metric::FUT_VOLUME];
        assert!((volume - 1.0).abs() < 1e-9, "volume was {volume}");
    }

    #[test]
    fn fractional_contract_size_scales_notional() {
        let mut w = window("bitmex", MarketType::Futures, "FOO/USD:USD", flat_candles(11, 1.0, 1_000_000.0));
        w.contract_sizes.insert("FOO/USD:USD".to_string(), 0.25);
        let table = extract(&[w], &reconciler(), 30, 35, now_after(11));
        let volume = table["FOO"][metric::FUT_VOLUME];
        assert!((volume - 0.25).abs() < 1e-9, "volume was {volume}");
    }

    #[test]
    fn single_candle_symbols_are_skipped() {
        let table = extract(
            &[window("binance", MarketType::Spot, "FOO/USDT", flat_candles(1, 1.0, 1e9))],
            &reconciler(),
            30,
            35,
            now_after(1),
        );
        assert!(table.is_empty());
    }

    #[test]
    fn volatility_is_sample_std_of_last_two_returns() {
        // Closes 1.0 ... 1.0, then 1.1, 1.21, and a dropped final candle:
        // the last two returns are both 10%, so the sample std is 0.
        let mut candles = flat_candles(12, 1.0, 1_000_000.0);
        candles[9].close = 1.1;
        candles[10].close = 1.21;
        for c in &mut candles {
            c.high = c.high.max(c.close);
        }
        let table = extract(
            &[window("binance", MarketType::Spot, "FOO/USDT", candles)],
            &reconciler(),
            30,
            35,
            now_after(12),
        );
        let volatility = table["FOO"][metric::SPOT_VOLATILITY];
        assert!(volatility.abs() < 1e-9, "volatility was {volatility}");
    }

    #[test]
    fn dispersion_metrics_take_the_median_across_exchanges() {
        let mut windows = Vec::new();
        for (exchange, range) in [("binance", 0.02), ("bybit", 0.06), ("okx", 0.5)] {
            let candles: Vec<Candle> = (0..12)
                .map(|i| Candle {
                    timestamp_ms: i * DAY,
                    open: 1.0,
                    high: 1.0 + range,
                    low: 1.0,
                    close: 1.0,
                    volume: 1_000_000.0,
                })
                .collect();
            windows.push(window(exchange, MarketType::Spot, "FOO/USDT", candles));
        }
        let table = extract(&windows, &reconciler(), 30, 35, now_after(12));
        let range = table["FOO"][metric::SPOT_INTRADAY_RANGE];
        // Each exchange's intraday std is 0 (constant range), so the median
        // of the per-exchange values is 0; the metric still materializes.
        assert!(range.abs() < 1e-9, "range was {range}");
    }
}
