//! Analytics chart feeds into venue activity and liquidity metrics.
//!
//! The five datasets join on (coin, time bucket). Per coin the metrics are
//! means over the feed's most recent buckets, and a coin only survives when
//! it has liquidity (slippage) data inside that window: venue liquidity
//! metrics without a liquidity sample are meaningless.

use std::collections::{BTreeMap, BTreeSet};

use hl_screen_core::config::metric;
use hl_screen_core::{MetricTable, SymbolReconciler};
use tracing::debug;

use crate::models::analytics::AnalyticsSnapshot;

const DAILY_USD_VOLUME: &str = "daily_usd_volume";
const TOTAL_VOLUME: &str = "total_volume";
const AVG_ORACLE_PX: &str = "avg_oracle_px";
const AVG_OPEN_INTEREST: &str = "avg_open_interest";
const AVG_NOTIONAL_OI: &str = "avg_notional_oi";
const DAILY_NTL_ABS: &str = "daily_ntl_abs";
const MEDIAN_SLIPPAGE_3K: &str = "median_slippage_3000";
const MEDIAN_SLIPPAGE_30K: &str = "median_slippage_30000";

type RowKey = (String, String); // (coin, time bucket)
type FieldRow = BTreeMap<String, f64>;

/// Reduces one analytics snapshot into a metric table keyed by canonical
/// coin. `window_buckets` is the number of most recent time buckets that
/// feed the averages.
#[must_use]
pub fn extract(
    snapshot: &AnalyticsSnapshot,
    reconciler: &SymbolReconciler,
    window_buckets: usize,
) -> MetricTable {
    let mut rows: BTreeMap<RowKey, FieldRow> = BTreeMap::new();
    let datasets = [
        &snapshot.daily_usd_volume_by_coin,
        &snapshot.total_volume,
        &snapshot.asset_ctxs,
        &snapshot.hlp_positions,
    ];
    for points in datasets {
        let mut collected: BTreeMap<RowKey, FieldRow> = BTreeMap::new();
        for point in points {
            // Spot pair ids carry an "@"; only perp coins are screened.
            if point.coin.contains('@') {
                continue;
            }
            let key = (point.coin.clone(), point.time.clone());
            let fields = numeric_fields(&point.fields);
            match collected.entry(key) {
                std::collections::btree_map::Entry::Vacant(slot) => {
                    slot.insert(fields);
                }
                std::collections::btree_map::Entry::Occupied(mut slot) => {
                    // Duplicate bucket entries keep the larger volume row.
                    if primary_volume(&fields) > primary_volume(slot.get()) {
                        *slot.get_mut() = fields;
                    }
                }
            }
        }
        for (key, fields) in collected {
            let row = rows.entry(key).or_default();
            for (name, value) in fields {
                row.entry(name).or_insert(value);
            }
        }
    }

    let mut liquidity_keys: BTreeSet<RowKey> = BTreeSet::new();
    for (coin, points) in &snapshot.liquidity_by_coin {
        if coin.contains('@') {
            continue;
        }
        for point in points {
            let key = (coin.clone(), point.time.clone());
            liquidity_keys.insert(key.clone());
            let row = rows.entry(key).or_default();
            for (name, value) in numeric_fields(&point.fields) {
                row.entry(name).or_insert(value);
            }
        }
    }

    for row in rows.values_mut() {
        if let (Some(px), Some(oi)) =
            (row.get(AVG_ORACLE_PX).copied(), row.get(AVG_OPEN_INTEREST).copied())
        {
            row.insert(AVG_NOTIONAL_OI.to_string(), px * oi);
        }
    }

    // The averaging window is the feed's most recent buckets, shared by all
    // coins rather than computed per coin.
    let times: BTreeSet<&String> = rows.keys().map(|(_, time)| time).collect();
    let window: BTreeSet<&String> =
        times.iter().rev().take(window_buckets).copied().collect();

    let mut sums: BTreeMap<String, BTreeMap<String, (f64, usize)>> = BTreeMap::new();
    let mut has_liquidity: BTreeSet<String> = BTreeSet::new();
    for ((coin, time), fields) in &rows {
        if !window.contains(time) {
            continue;
        }
        if liquidity_keys.contains(&(coin.clone(), time.clone())) {
            has_liquidity.insert(coin.clone());
        }
        let per_field = sums.entry(coin.clone()).or_default();
        for (name, value) in fields {
            let slot = per_field.entry(name.clone()).or_insert((0.0, 0));
            slot.0 += value;
            slot.1 += 1;
        }
    }

    let mut table = MetricTable::new();
    let mut gated = 0usize;
    for (coin, per_field) in sums {
        if !has_liquidity.contains(&coin) {
            gated += 1;
            continue;
        }
        let mean = |name: &str| {
            per_field.get(name).map(|(sum, count)| sum / *count as f64)
        };

        let mut row = FieldRow::new();
        if let (Some(total), Some(daily)) = (mean(TOTAL_VOLUME), mean(DAILY_USD_VOLUME)) {
            if total != 0.0 {
                let share = (total - daily / 2.0) / total * 100.0;
                insert_finite(&mut row, metric::HLP_VOL_SHARE, floor_share(share));
            }
        }
        if let (Some(ntl), Some(notional_oi)) = (mean(DAILY_NTL_ABS), mean(AVG_NOTIONAL_OI)) {
            if notional_oi != 0.0 {
                let share = ntl / notional_oi * 100.0;
                insert_finite(&mut row, metric::HLP_OI_SHARE, floor_share(share));
            }
        }
        if let Some(notional_oi) = mean(AVG_NOTIONAL_OI) {
            insert_finite(&mut row, metric::OI_ON_HL, notional_oi / 1e6);
        }
        if let Some(total) = mean(TOTAL_VOLUME) {
            insert_finite(&mut row, metric::VOLUME_ON_HL, total / 1e6);
        }
        if let Some(slippage) = mean(MEDIAN_SLIPPAGE_3K) {
            insert_finite(&mut row, metric::SLIPPAGE_3K, slippage * 10_000.0);
        }
        if let Some(slippage) = mean(MEDIAN_SLIPPAGE_30K) {
            insert_finite(&mut row, metric::SLIPPAGE_30K, slippage * 10_000.0);
        }

        let canonical = reconciler.canonicalize(&coin, "");
        match table.entry(canonical) {
            std::collections::btree_map::Entry::Vacant(slot) => {
                slot.insert(row);
            }
            std::collections::btree_map::Entry::Occupied(mut slot) => {
                let keep_new = row.get(metric::VOLUME_ON_HL).copied().unwrap_or(0.0)
                    > slot.get().get(metric::VOLUME_ON_HL).copied().unwrap_or(0.0);
                if keep_new {
                    *slot.get_mut() = row;
                }
            }
        }
    }
    debug!(coins = table.len(), gated, "processed analytics snapshot");
    table
}

fn numeric_fields(fields: &BTreeMap<String, serde_json::Value>) -> FieldRow {
    fields
        .iter()
        .filter_map(|(name, value)| {
            value.as_f64().filter(|v| v.is_finite()).map(|v| (name.clone(), v))
        })
        .collect()
}

fn primary_volume(fields: &FieldRow) -> f64 {
    fields.get(DAILY_USD_VOLUME).copied().unwrap_or(0.0)
}

/// Shares at or below 0.1bp are floored to a sentinel so downstream curves
/// still see a strictly positive value.
fn floor_share(share: f64) -> f64 {
    if share <= 0.001 {
        0.0001
    } else {
        share
    }
}

fn insert_finite(row: &mut FieldRow, name: &str, value: f64) {
    if value.is_finite() {
        row.insert(name.to_string(), value);
    }
}
