//! Chart datasets from the venue analytics feed.
//!
//! Every dataset is a list of per-(time, coin) points with dataset-specific
//! numeric fields; the liquidity dataset is instead keyed by coin. Field
//! names pass through untouched so one model covers all five queries.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

/// Accepts both string and numeric time buckets; numbers are formatted to a
/// fixed width so lexicographic order matches chronological order.
fn de_time<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawTime {
        Text(String),
        Number(f64),
    }
    Ok(match RawTime::deserialize(deserializer)? {
        RawTime::Text(text) => text,
        RawTime::Number(number) => format!("{number:018.3}"),
    })
}

/// One point of a time/coin keyed chart dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartPoint {
    #[serde(deserialize_with = "de_time")]
    pub time: String,
    pub coin: String,
    #[serde(flatten)]
    pub fields: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChartResponse {
    #[serde(default)]
    pub chart_data: Vec<ChartPoint>,
}

/// One point of the per-coin liquidity dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiquidityPoint {
    #[serde(deserialize_with = "de_time")]
    pub time: String,
    #[serde(flatten)]
    pub fields: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LiquidityResponse {
    #[serde(default)]
    pub chart_data: BTreeMap<String, Vec<LiquidityPoint>>,
}

/// The five analytics datasets one screening run consumes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalyticsSnapshot {
    pub daily_usd_volume_by_coin: Vec<ChartPoint>,
    pub total_volume: Vec<ChartPoint>,
    pub asset_ctxs: Vec<ChartPoint>,
    pub hlp_positions: Vec<ChartPoint>,
    pub liquidity_by_coin: BTreeMap<String, Vec<LiquidityPoint>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chart_point_keeps_extra_fields() {
        let raw = r#"{"time": "2025-07-01", "coin": "BTC", "total_volume": 12345.6, "other": "x"}"#;
        let point: ChartPoint = serde_json::from_str(raw).unwrap();
        assert_eq!(point.time, "2025-07-01");
        assert_eq!(point.coin, "BTC");
        assert_eq!(point.fields["total_volume"], 12345.6);
        assert_eq!(point.fields["other"], "x");
    }

    #[test]
    fn numeric_times_sort_chronologically_as_text() {
        let early: ChartPoint =
            serde_json::from_str(r#"{"time": 1700000000, "coin": "A"}"#).unwrap();
        let late: ChartPoint =
            serde_json::from_str(r#"{"time": 1710000000, "coin": "A"}"#).unwrap();
        assert!(early.time < late.time);
    }

    #[test]
    fn liquidity_response_is_keyed_by_coin() {
        let raw = r#"{"chart_data": {"BTC": [
            {"time": "2025-07-01", "median_slippage_3000": 0.0001}
        ]}}"#;
        let response: LiquidityResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(response.chart_data["BTC"].len(), 1);
        assert_eq!(response.chart_data["BTC"][0].fields["median_slippage_3000"], 0.0001);
    }
}
