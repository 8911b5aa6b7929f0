//! Daily OHLCV candles in the compact array layout reference-exchange
//! downloads arrive in.

use serde::{Deserialize, Serialize};

type CandleTuple = (f64, f64, f64, f64, f64, f64);

/// One candle, serialized as `[timestamp_ms, open, high, low, close, volume]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "CandleTuple", into = "CandleTuple")]
pub struct Candle {
    pub timestamp_ms: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl From<CandleTuple> for Candle {
    fn from((t, o, h, l, c, v): CandleTuple) -> Self {
        Self { timestamp_ms: t as i64, open: o, high: h, low: l, close: c, volume: v }
    }
}

impl From<Candle> for CandleTuple {
    fn from(candle: Candle) -> Self {
        (
            candle.timestamp_ms as f64,
            candle.open,
            candle.high,
            candle.low,
            candle.close,
            candle.volume,
        )
    }
}
