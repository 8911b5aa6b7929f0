use thiserror::Error;

/// A malformed threshold curve. Calibration problems are fatal: a broken
/// curve cannot produce a meaningful score, so the run aborts before any
/// asset is scored.
#[derive(Debug, Error, PartialEq)]
pub enum CurveError {
    #[error("curve needs at least one step")]
    ZeroSteps,
    #[error("curve endpoints must be finite, got start={start} end={end}")]
    NonFiniteEndpoint { start: f64, end: f64 },
    #[error("exp curve endpoints must be positive, got start={start} end={end}")]
    NonPositiveExpEndpoint { start: f64, end: f64 },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("category {category:?}, metric {metric:?}: {source}")]
    Curve {
        category: String,
        metric: String,
        #[source]
        source: CurveError,
    },
    #[error("listing boost category {0:?} is not a configured score category")]
    UnknownBoostCategory(String),
    #[error("score bounds must cover tier 0 and at least one non-zero tier, got {tiers:?}")]
    InsufficientTiers { tiers: Vec<u32> },
    #[error("lower and upper score bounds configure different tiers ({lower:?} vs {upper:?})")]
    MismatchedTierKeys { lower: Vec<u32>, upper: Vec<u32> },
}
