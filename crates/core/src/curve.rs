//! Threshold curves: configurable step functions mapping one continuous
//! metric to a small integer level.
//!
//! A curve expands to an explicit ordered list of `(value, level)` points so
//! selection is a direct "closest qualifying threshold" lookup rather than
//! anything keyed on computed floats.

use serde::{Deserialize, Serialize};

use crate::error::CurveError;

/// Shape of a threshold curve. An unrecognized kind fails deserialization,
/// which makes a malformed calibration table a fatal configuration error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurveKind {
    /// Geometric spacing between `start` and `end`; higher metric, higher level.
    Exp,
    /// Even spacing between `start` and `end`; higher metric, higher level.
    Linear,
    /// Even spacing, but lower metric earns the higher level.
    ReverseLinear,
}

/// Declarative spec for one threshold curve: `steps + 1` points spanning
/// `start`..`end`, levels 0..=`steps`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CurveSpec {
    pub kind: CurveKind,
    pub start: f64,
    pub end: f64,
    pub steps: u32,
}

impl CurveSpec {
    /// Expands the spec into a usable curve.
    ///
    /// # Errors
    /// Returns a [`CurveError`] for zero steps, non-finite endpoints, or
    /// non-positive endpoints on an `exp` curve.
    pub fn build(&self) -> Result<ThresholdCurve, CurveError> {
        if self.steps == 0 {
            return Err(CurveError::ZeroSteps);
        }
        if !self.start.is_finite() || !self.end.is_finite() {
            return Err(CurveError::NonFiniteEndpoint { start: self.start, end: self.end });
        }
        if self.kind == CurveKind::Exp && (self.start <= 0.0 || self.end <= 0.0) {
            return Err(CurveError::NonPositiveExpEndpoint { start: self.start, end: self.end });
        }

        let steps = f64::from(self.steps);
        let points = (0..=self.steps)
            .map(|level| {
                let frac = f64::from(level) / steps;
                let value = match self.kind {
                    CurveKind::Exp => self.start * (self.end / self.start).powf(frac),
                    CurveKind::Linear | CurveKind::ReverseLinear => {
                        self.start + (self.end - self.start) * frac
                    }
                };
                (value, level)
            })
            .collect();

        Ok(ThresholdCurve { kind: self.kind, points })
    }
}

/// A built threshold curve: ordered `(value, level)` points plus the
/// comparison direction.
#[derive(Debug, Clone)]
pub struct ThresholdCurve {
    kind: CurveKind,
    points: Vec<(f64, u32)>,
}

impl ThresholdCurve {
    /// The threshold points in level order.
    #[must_use]
    pub fn points(&self) -> &[(f64, u32)] {
        &self.points
    }

    /// Maps a metric value to its level in `[0, steps]`.
    ///
    /// ge-curves (`exp`, `linear`) pick the greatest point value at or below
    /// the metric; le-curves (`reverse_linear`) pick the least point value at
    /// or above it. No qualifying point (including a NaN metric) maps to 0.
    /// The rule is direction-agnostic in whether `start` < `end`.
    #[must_use]
    pub fn level(&self, value: f64) -> u32 {
        let selected = match self.kind {
            CurveKind::Exp | CurveKind::Linear => self
                .points
                .iter()
                .filter(|(v, _)| *v <= value)
                .max_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1))),
            CurveKind::ReverseLinear => self
                .points
                .iter()
                .filter(|(v, _)| *v >= value)
                .min_by(|a, b| a.0.total_cmp(&b.0).then(b.1.cmp(&a.1))),
        };
        selected.map_or(0, |(_, level)| *level)
    }

    /// Highest level this curve can award.
    #[must_use]
    pub fn max_level(&self) -> u32 {
        self.points.last().map_or(0, |(_, level)| *level)
    }
}
