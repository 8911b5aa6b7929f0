//! Recommendation state machine: current leverage tier plus total score
//! maps to one action label.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Action recommended for one asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recommendation {
    #[serde(rename = "Dec. Lev.")]
    DecreaseLeverage,
    #[serde(rename = "Delist")]
    Delist,
    #[serde(rename = "List")]
    List,
    #[serde(rename = "Inc. Lev.")]
    IncreaseLeverage,
    #[serde(rename = "")]
    Hold,
}

impl Recommendation {
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::DecreaseLeverage => "Dec. Lev.",
            Self::Delist => "Delist",
            Self::List => "List",
            Self::IncreaseLeverage => "Inc. Lev.",
            Self::Hold => "",
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Per-tier score bounds and the transition rule.
///
/// Tiers are the venue's discrete leverage menu; anything above the top
/// configured tier is treated as the top tier. A leverage value strictly
/// between configured tiers resolves downward to the nearest configured
/// tier, whose bounds are the conservative choice.
#[derive(Debug, Clone)]
pub struct TierBounds {
    lower: BTreeMap<u32, f64>,
    upper: BTreeMap<u32, f64>,
    /// Lowest non-zero configured tier; falling below its lower bound means
    /// delisting rather than a further leverage cut.
    base_tier: u32,
    top_tier: u32,
}

impl TierBounds {
    /// # Errors
    /// Returns a [`ConfigError`] when the two bound tables configure
    /// different tiers or no non-zero tier exists.
    pub fn new(lower: BTreeMap<u32, f64>, upper: BTreeMap<u32, f64>) -> Result<Self, ConfigError> {
        let lower_keys: Vec<u32> = lower.keys().copied().collect();
        let upper_keys: Vec<u32> = upper.keys().copied().collect();
        if lower_keys != upper_keys {
            return Err(ConfigError::MismatchedTierKeys { lower: lower_keys, upper: upper_keys });
        }
        if !lower.contains_key(&0) || lower_keys.len() < 2 {
            return Err(ConfigError::InsufficientTiers { tiers: lower_keys });
        }

        let base_tier = *lower.keys().find(|t| **t > 0).unwrap_or(&0);
        let top_tier = *lower.keys().next_back().unwrap_or(&0);
        Ok(Self { lower, upper, base_tier, top_tier })
    }

    fn resolve_tier(&self, leverage: u32) -> u32 {
        let clamped = leverage.min(self.top_tier);
        let tier = self
            .lower
            .range(..=clamped)
            .next_back()
            .map_or(0, |(tier, _)| *tier);
        if tier != clamped {
            tracing::warn!(leverage, tier, "leverage outside configured tiers, rounded down");
        }
        tier
    }

    /// Evaluates the transition rule for one asset.
    #[must_use]
    pub fn recommend(&self, leverage: u32, score: f64) -> Recommendation {
        let tier = self.resolve_tier(leverage);
        let too_low = score < self.lower[&tier];
        let too_high = score >= self.upper[&tier];

        if leverage > self.base_tier && too_low {
            Recommendation::DecreaseLeverage
        } else if leverage == self.base_tier && too_low {
            Recommendation::Delist
        } else if leverage == 0 && too_high {
            Recommendation::List
        } else if leverage > 0 && too_high {
            Recommendation::IncreaseLeverage
        } else {
            Recommendation::Hold
        }
    }
}
