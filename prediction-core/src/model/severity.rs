//! Severity tiers
//!
//! Coarse bucketing of the potable-class probability. The floors are fixed
//! and do not follow the decision threshold, so a sample can be predicted
//! potable while its severity is still `Low`.

use serde::{Deserialize, Serialize};

/// Probability at or above which severity is `High`
pub const HIGH_SEVERITY_FLOOR: f64 = 0.8;

/// Probability at or above which severity is `Medium`
pub const MEDIUM_SEVERITY_FLOOR: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    /// First match wins, highest tier first.
    pub fn from_probability(probability: f64) -> Self {
        if probability >= HIGH_SEVERITY_FLOOR {
            Severity::High
        } else if probability >= MEDIUM_SEVERITY_FLOOR {
            Severity::Medium
        } else {
            Severity::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "Low",
            Severity::Medium => "Medium",
            Severity::High => "High",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
