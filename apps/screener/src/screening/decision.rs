//! Caller-side decision policy: maps a composite score to accept / review / reject.
//!
//! Not part of the scoring core. Thresholds come from configuration.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::ScreeningError;
use crate::scoring::params::COMPOSITE_MAX;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Accept,
    Review,
    Reject,
}

impl Decision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Accept => "accept",
            Decision::Review => "review",
            Decision::Reject => "reject",
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `score > accept_above` accepts, `score >= review_from` reviews, anything
/// lower rejects.
///
/// Thresholds are configured on the 0-100 scale. `scaled_to` maps them onto
/// the composite range a screener can actually produce.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DecisionPolicy {
    pub accept_above: f64,
    pub review_from: f64,
}

impl Default for DecisionPolicy {
    fn default() -> Self {
        Self {
            accept_above: 80.0,
            review_from: 70.0,
        }
    }
}

impl DecisionPolicy {
    pub fn new(accept_above: f64, review_from: f64) -> Result<Self, ScreeningError> {
        let in_range = |v: f64| v.is_finite() && (0.0..=COMPOSITE_MAX).contains(&v);
        if !in_range(accept_above) || !in_range(review_from) {
            return Err(ScreeningError::configuration(format!(
                "decision thresholds must lie in [0, {COMPOSITE_MAX}]"
            )));
        }
        if review_from > accept_above {
            return Err(ScreeningError::configuration(format!(
                "review threshold {review_from} is above the accept threshold {accept_above}"
            )));
        }
        Ok(Self {
            accept_above,
            review_from,
        })
    }

    pub fn decide(&self, composite: f64) -> Decision {
        if composite > self.accept_above {
            Decision::Accept
        } else if composite >= self.review_from {
            Decision::Review
        } else {
            Decision::Reject
        }
    }

    /// Rescales thresholds from the 0-100 scale to `[0, ceiling]`.
    ///
    /// Fails when the accept threshold would sit at or above the ceiling,
    /// since no composite could then be accepted.
    pub fn scaled_to(&self, ceiling: f64) -> Result<Self, ScreeningError> {
        if !ceiling.is_finite() || ceiling <= 0.0 || ceiling > COMPOSITE_MAX {
            return Err(ScreeningError::configuration(format!(
                "composite ceiling {ceiling} must lie in (0, {COMPOSITE_MAX}]"
            )));
        }
        let scale = |threshold: f64| threshold * ceiling / COMPOSITE_MAX;
        let scaled = Self {
            accept_above: scale(self.accept_above),
            review_from: scale(self.review_from),
        };
        if scaled.accept_above >= ceiling {
            return Err(ScreeningError::configuration(format!(
                "accept threshold {} is unreachable: composites never exceed {ceiling}",
                self.accept_above
            )));
        }
        Ok(scaled)
    }

    /// True for anything that is not rejected outright.
    pub fn is_qualified(&self, composite: f64) -> bool {
        composite >= self.review_from
    }
}
