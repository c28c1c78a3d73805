//! Composite settlement score computation.
//!
//! readiness = 100 × Σ(w_r × m_r)
//! risk      = 100 × Σ(w_k × m_k)
//! priority  = 100 × (w_p.risk × risk/100 + w_p.readiness × (100 − readiness)/100)
//!
//! Priority is a "needs attention" score: it grows with risk and with the
//! readiness shortfall. Weight groups are applied as given, never renormalised.

use bastion_common::TierThresholds;
use serde::{Deserialize, Serialize};

use crate::metrics::SettlementMetrics;
use crate::weights::WeightSet;

/// Composite scores, each on a 0–100 scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreCard {
    pub readiness: f64,
    pub risk: f64,
    pub priority: f64,
}

/// Combine sub-scores into readiness, risk and priority.
pub fn compose(weights: &WeightSet, metrics: &SettlementMetrics) -> ScoreCard {
    let r = &weights.readiness;
    let k = &weights.risk;
    let p = &weights.priority;

    let readiness = to_scale(
        r.personnel * metrics.personnel
            + r.components * metrics.components
            + r.training * metrics.training,
    );

    let risk = to_scale(
        k.threat * metrics.threat
            + k.infra * metrics.infra
            + k.response * metrics.response
            + k.incidents * metrics.incidents,
    );

    let priority = to_scale(p.risk * (risk / 100.0) + p.readiness * ((100.0 - readiness) / 100.0));

    ScoreCard { readiness, risk, priority }
}

/// Lift a [0, 1] weighted sum onto 0–100. Sums pushed past 1.0 by an
/// overweight group are held at the boundary.
fn to_scale(weighted_sum: f64) -> f64 {
    if !weighted_sum.is_finite() {
        return 0.0;
    }
    (100.0 * weighted_sum).clamp(0.0, 100.0)
}

/// Bucketed priority used to order the settlement dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttentionTier {
    Routine,
    Elevated,
    Critical,
}

impl AttentionTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttentionTier::Routine => "routine",
            AttentionTier::Elevated => "elevated",
            AttentionTier::Critical => "critical",
        }
    }
}

pub fn determine_attention_tier(priority: f64, thresholds: &TierThresholds) -> AttentionTier {
    if priority >= thresholds.critical {
        AttentionTier::Critical
    } else if priority >= thresholds.elevated {
        AttentionTier::Elevated
    } else {
        AttentionTier::Routine
    }
}
