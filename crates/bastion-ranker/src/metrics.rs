//! Per-settlement metric view.
//!
//! `SettlementMetrics` is derived on demand from the record store and never
//! persisted. Domains whose data was missing or could not be fetched are
//! recorded in `degraded` so consumers can flag the score as incomplete.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricDomain {
    Personnel,
    Components,
    Training,
    Risk,
}

impl MetricDomain {
    pub const ALL: [MetricDomain; 4] = [
        MetricDomain::Personnel,
        MetricDomain::Components,
        MetricDomain::Training,
        MetricDomain::Risk,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MetricDomain::Personnel => "personnel",
            MetricDomain::Components => "components",
            MetricDomain::Training => "training",
            MetricDomain::Risk => "risk",
        }
    }
}

/// A single collected sub-score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Collected {
    /// Normalised value in [0, 1]
    pub value: f64,
    /// Some input was missing or malformed and counted as worst case
    pub degraded: bool,
}

impl Collected {
    pub fn complete(value: f64) -> Self {
        Self { value, degraded: false }
    }

    pub fn degraded(value: f64) -> Self {
        Self { value, degraded: true }
    }

    pub fn worst_case() -> Self {
        Self::degraded(0.0)
    }
}

/// The four independently normalised risk factors.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RiskFactors {
    pub threat: f64,
    pub infra: f64,
    pub response: f64,
    pub incidents: f64,
    pub degraded: bool,
}

/// Result of one collector, tagged by domain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DomainScore {
    Personnel(Collected),
    Components(Collected),
    Training(Collected),
    Risk(RiskFactors),
}

impl DomainScore {
    pub fn domain(&self) -> MetricDomain {
        match self {
            DomainScore::Personnel(_) => MetricDomain::Personnel,
            DomainScore::Components(_) => MetricDomain::Components,
            DomainScore::Training(_) => MetricDomain::Training,
            DomainScore::Risk(_) => MetricDomain::Risk,
        }
    }
}

/// Normalised sub-scores for one settlement, all in [0, 1].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SettlementMetrics {
    pub personnel: f64,
    pub components: f64,
    pub training: f64,
    pub threat: f64,
    pub infra: f64,
    pub response: f64,
    pub incidents: f64,
    #[serde(default)]
    pub degraded: BTreeSet<MetricDomain>,
}

impl SettlementMetrics {
    /// Every sub-score at 0 and every domain flagged.
    pub fn worst_case() -> Self {
        Self {
            degraded: MetricDomain::ALL.into_iter().collect(),
            ..Default::default()
        }
    }

    pub fn apply(&mut self, score: DomainScore) {
        let degraded = match score {
            DomainScore::Personnel(c) => {
                self.personnel = c.value;
                c.degraded
            }
            DomainScore::Components(c) => {
                self.components = c.value;
                c.degraded
            }
            DomainScore::Training(c) => {
                self.training = c.value;
                c.degraded
            }
            DomainScore::Risk(r) => {
                self.threat = r.threat;
                self.infra = r.infra;
                self.response = r.response;
                self.incidents = r.incidents;
                r.degraded
            }
        };
        if degraded {
            self.degraded.insert(score.domain());
        } else {
            self.degraded.remove(&score.domain());
        }
    }

    pub fn is_degraded(&self) -> bool {
        !self.degraded.is_empty()
    }

    /// Bit pattern of the sub-scores, used as a memoization key.
    pub fn snapshot_bits(&self) -> [u64; 7] {
        [
            self.personnel.to_bits(),
            self.components.to_bits(),
            self.training.to_bits(),
            self.threat.to_bits(),
            self.infra.to_bits(),
            self.response.to_bits(),
            self.incidents.to_bits(),
        ]
    }
}
