//! Weight set for settlement readiness scoring.
//!
//! Nine coefficients in three groups. Each group is expected to sum to 1.0;
//! the composer does not renormalise, so a misconfigured group visibly skews
//! the scores until an administrator fixes it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Allowed deviation of a group sum from 1.0.
pub const GROUP_SUM_TOLERANCE: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightGroup {
    Readiness,
    Risk,
    Priority,
}

impl WeightGroup {
    pub const ALL: [WeightGroup; 3] = [WeightGroup::Readiness, WeightGroup::Risk, WeightGroup::Priority];

    pub fn as_str(&self) -> &'static str {
        match self {
            WeightGroup::Readiness => "readiness",
            WeightGroup::Risk => "risk",
            WeightGroup::Priority => "priority",
        }
    }
}

/// Readiness group: personnel currency, component operability, training recency.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReadinessWeights {
    pub personnel: f64,
    pub components: f64,
    pub training: f64,
}

/// Risk group: threat rating, infrastructure vulnerability, response gap, open incidents.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskWeights {
    pub threat: f64,
    pub infra: f64,
    pub response: f64,
    pub incidents: f64,
}

/// Priority group: how much risk and inverted readiness drive "needs attention".
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriorityWeights {
    pub risk: f64,
    pub readiness: f64,
}

/// The complete 9-coefficient weight set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightSet {
    pub readiness: ReadinessWeights,
    pub risk: RiskWeights,
    pub priority: PriorityWeights,
}

impl Default for WeightSet {
    fn default() -> Self {
        Self {
            readiness: ReadinessWeights {
                personnel:  0.4,
                components: 0.4,
                training:   0.2,
            },
            risk: RiskWeights {
                threat:    0.3,
                infra:     0.3,
                response:  0.3,
                incidents: 0.1,
            },
            priority: PriorityWeights {
                risk:      0.6,
                readiness: 0.4,
            },
        }
    }
}

/// A group whose coefficients do not sum to 1.0 within tolerance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroupWarning {
    pub group: WeightGroup,
    pub sum: f64,
}

impl fmt::Display for GroupWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} weights sum to {:.3}, expected 1.0 ± {}",
            self.group.as_str(),
            self.sum,
            GROUP_SUM_TOLERANCE
        )
    }
}

impl WeightSet {
    pub fn group_sum(&self, group: WeightGroup) -> f64 {
        match group {
            WeightGroup::Readiness => {
                self.readiness.personnel + self.readiness.components + self.readiness.training
            }
            WeightGroup::Risk => {
                self.risk.threat + self.risk.infra + self.risk.response + self.risk.incidents
            }
            WeightGroup::Priority => self.priority.risk + self.priority.readiness,
        }
    }

    /// Groups whose sum falls outside [0.99, 1.01].
    pub fn validate(&self) -> Vec<GroupWarning> {
        WeightGroup::ALL
            .iter()
            .map(|&group| GroupWarning { group, sum: self.group_sum(group) })
            .filter(|w| (w.sum - 1.0).abs() > GROUP_SUM_TOLERANCE + 1e-9)
            .collect()
    }

    /// Every coefficient must be a finite number in [0, 1].
    pub fn check_bounds(&self) -> Result<(), String> {
        for (name, value) in self.named() {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(format!("{name} = {value} is outside [0, 1]"));
            }
        }
        Ok(())
    }

    /// Rescale one group so it sums to 1.0. A zero group is left untouched.
    pub fn normalise_group(&mut self, group: WeightGroup) {
        let sum = self.group_sum(group);
        if sum <= 0.0 {
            return;
        }
        match group {
            WeightGroup::Readiness => {
                self.readiness.personnel  /= sum;
                self.readiness.components /= sum;
                self.readiness.training   /= sum;
            }
            WeightGroup::Risk => {
                self.risk.threat    /= sum;
                self.risk.infra     /= sum;
                self.risk.response  /= sum;
                self.risk.incidents /= sum;
            }
            WeightGroup::Priority => {
                self.priority.risk      /= sum;
                self.priority.readiness /= sum;
            }
        }
    }

    /// Coefficients with their dotted names, in display order.
    pub fn named(&self) -> [(&'static str, f64); 9] {
        [
            ("readiness.personnel",  self.readiness.personnel),
            ("readiness.components", self.readiness.components),
            ("readiness.training",   self.readiness.training),
            ("risk.threat",          self.risk.threat),
            ("risk.infra",           self.risk.infra),
            ("risk.response",        self.risk.response),
            ("risk.incidents",       self.risk.incidents),
            ("priority.risk",        self.priority.risk),
            ("priority.readiness",   self.priority.readiness),
        ]
    }

    /// Set a coefficient by its dotted name. Returns false for unknown names.
    pub fn set(&mut self, name: &str, value: f64) -> bool {
        let slot = match name {
            "readiness.personnel"  => &mut self.readiness.personnel,
            "readiness.components" => &mut self.readiness.components,
            "readiness.training"   => &mut self.readiness.training,
            "risk.threat"          => &mut self.risk.threat,
            "risk.infra"           => &mut self.risk.infra,
            "risk.response"        => &mut self.risk.response,
            "risk.incidents"       => &mut self.risk.incidents,
            "priority.risk"        => &mut self.priority.risk,
            "priority.readiness"   => &mut self.priority.readiness,
            _ => return false,
        };
        *slot = value;
        true
    }
}
