//! Weight store: the single read/write path for scoring weights.
//!
//! Reads never fail: a missing record yields the defaults and an unreachable
//! backend yields the defaults with a warning. Writes require the
//! `ManageScoringWeights` capability, replace all nine coefficients at once
//! and are serialized (last write wins).

use std::sync::Arc;

use bastion_common::{BastionError, Capability, Principal, Result, ValidationPolicy};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::weight_backend::{WeightBackend, WeightRecord};
use crate::weights::{GroupWarning, WeightSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightSource {
    /// Read from the backend
    Persisted,
    /// Nothing saved yet
    Default,
    /// Backend unreachable or record unusable
    Fallback,
}

/// Weights as seen by one score computation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightSnapshot {
    pub weights: WeightSet,
    /// 0 for built-in defaults
    pub version: u64,
    pub source: WeightSource,
}

impl WeightSnapshot {
    fn defaults(source: WeightSource) -> Self {
        Self {
            weights: WeightSet::default(),
            version: 0,
            source,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveOutcome {
    pub version: u64,
    /// Groups that did not sum to 1.0; saved anyway under the warn policy
    pub warnings: Vec<GroupWarning>,
}

pub struct WeightStore {
    backend: Arc<dyn WeightBackend>,
    policy: ValidationPolicy,
    write_lock: Mutex<()>,
}

impl WeightStore {
    pub fn new(backend: Arc<dyn WeightBackend>, policy: ValidationPolicy) -> Self {
        Self {
            backend,
            policy,
            write_lock: Mutex::new(()),
        }
    }

    /// Current weights, or the built-in defaults.
    pub async fn load(&self) -> WeightSnapshot {
        match self.backend.read().await {
            Ok(Some(record)) => match record.weights.check_bounds() {
                Ok(()) => WeightSnapshot {
                    weights: record.weights,
                    version: record.version,
                    source: WeightSource::Persisted,
                },
                Err(reason) => {
                    warn!(version = record.version, %reason, "Stored weights unusable; using defaults");
                    WeightSnapshot::defaults(WeightSource::Fallback)
                }
            },
            Ok(None) => WeightSnapshot::defaults(WeightSource::Default),
            Err(e) => {
                warn!(error = %e, "Weight store unreachable; using defaults");
                WeightSnapshot::defaults(WeightSource::Fallback)
            }
        }
    }

    /// Save-time validator: groups whose sum is outside 1.0 ± 0.01.
    pub fn validate(&self, weights: &WeightSet) -> Vec<GroupWarning> {
        weights.validate()
    }

    /// Persist a full weight set on behalf of `principal`.
    pub async fn save(&self, principal: &Principal, weights: WeightSet) -> Result<SaveOutcome> {
        if !principal.has_capability(Capability::ManageScoringWeights) {
            warn!(user = %principal.user_id, "Weight save refused: missing capability");
            return Err(BastionError::Authorization(format!(
                "{} may not change scoring weights",
                principal.user_id
            )));
        }

        weights.check_bounds().map_err(BastionError::Validation)?;

        let warnings = weights.validate();
        if !warnings.is_empty() {
            let summary = warnings
                .iter()
                .map(|w| w.to_string())
                .collect::<Vec<_>>()
                .join("; ");
            match self.policy {
                ValidationPolicy::Block => return Err(BastionError::Validation(summary)),
                ValidationPolicy::Warn => {
                    warn!(user = %principal.user_id, %summary, "Saving weights with invalid group sums");
                }
            }
        }

        let _guard = self.write_lock.lock().await;

        let previous = match self.backend.read().await {
            Ok(record) => record.map_or(0, |r| r.version),
            // An unparseable record is replaced in full.
            Err(BastionError::Serialization(e)) => {
                warn!(error = %e, "Stored weights unreadable; overwriting");
                0
            }
            Err(e) => return Err(e),
        };
        let record = WeightRecord {
            weights,
            version: previous + 1,
            updated_at: Utc::now(),
            updated_by: Some(principal.user_id.clone()),
        };
        self.backend.write(&record).await?;

        info!(user = %principal.user_id, version = record.version, "Scoring weights saved");
        Ok(SaveOutcome {
            version: record.version,
            warnings,
        })
    }
}
