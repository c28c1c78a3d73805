//! bastion-ranker: Settlement readiness scoring engine.
//!
//! Metric collectors turn settlement records into [0, 1] sub-scores, the
//! composer folds them into readiness, risk and priority scores using the
//! administrator-tuned weights held by the weight store.

pub mod cache;
pub mod collectors;
pub mod engine;
pub mod metrics;
pub mod normalise;
pub mod scorer;
pub mod weight_backend;
pub mod weight_store;
pub mod weights;

pub use engine::{ReadinessEngine, SettlementScore};
pub use metrics::{MetricDomain, SettlementMetrics};
pub use scorer::{compose, AttentionTier, ScoreCard};
pub use weight_store::{SaveOutcome, WeightSnapshot, WeightSource, WeightStore};
pub use weights::{GroupWarning, WeightGroup, WeightSet};
