//! Memoized score cards.
//!
//! `compose` is pure, so a card is fully determined by the weights version and
//! the metric values. Keys carry the settlement id as well so entries for a
//! settlement can be told apart in traces.

use moka::sync::Cache;
use uuid::Uuid;

use crate::metrics::SettlementMetrics;
use crate::scorer::{compose, ScoreCard};
use crate::weights::WeightSet;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScoreKey {
    pub settlement_id: Uuid,
    pub weights_version: u64,
    pub snapshot: [u64; 7],
}

impl ScoreKey {
    pub fn new(settlement_id: Uuid, weights_version: u64, metrics: &SettlementMetrics) -> Self {
        Self {
            settlement_id,
            weights_version,
            snapshot: metrics.snapshot_bits(),
        }
    }
}

/// Bounded, thread-safe score card cache.
#[derive(Clone)]
pub struct ScoreCache {
    inner: Cache<ScoreKey, ScoreCard>,
}

impl ScoreCache {
    pub fn new(capacity: u64) -> Self {
        Self {
            inner: Cache::new(capacity),
        }
    }

    /// Return the cached card for this key or compose and remember it.
    pub fn get_or_compose(
        &self,
        settlement_id: Uuid,
        weights_version: u64,
        weights: &WeightSet,
        metrics: &SettlementMetrics,
    ) -> ScoreCard {
        let key = ScoreKey::new(settlement_id, weights_version, metrics);
        self.inner.get_with(key, || compose(weights, metrics))
    }

    pub fn contains(&self, settlement_id: Uuid, weights_version: u64, metrics: &SettlementMetrics) -> bool {
        self.inner
            .contains_key(&ScoreKey::new(settlement_id, weights_version, metrics))
    }
}
