//! Settlement scoring engine.
//!
//! Loads weights once per request, collects each settlement's metrics
//! concurrently and composes them through the score cache. A settlement whose
//! records fail or time out is still returned, scored as the worst case and
//! flagged degraded.

use std::sync::Arc;
use std::time::Duration;

use bastion_common::entities::Settlement;
use bastion_common::{Result, ScoringParams};
use bastion_db::RecordStore;
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::cache::ScoreCache;
use crate::collectors::MetricCollector;
use crate::metrics::SettlementMetrics;
use crate::scorer::{determine_attention_tier, AttentionTier, ScoreCard};
use crate::weight_store::{WeightSnapshot, WeightStore};

/// Scored settlement as handed to consumers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettlementScore {
    pub settlement_id: Uuid,
    pub name: String,
    pub metrics: SettlementMetrics,
    pub card: ScoreCard,
    pub tier: AttentionTier,
    /// At least one domain was scored as worst case
    pub degraded: bool,
    pub weights_version: u64,
    pub computed_for: NaiveDate,
}

pub struct ReadinessEngine {
    store: Arc<dyn RecordStore>,
    weights: Arc<WeightStore>,
    collector: MetricCollector,
    cache: ScoreCache,
    params: ScoringParams,
}

impl ReadinessEngine {
    pub fn new(store: Arc<dyn RecordStore>, weights: Arc<WeightStore>, params: ScoringParams) -> Self {
        Self {
            collector: MetricCollector::new(store.clone(), params.clone()),
            cache: ScoreCache::new(params.cache_capacity),
            store,
            weights,
            params,
        }
    }

    pub fn cache(&self) -> &ScoreCache {
        &self.cache
    }

    /// Score one settlement. Fails only if the settlement itself cannot be read.
    pub async fn score_settlement(&self, id: Uuid, at: Option<NaiveDate>) -> Result<SettlementScore> {
        let at = at.unwrap_or_else(today);
        let settlement = self.store.settlement(id).await?;
        let snapshot = self.weights.load().await;
        Ok(self.score_one(&settlement, at, &snapshot).await)
    }

    /// Score every settlement, highest priority first.
    pub async fn score_all(&self, at: Option<NaiveDate>) -> Result<Vec<SettlementScore>> {
        let at = at.unwrap_or_else(today);
        let settlements = self.store.settlements().await?;
        let snapshot = self.weights.load().await;

        let mut scores = futures::future::join_all(
            settlements.iter().map(|s| self.score_one(s, at, &snapshot)),
        )
        .await;

        rank(&mut scores);

        let degraded = scores.iter().filter(|s| s.degraded).count();
        info!(
            settlements = scores.len(),
            degraded,
            weights_version = snapshot.version,
            "Scored settlements"
        );
        Ok(scores)
    }

    async fn score_one(&self, settlement: &Settlement, at: NaiveDate, snapshot: &WeightSnapshot) -> SettlementScore {
        let timeout = Duration::from_millis(self.params.fetch_timeout_ms);
        let metrics = match tokio::time::timeout(timeout, self.collector.collect_all(settlement, at)).await {
            Ok(metrics) => metrics,
            Err(_) => {
                warn!(
                    settlement_id = %settlement.id,
                    timeout_ms = self.params.fetch_timeout_ms,
                    "Metric collection timed out; scoring as worst case"
                );
                SettlementMetrics::worst_case()
            }
        };

        let card = self
            .cache
            .get_or_compose(settlement.id, snapshot.version, &snapshot.weights, &metrics);

        SettlementScore {
            settlement_id: settlement.id,
            name: settlement.name.clone(),
            tier: determine_attention_tier(card.priority, &self.params.tiers),
            degraded: metrics.is_degraded(),
            metrics,
            card,
            weights_version: snapshot.version,
            computed_for: at,
        }
    }
}

/// Order by priority, descending; ties by name.
pub fn rank(scores: &mut [SettlementScore]) {
    scores.sort_by(|a, b| {
        b.card
            .priority
            .total_cmp(&a.card.priority)
            .then_with(|| a.name.cmp(&b.name))
    });
}

pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}
