use std::sync::Arc;
use std::time::Duration;

use bastion_common::entities::{ComponentKind, TrainingKind};
use bastion_common::{BastionError, Principal, Role, ScoringParams, ValidationPolicy};
use bastion_db::{MemoryRecordStore, RecordStore};
use bastion_ranker::weight_backend::MockWeightBackend;
use bastion_ranker::{AttentionTier, MetricDomain, ReadinessEngine, WeightSet, WeightStore};
use bastion_test_utils::{date, snapshot_of, FailingRecordStore, SettlementFixture, SlowRecordStore, Table};
use pretty_assertions::assert_eq;
use uuid::Uuid;

fn weight_store() -> Arc<WeightStore> {
    Arc::new(WeightStore::new(Arc::new(MockWeightBackend::new()), ValidationPolicy::Warn))
}

fn engine(store: Arc<dyn RecordStore>) -> ReadinessEngine {
    ReadinessEngine::new(store, weight_store(), ScoringParams::default())
}

/// Fully staffed, equipped, trained, with no threat.
fn secure(name: &str) -> SettlementFixture {
    let at = date(2026, 6, 1);
    let mut f = SettlementFixture::new(name, at)
        .threat(Some(1), Some(1.0))
        .fully_equipped()
        .inspection(10, 20, 0);
    for _ in 0..4 {
        f = f.soldier_ranged(Some(5));
    }
    for _ in 0..6 {
        f = f.training(TrainingKind::Drill, 0);
    }
    f
}

/// Nobody current, nothing working, maximal threat.
fn exposed(name: &str) -> SettlementFixture {
    let at = date(2026, 6, 1);
    let mut f = SettlementFixture::new(name, at)
        .threat(Some(5), Some(0.0))
        .soldier_ranged(None)
        .soldier_ranged(Some(400));
    for kind in ComponentKind::TRACKED {
        f = f.component(kind, true, false);
    }
    f = f.inspection(3, 10, 10);
    for d in 0..5 {
        f = f.open_incident(d);
    }
    f
}

#[tokio::test]
async fn test_secure_settlement_scores_ready() {
    let f = secure("Ofra");
    let id = f.id();
    let store = Arc::new(MemoryRecordStore::new(snapshot_of([f])));
    let score = engine(store).score_settlement(id, Some(date(2026, 6, 1))).await.unwrap();

    assert!((score.card.readiness - 100.0).abs() < 1e-6);
    assert!(score.card.risk.abs() < 1e-6);
    assert!(score.card.priority.abs() < 1e-6);
    assert_eq!(score.tier, AttentionTier::Routine);
    assert!(!score.degraded);
}

#[tokio::test]
async fn test_exposed_settlement_scores_critical() {
    let f = exposed("Itamar");
    let id = f.id();
    let store = Arc::new(MemoryRecordStore::new(snapshot_of([f])));
    let score = engine(store).score_settlement(id, Some(date(2026, 6, 1))).await.unwrap();

    assert!(score.card.readiness.abs() < 1e-6);
    assert!((score.card.risk - 100.0).abs() < 1e-6);
    assert!((score.card.priority - 100.0).abs() < 1e-6);
    assert_eq!(score.tier, AttentionTier::Critical);
}

#[tokio::test]
async fn test_score_all_ranked_by_priority() {
    let store = Arc::new(MemoryRecordStore::new(snapshot_of([
        secure("Alon Moreh"),
        exposed("Yitzhar"),
        secure("Eli"),
    ])));
    let scores = engine(store).score_all(Some(date(2026, 6, 1))).await.unwrap();
    let names: Vec<_> = scores.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Yitzhar", "Alon Moreh", "Eli"]);
}

#[tokio::test]
async fn test_zero_personnel_is_scored_not_skipped() {
    let f = SettlementFixture::new("Migron", date(2026, 6, 1)).fully_equipped();
    let id = f.id();
    let store = Arc::new(MemoryRecordStore::new(snapshot_of([f])));
    let score = engine(store).score_settlement(id, Some(date(2026, 6, 1))).await.unwrap();

    assert_eq!(score.metrics.personnel, 0.0);
    assert!(score.metrics.degraded.contains(&MetricDomain::Personnel));
    // Components still contribute 0.4 × 1.0
    assert!((score.card.readiness - 40.0).abs() < 1e-6);
}

#[tokio::test]
async fn test_fetch_failure_degrades_only_that_settlement() {
    let healthy = secure("Eli");
    let broken = secure("Shilo");
    let (healthy_id, broken_id) = (healthy.id(), broken.id());
    let memory: Arc<dyn RecordStore> = Arc::new(MemoryRecordStore::new(snapshot_of([healthy, broken])));
    let store = Arc::new(FailingRecordStore::new(memory).fail(broken_id, Table::Components));

    let scores = engine(store).score_all(Some(date(2026, 6, 1))).await.unwrap();
    assert_eq!(scores.len(), 2);

    let broken = scores.iter().find(|s| s.settlement_id == broken_id).unwrap();
    assert!(broken.degraded);
    assert_eq!(broken.metrics.components, 0.0);
    assert_eq!(broken.metrics.personnel, 1.0);
    assert!((broken.card.readiness - 60.0).abs() < 1e-6);

    let healthy = scores.iter().find(|s| s.settlement_id == healthy_id).unwrap();
    assert!(!healthy.degraded);
    assert!((healthy.card.readiness - 100.0).abs() < 1e-6);
}

#[tokio::test]
async fn test_timeout_degrades_to_worst_case() {
    let slow = secure("Talmon");
    let fast = secure("Dolev");
    let slow_id = slow.id();
    let memory: Arc<dyn RecordStore> = Arc::new(MemoryRecordStore::new(snapshot_of([slow, fast])));
    let store = Arc::new(SlowRecordStore::new(memory, Duration::from_secs(2)).slow_for(slow_id));
    let params = ScoringParams { fetch_timeout_ms: 50, ..Default::default() };
    let engine = ReadinessEngine::new(store, weight_store(), params);

    let scores = engine.score_all(Some(date(2026, 6, 1))).await.unwrap();
    let slow = scores.iter().find(|s| s.settlement_id == slow_id).unwrap();
    assert_eq!(slow.metrics.degraded.len(), 4);
    assert_eq!(slow.card.readiness, 0.0);
    assert!(scores.iter().any(|s| s.name == "Dolev" && !s.degraded));
}

#[tokio::test]
async fn test_unknown_settlement_is_not_found() {
    let store = Arc::new(MemoryRecordStore::default());
    let err = engine(store).score_settlement(Uuid::new_v4(), None).await.unwrap_err();
    assert!(matches!(err, BastionError::NotFound(_)));
}

#[tokio::test]
async fn test_saved_weights_change_scores_and_cache_key() {
    let f = exposed("Kedumim");
    let id = f.id();
    let store = Arc::new(MemoryRecordStore::new(snapshot_of([f])));
    let weights = weight_store();
    let engine = ReadinessEngine::new(store, weights.clone(), ScoringParams::default());
    let at = Some(date(2026, 6, 1));

    let before = engine.score_settlement(id, at).await.unwrap();
    assert_eq!(before.weights_version, 0);

    let admin = Principal::new("a-01", [Role::SettlementDefenseAdmin]);
    let mut w = WeightSet::default();
    w.priority.risk = 0.3; // priority group now sums to 0.7
    let outcome = weights.save(&admin, w).await.unwrap();
    assert_eq!(outcome.warnings.len(), 1);

    let after = engine.score_settlement(id, at).await.unwrap();
    assert_eq!(after.weights_version, 1);
    assert!((after.card.priority - 70.0).abs() < 1e-6);
    assert!(engine.cache().contains(id, 1, &after.metrics));
}

#[tokio::test]
async fn test_certification_keeps_soldier_current() {
    let at = date(2026, 6, 1);
    let f = SettlementFixture::new("Beit El", at).certified(30).soldier_ranged(Some(120));
    let id = f.id();
    let store = Arc::new(MemoryRecordStore::new(snapshot_of([f])));
    let score = engine(store).score_settlement(id, Some(at)).await.unwrap();
    assert!((score.metrics.personnel - 0.5).abs() < 1e-9);
}
