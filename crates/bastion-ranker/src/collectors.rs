//! Metric collectors.
//!
//! Pure functions turn typed settlement records into normalised sub-scores.
//! `MetricCollector` fetches those records from a `RecordStore`; a failed
//! fetch degrades its domain to the worst case instead of failing the
//! settlement.

use std::collections::HashMap;
use std::sync::Arc;

use bastion_common::entities::{
    Certification, ComponentKind, Incident, Inspection, SecurityComponent, Settlement, Soldier,
    TrainingEvent,
};
use bastion_common::ScoringParams;
use bastion_db::{DbError, RecordQuery, RecordStore, SortOrder};
use chrono::{Duration, NaiveDate};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::metrics::{Collected, DomainScore, MetricDomain, RiskFactors, SettlementMetrics};
use crate::normalise::{ratio, recency_weight, saturating, threat_level_factor};

/// Source records for one metric domain.
#[derive(Debug, Clone)]
pub enum DomainRecords {
    Personnel {
        soldiers: Vec<Soldier>,
        certifications: Vec<Certification>,
    },
    Components {
        components: Vec<SecurityComponent>,
    },
    Training {
        events: Vec<TrainingEvent>,
    },
    Risk {
        settlement: Settlement,
        inspections: Vec<Inspection>,
        incidents: Vec<Incident>,
    },
}

impl DomainRecords {
    pub fn domain(&self) -> MetricDomain {
        match self {
            DomainRecords::Personnel { .. } => MetricDomain::Personnel,
            DomainRecords::Components { .. } => MetricDomain::Components,
            DomainRecords::Training { .. } => MetricDomain::Training,
            DomainRecords::Risk { .. } => MetricDomain::Risk,
        }
    }

    /// Run the collector matching this domain.
    pub fn score(&self, at: NaiveDate, params: &ScoringParams) -> DomainScore {
        match self {
            DomainRecords::Personnel { soldiers, certifications } => {
                DomainScore::Personnel(personnel_subscore(soldiers, certifications, at, params))
            }
            DomainRecords::Components { components } => {
                DomainScore::Components(components_subscore(components))
            }
            DomainRecords::Training { events } => {
                DomainScore::Training(training_subscore(events, at, params))
            }
            DomainRecords::Risk { settlement, inspections, incidents } => {
                DomainScore::Risk(risk_factors(settlement, inspections, incidents, at, params))
            }
        }
    }
}

// ── Personnel ────────────────────────────────────────────────────────────────

/// Fraction of active personnel whose latest qualifying activity falls inside
/// the validity window. A soldier with no qualifying activity counts as expired.
pub fn personnel_subscore(
    soldiers: &[Soldier],
    certifications: &[Certification],
    at: NaiveDate,
    params: &ScoringParams,
) -> Collected {
    let active: Vec<&Soldier> = soldiers.iter().filter(|s| s.active).collect();
    if active.is_empty() {
        return Collected::worst_case();
    }

    // Latest unexpired certification per soldier.
    let mut latest_cert: HashMap<Uuid, NaiveDate> = HashMap::new();
    for cert in certifications {
        let Some(issued) = cert.issued_on else { continue };
        if issued > at || cert.expires_on.is_some_and(|exp| exp < at) {
            continue;
        }
        latest_cert
            .entry(cert.soldier_id)
            .and_modify(|d| *d = (*d).max(issued))
            .or_insert(issued);
    }

    let current = active
        .iter()
        .filter(|s| {
            let range = s.last_range_date.filter(|d| *d <= at);
            let cert = latest_cert.get(&s.id).copied();
            match range.max(cert) {
                Some(latest) => (at - latest).num_days() <= params.personnel_validity_days,
                None => false,
            }
        })
        .count();

    Collected::complete(ratio(current, active.len()))
}

// ── Components ───────────────────────────────────────────────────────────────

/// Fraction of tracked component kinds that are present and operational.
/// Untracked kinds and null flags stay in the denominator as failures.
pub fn components_subscore(components: &[SecurityComponent]) -> Collected {
    let mut degraded = false;
    let mut operational = 0;

    for kind in ComponentKind::TRACKED {
        // Most recently updated record of this kind wins.
        let record = components
            .iter()
            .filter(|c| c.kind == kind)
            .max_by_key(|c| c.updated_on);

        match record {
            Some(c) => match (c.present, c.operational) {
                (Some(present), Some(works)) => {
                    if present && works {
                        operational += 1;
                    }
                }
                _ => degraded = true,
            },
            None => degraded = true,
        }
    }

    Collected {
        value: ratio(operational, ComponentKind::TRACKED.len()),
        degraded,
    }
}

// ── Training ─────────────────────────────────────────────────────────────────

/// Recency-weighted count of training events, drills and range sessions in
/// the lookback window, normalised against the expected cadence.
pub fn training_subscore(events: &[TrainingEvent], at: NaiveDate, params: &ScoringParams) -> Collected {
    let mut degraded = false;
    let mut weighted = 0.0;

    for event in events {
        match event.held_on {
            Some(held) => weighted += recency_weight((at - held).num_days(), params.training_lookback_days),
            None => degraded = true,
        }
    }

    let value = if params.expected_training_events > 0.0 {
        (weighted / params.expected_training_events).clamp(0.0, 1.0)
    } else {
        0.0
    };
    Collected { value, degraded }
}

// ── Risk ─────────────────────────────────────────────────────────────────────

/// Threat rating, infrastructure vulnerability, response gap and open-incident
/// load, each normalised independently.
pub fn risk_factors(
    settlement: &Settlement,
    inspections: &[Inspection],
    incidents: &[Incident],
    at: NaiveDate,
    params: &ScoringParams,
) -> RiskFactors {
    let mut degraded = false;

    let threat = match settlement.threat_level.and_then(threat_level_factor) {
        Some(v) => v,
        None => {
            degraded = true;
            0.0
        }
    };

    let response = match settlement.response_capability {
        Some(c) if c.is_finite() && (0.0..=1.0).contains(&c) => 1.0 - c,
        _ => {
            degraded = true;
            0.0
        }
    };

    let latest = inspections
        .iter()
        .filter(|i| i.inspected_on <= at)
        .max_by_key(|i| i.inspected_on);
    let infra = match latest.map(|i| (i.findings_total, i.findings_failed)) {
        Some((Some(total), Some(failed))) if failed <= total => ratio(failed as usize, total as usize),
        _ => {
            degraded = true;
            0.0
        }
    };

    let open = incidents
        .iter()
        .filter(|i| i.reported_on <= at && i.is_open(at))
        .count();

    RiskFactors {
        threat,
        infra,
        response,
        incidents: saturating(open, params.incident_saturation),
        degraded,
    }
}

// ── Record store collector ───────────────────────────────────────────────────

/// Fetches a settlement's records and runs the matching collectors.
#[derive(Clone)]
pub struct MetricCollector {
    store: Arc<dyn RecordStore>,
    params: ScoringParams,
}

impl MetricCollector {
    pub fn new(store: Arc<dyn RecordStore>, params: ScoringParams) -> Self {
        Self { store, params }
    }

    /// Fetch the source records one domain needs.
    pub async fn fetch(
        &self,
        domain: MetricDomain,
        settlement: &Settlement,
        at: NaiveDate,
    ) -> Result<DomainRecords, DbError> {
        let scope = RecordQuery::for_settlement(settlement.id);
        match domain {
            MetricDomain::Personnel => {
                let certs_scope = scope.clone().until(at);
                let (soldiers, certifications) = futures::try_join!(
                    self.store.soldiers(&scope),
                    self.store.certifications(&certs_scope),
                )?;
                Ok(DomainRecords::Personnel { soldiers, certifications })
            }
            MetricDomain::Components => {
                let components = self.store.components(&scope).await?;
                Ok(DomainRecords::Components { components })
            }
            MetricDomain::Training => {
                let from = Duration::try_days(self.params.training_lookback_days)
                    .and_then(|window| at.checked_sub_signed(window))
                    .ok_or_else(|| {
                        DbError::InvalidQuery(format!(
                            "training lookback of {} days overflows the calendar",
                            self.params.training_lookback_days
                        ))
                    })?;
                let events = self.store.training_events(&scope.between(from, at)).await?;
                Ok(DomainRecords::Training { events })
            }
            MetricDomain::Risk => {
                let inspections_scope = scope.clone().until(at).order(SortOrder::Descending);
                let incidents_scope = scope.until(at);
                let (inspections, incidents) = futures::try_join!(
                    self.store.inspections(&inspections_scope),
                    self.store.incidents(&incidents_scope),
                )?;
                Ok(DomainRecords::Risk {
                    settlement: settlement.clone(),
                    inspections,
                    incidents,
                })
            }
        }
    }

    /// Collect one domain. Fetch failures yield the worst case, flagged degraded.
    pub async fn collect(&self, domain: MetricDomain, settlement: &Settlement, at: NaiveDate) -> DomainScore {
        match self.fetch(domain, settlement, at).await {
            Ok(records) => records.score(at, &self.params),
            Err(e) => {
                warn!(
                    settlement_id = %settlement.id,
                    domain = domain.as_str(),
                    error = %e,
                    "Record fetch failed; scoring domain as worst case"
                );
                worst_case(domain)
            }
        }
    }

    /// Collect all four domains concurrently into a metrics view.
    pub async fn collect_all(&self, settlement: &Settlement, at: NaiveDate) -> SettlementMetrics {
        let scores = futures::future::join_all(
            MetricDomain::ALL.iter().map(|&d| self.collect(d, settlement, at)),
        )
        .await;

        let mut metrics = SettlementMetrics::default();
        for score in scores {
            metrics.apply(score);
        }
        debug!(
            settlement_id = %settlement.id,
            degraded = metrics.degraded.len(),
            "Collected settlement metrics"
        );
        metrics
    }
}

fn worst_case(domain: MetricDomain) -> DomainScore {
    match domain {
        MetricDomain::Personnel => DomainScore::Personnel(Collected::worst_case()),
        MetricDomain::Components => DomainScore::Components(Collected::worst_case()),
        MetricDomain::Training => DomainScore::Training(Collected::worst_case()),
        MetricDomain::Risk => DomainScore::Risk(RiskFactors { degraded: true, ..Default::default() }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bastion_common::entities::{IncidentSeverity, TrainingKind};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn soldier(settlement_id: Uuid, last_range: Option<NaiveDate>) -> Soldier {
        Soldier {
            id: Uuid::new_v4(),
            settlement_id,
            full_name: "Avi Cohen".to_string(),
            active: true,
            last_range_date: last_range,
        }
    }

    fn component(kind: ComponentKind, present: Option<bool>, operational: Option<bool>) -> SecurityComponent {
        SecurityComponent {
            id: Uuid::new_v4(),
            settlement_id: Uuid::nil(),
            kind,
            present,
            operational,
            updated_on: Some(date(2026, 1, 1)),
        }
    }

    fn settlement(threat_level: Option<u8>, response_capability: Option<f64>) -> Settlement {
        Settlement {
            id: Uuid::new_v4(),
            name: "Itamar".to_string(),
            region: None,
            threat_level,
            response_capability,
        }
    }

    #[test]
    fn test_personnel_zero_records_is_zero() {
        let c = personnel_subscore(&[], &[], date(2026, 6, 1), &ScoringParams::default());
        assert_eq!(c.value, 0.0);
        assert!(c.degraded);
    }

    #[test]
    fn test_personnel_validity_window() {
        let at = date(2026, 6, 1);
        let s = Uuid::new_v4();
        let soldiers = vec![
            soldier(s, Some(at - Duration::days(10))),
            soldier(s, Some(at - Duration::days(90))),
            soldier(s, Some(at - Duration::days(91))),
            soldier(s, None),
        ];
        let c = personnel_subscore(&soldiers, &[], at, &ScoringParams::default());
        assert!((c.value - 0.5).abs() < 1e-9);
        assert!(!c.degraded);
    }

    #[test]
    fn test_personnel_certification_counts_unless_expired() {
        let at = date(2026, 6, 1);
        let s = Uuid::new_v4();
        let a = soldier(s, None);
        let b = soldier(s, None);
        let certs = vec![
            Certification {
                id: Uuid::new_v4(),
                soldier_id: a.id,
                settlement_id: s,
                kind: "marksman".to_string(),
                issued_on: Some(at - Duration::days(20)),
                expires_on: None,
            },
            Certification {
                id: Uuid::new_v4(),
                soldier_id: b.id,
                settlement_id: s,
                kind: "marksman".to_string(),
                issued_on: Some(at - Duration::days(20)),
                expires_on: Some(at - Duration::days(1)),
            },
        ];
        let c = personnel_subscore(&[a, b], &certs, at, &ScoringParams::default());
        assert!((c.value - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_personnel_inactive_excluded() {
        let at = date(2026, 6, 1);
        let s = Uuid::new_v4();
        let mut retired = soldier(s, None);
        retired.active = false;
        let current = soldier(s, Some(at));
        let c = personnel_subscore(&[retired, current], &[], at, &ScoringParams::default());
        assert_eq!(c.value, 1.0);
    }

    #[test]
    fn test_components_all_operational() {
        let all: Vec<_> = ComponentKind::TRACKED
            .iter()
            .map(|&k| component(k, Some(true), Some(true)))
            .collect();
        let c = components_subscore(&all);
        assert_eq!(c.value, 1.0);
        assert!(!c.degraded);
    }

    #[test]
    fn test_components_missing_kinds_stay_in_denominator() {
        let some = vec![
            component(ComponentKind::Fence, Some(true), Some(true)),
            component(ComponentKind::Armory, Some(true), Some(false)),
            component(ComponentKind::CommandCenter, None, Some(true)),
        ];
        let c = components_subscore(&some);
        assert!((c.value - 1.0 / 6.0).abs() < 1e-9);
        assert!(c.degraded);
    }

    #[test]
    fn test_training_recency_weighting() {
        let at = date(2026, 6, 1);
        let s = Uuid::new_v4();
        let events: Vec<_> = [0, 45, 200]
            .iter()
            .map(|&age| TrainingEvent {
                id: Uuid::new_v4(),
                settlement_id: s,
                kind: TrainingKind::Drill,
                held_on: Some(at - Duration::days(age)),
                participants: 8,
            })
            .collect();
        // 1.0 + 0.5 + 0.0 over an expected cadence of 6
        let c = training_subscore(&events, at, &ScoringParams::default());
        assert!((c.value - 0.25).abs() < 1e-9);
        assert!(!c.degraded);
    }

    #[test]
    fn test_training_saturates() {
        let at = date(2026, 6, 1);
        let events: Vec<_> = (0..20)
            .map(|_| TrainingEvent {
                id: Uuid::new_v4(),
                settlement_id: Uuid::nil(),
                kind: TrainingKind::RangeSession,
                held_on: Some(at),
                participants: 4,
            })
            .collect();
        assert_eq!(training_subscore(&events, at, &ScoringParams::default()).value, 1.0);
    }

    #[test]
    fn test_risk_factors_normalised() {
        let at = date(2026, 6, 1);
        let s = settlement(Some(5), Some(0.25));
        let inspections = vec![
            Inspection {
                id: Uuid::new_v4(),
                settlement_id: s.id,
                inspected_on: date(2026, 1, 1),
                findings_total: Some(10),
                findings_failed: Some(10),
            },
            Inspection {
                id: Uuid::new_v4(),
                settlement_id: s.id,
                inspected_on: date(2026, 5, 1),
                findings_total: Some(10),
                findings_failed: Some(2),
            },
        ];
        let incidents = vec![
            Incident {
                id: Uuid::new_v4(),
                settlement_id: s.id,
                reported_on: date(2026, 5, 20),
                severity: IncidentSeverity::Medium,
                resolved_on: None,
            },
            Incident {
                id: Uuid::new_v4(),
                settlement_id: s.id,
                reported_on: date(2026, 5, 2),
                severity: IncidentSeverity::Low,
                resolved_on: Some(date(2026, 5, 3)),
            },
        ];
        let r = risk_factors(&s, &inspections, &incidents, at, &ScoringParams::default());
        assert_eq!(r.threat, 1.0);
        assert!((r.response - 0.75).abs() < 1e-9);
        assert!((r.infra - 0.2).abs() < 1e-9);
        assert!((r.incidents - 0.2).abs() < 1e-9);
        assert!(!r.degraded);
    }

    #[test]
    fn test_risk_missing_data_worst_case() {
        let s = settlement(None, Some(f64::NAN));
        let r = risk_factors(&s, &[], &[], date(2026, 6, 1), &ScoringParams::default());
        assert_eq!(r.threat, 0.0);
        assert_eq!(r.response, 0.0);
        assert_eq!(r.infra, 0.0);
        assert!(r.degraded);
    }

    #[test]
    fn test_risk_malformed_inspection_degraded() {
        let s = settlement(Some(3), Some(0.5));
        let bad = Inspection {
            id: Uuid::new_v4(),
            settlement_id: s.id,
            inspected_on: date(2026, 5, 1),
            findings_total: Some(2),
            findings_failed: Some(5),
        };
        let r = risk_factors(&s, &[bad], &[], date(2026, 6, 1), &ScoringParams::default());
        assert_eq!(r.infra, 0.0);
        assert!(r.degraded);
    }

    #[tokio::test]
    async fn test_lookback_overflow_degrades_training() {
        let s = settlement(Some(1), Some(1.0));
        let store = Arc::new(bastion_db::MemoryRecordStore::default());
        let params = ScoringParams { training_lookback_days: 200_000_000, ..Default::default() };
        let collector = MetricCollector::new(store, params);

        let score = collector.collect(MetricDomain::Training, &s, date(2026, 6, 1)).await;
        assert_eq!(score, DomainScore::Training(Collected::worst_case()));
    }

    #[test]
    fn test_personnel_huge_validity_window() {
        let at = date(2026, 6, 1);
        let s = Uuid::new_v4();
        let params = ScoringParams { personnel_validity_days: i64::MAX, ..Default::default() };
        let soldiers = [soldier(s, Some(date(1990, 1, 1)))];
        assert_eq!(personnel_subscore(&soldiers, &[], at, &params), Collected::complete(1.0));
    }

    #[test]
    fn test_domain_records_dispatch() {
        let records = DomainRecords::Components { components: vec![] };
        assert_eq!(records.domain(), MetricDomain::Components);
        let score = records.score(date(2026, 6, 1), &ScoringParams::default());
        assert_eq!(score, DomainScore::Components(Collected::worst_case()));
    }
}
