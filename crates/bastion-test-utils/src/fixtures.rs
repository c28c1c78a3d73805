//! Builders for settlement record fixtures.

use bastion_common::entities::{
    Certification, ComponentKind, Incident, IncidentSeverity, Inspection, SecurityComponent,
    Settlement, Soldier, TrainingEvent, TrainingKind,
};
use bastion_db::RecordSnapshot;
use chrono::{Duration, NaiveDate};
use uuid::Uuid;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid fixture date")
}

/// Accumulates one settlement's records relative to a reference day.
pub struct SettlementFixture {
    pub settlement: Settlement,
    at: NaiveDate,
    soldiers: Vec<Soldier>,
    certifications: Vec<Certification>,
    components: Vec<SecurityComponent>,
    inspections: Vec<Inspection>,
    incidents: Vec<Incident>,
    training_events: Vec<TrainingEvent>,
}

impl SettlementFixture {
    pub fn new(name: &str, at: NaiveDate) -> Self {
        Self {
            settlement: Settlement {
                id: Uuid::new_v4(),
                name: name.to_string(),
                region: Some("Binyamin".to_string()),
                threat_level: Some(1),
                response_capability: Some(1.0),
            },
            at,
            soldiers: vec![],
            certifications: vec![],
            components: vec![],
            inspections: vec![],
            incidents: vec![],
            training_events: vec![],
        }
    }

    pub fn id(&self) -> Uuid {
        self.settlement.id
    }

    pub fn threat(mut self, level: Option<u8>, response_capability: Option<f64>) -> Self {
        self.settlement.threat_level = level;
        self.settlement.response_capability = response_capability;
        self
    }

    /// Active soldier whose last range session was `days_ago` days before the reference day.
    pub fn soldier_ranged(mut self, days_ago: Option<i64>) -> Self {
        self.soldiers.push(Soldier {
            id: Uuid::new_v4(),
            settlement_id: self.settlement.id,
            full_name: format!("Soldier {}", self.soldiers.len() + 1),
            active: true,
            last_range_date: days_ago.map(|d| self.at - Duration::days(d)),
        });
        self
    }

    pub fn certified(mut self, days_ago: i64) -> Self {
        let soldier = Soldier {
            id: Uuid::new_v4(),
            settlement_id: self.settlement.id,
            full_name: format!("Soldier {}", self.soldiers.len() + 1),
            active: true,
            last_range_date: None,
        };
        self.certifications.push(Certification {
            id: Uuid::new_v4(),
            soldier_id: soldier.id,
            settlement_id: self.settlement.id,
            kind: "marksman".to_string(),
            issued_on: Some(self.at - Duration::days(days_ago)),
            expires_on: None,
        });
        self.soldiers.push(soldier);
        self
    }

    pub fn component(mut self, kind: ComponentKind, present: bool, operational: bool) -> Self {
        self.components.push(SecurityComponent {
            id: Uuid::new_v4(),
            settlement_id: self.settlement.id,
            kind,
            present: Some(present),
            operational: Some(operational),
            updated_on: Some(self.at),
        });
        self
    }

    /// Every tracked component present and operational.
    pub fn fully_equipped(self) -> Self {
        ComponentKind::TRACKED
            .iter()
            .fold(self, |f, &kind| f.component(kind, true, true))
    }

    pub fn training(mut self, kind: TrainingKind, days_ago: i64) -> Self {
        self.training_events.push(TrainingEvent {
            id: Uuid::new_v4(),
            settlement_id: self.settlement.id,
            kind,
            held_on: Some(self.at - Duration::days(days_ago)),
            participants: 10,
        });
        self
    }

    pub fn inspection(mut self, days_ago: i64, total: u32, failed: u32) -> Self {
        self.inspections.push(Inspection {
            id: Uuid::new_v4(),
            settlement_id: self.settlement.id,
            inspected_on: self.at - Duration::days(days_ago),
            findings_total: Some(total),
            findings_failed: Some(failed),
        });
        self
    }

    pub fn open_incident(mut self, days_ago: i64) -> Self {
        self.incidents.push(Incident {
            id: Uuid::new_v4(),
            settlement_id: self.settlement.id,
            reported_on: self.at - Duration::days(days_ago),
            severity: IncidentSeverity::Medium,
            resolved_on: None,
        });
        self
    }

    /// Append this settlement's rows to a snapshot.
    pub fn into_snapshot(self, snapshot: &mut RecordSnapshot) {
        snapshot.settlements.push(self.settlement);
        snapshot.soldiers.extend(self.soldiers);
        snapshot.certifications.extend(self.certifications);
        snapshot.components.extend(self.components);
        snapshot.inspections.extend(self.inspections);
        snapshot.incidents.extend(self.incidents);
        snapshot.training_events.extend(self.training_events);
    }
}

/// Build a snapshot from several fixtures.
pub fn snapshot_of(fixtures: impl IntoIterator<Item = SettlementFixture>) -> RecordSnapshot {
    let mut snapshot = RecordSnapshot::default();
    for f in fixtures {
        f.into_snapshot(&mut snapshot);
    }
    snapshot
}
