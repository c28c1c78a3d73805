/// Core record types for the settlement-defense tables.
/// These are Rust representations of the rows served by the record store.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Settlement
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Settlement {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub region: Option<String>,
    /// Intelligence threat rating, 1 (low) to 5 (severe)
    #[serde(default)]
    pub threat_level: Option<u8>,
    /// Assessed response capability in [0, 1]
    #[serde(default)]
    pub response_capability: Option<f64>,
}

// ---------------------------------------------------------------------------
// Personnel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Soldier {
    pub id: Uuid,
    pub settlement_id: Uuid,
    pub full_name: String,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default)]
    pub last_range_date: Option<NaiveDate>,
}

fn default_active() -> bool { true }

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Certification {
    pub id: Uuid,
    pub soldier_id: Uuid,
    pub settlement_id: Uuid,
    pub kind: String, // e.g. first_aid, marksman, squad_lead
    #[serde(default)]
    pub issued_on: Option<NaiveDate>,
    #[serde(default)]
    pub expires_on: Option<NaiveDate>,
}

// ---------------------------------------------------------------------------
// Security components
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum ComponentKind {
    Fence,
    CommandCenter,
    Armory,
    ArmoredVehicle,
    CommunicationsHub,
    DefensivePosture,
}

impl ComponentKind {
    /// Every component kind the defense module tracks per settlement.
    pub const TRACKED: [ComponentKind; 6] = [
        ComponentKind::Fence,
        ComponentKind::CommandCenter,
        ComponentKind::Armory,
        ComponentKind::ArmoredVehicle,
        ComponentKind::CommunicationsHub,
        ComponentKind::DefensivePosture,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentKind::Fence => "fence",
            ComponentKind::CommandCenter => "command_center",
            ComponentKind::Armory => "armory",
            ComponentKind::ArmoredVehicle => "armored_vehicle",
            ComponentKind::CommunicationsHub => "communications_hub",
            ComponentKind::DefensivePosture => "defensive_posture",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SecurityComponent {
    pub id: Uuid,
    pub settlement_id: Uuid,
    pub kind: ComponentKind,
    #[serde(default)]
    pub present: Option<bool>,
    #[serde(default)]
    pub operational: Option<bool>,
    #[serde(default)]
    pub updated_on: Option<NaiveDate>,
}

// ---------------------------------------------------------------------------
// Inspections and incidents
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Inspection {
    pub id: Uuid,
    pub settlement_id: Uuid,
    pub inspected_on: NaiveDate,
    #[serde(default)]
    pub findings_total: Option<u32>,
    #[serde(default)]
    pub findings_failed: Option<u32>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum IncidentSeverity {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Incident {
    pub id: Uuid,
    pub settlement_id: Uuid,
    pub reported_on: NaiveDate,
    pub severity: IncidentSeverity,
    #[serde(default)]
    pub resolved_on: Option<NaiveDate>,
}

impl Incident {
    /// An incident is open until it carries a resolution date on or before `at`.
    pub fn is_open(&self, at: NaiveDate) -> bool {
        match self.resolved_on {
            Some(resolved) => resolved > at,
            None => true,
        }
    }
}

// ---------------------------------------------------------------------------
// Training
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TrainingKind {
    Training,
    Drill,
    RangeSession,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrainingEvent {
    pub id: Uuid,
    pub settlement_id: Uuid,
    pub kind: TrainingKind,
    #[serde(default)]
    pub held_on: Option<NaiveDate>,
    #[serde(default)]
    pub participants: u32,
}
