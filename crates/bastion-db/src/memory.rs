//! In-memory record store seeded from a JSON snapshot.

use async_trait::async_trait;
use bastion_common::entities::{
    Certification, Incident, Inspection, SecurityComponent, Settlement, Soldier, TrainingEvent,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{DbError, Result};
use crate::query::RecordQuery;
use crate::store::RecordStore;

/// Every table the scoring engine reads, as one serializable document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordSnapshot {
    #[serde(default)]
    pub settlements: Vec<Settlement>,
    #[serde(default)]
    pub soldiers: Vec<Soldier>,
    #[serde(default)]
    pub certifications: Vec<Certification>,
    #[serde(default)]
    pub components: Vec<SecurityComponent>,
    #[serde(default)]
    pub inspections: Vec<Inspection>,
    #[serde(default)]
    pub incidents: Vec<Incident>,
    #[serde(default)]
    pub training_events: Vec<TrainingEvent>,
}

/// Record store holding a snapshot behind an async lock.
#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    snapshot: RwLock<RecordSnapshot>,
}

impl MemoryRecordStore {
    pub fn new(snapshot: RecordSnapshot) -> Self {
        Self {
            snapshot: RwLock::new(snapshot),
        }
    }

    /// Load a snapshot exported from the backend.
    pub async fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await?;
        let snapshot: RecordSnapshot = serde_json::from_str(&content)?;
        tracing::info!(
            path = %path.display(),
            settlements = snapshot.settlements.len(),
            soldiers = snapshot.soldiers.len(),
            "Loaded record snapshot"
        );
        Ok(Self::new(snapshot))
    }

    /// Apply a mutation to the held snapshot.
    pub async fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut RecordSnapshot),
    {
        let mut guard = self.snapshot.write().await;
        f(&mut guard);
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn settlements(&self) -> Result<Vec<Settlement>> {
        let mut out = self.snapshot.read().await.settlements.clone();
        out.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(out)
    }

    async fn settlement(&self, id: Uuid) -> Result<Settlement> {
        self.snapshot
            .read()
            .await
            .settlements
            .iter()
            .find(|s| s.id == id)
            .cloned()
            .ok_or_else(|| DbError::NotFound(format!("settlement {id}")))
    }

    async fn soldiers(&self, query: &RecordQuery) -> Result<Vec<Soldier>> {
        query.apply(&self.snapshot.read().await.soldiers)
    }

    async fn certifications(&self, query: &RecordQuery) -> Result<Vec<Certification>> {
        query.apply(&self.snapshot.read().await.certifications)
    }

    async fn components(&self, query: &RecordQuery) -> Result<Vec<SecurityComponent>> {
        query.apply(&self.snapshot.read().await.components)
    }

    async fn inspections(&self, query: &RecordQuery) -> Result<Vec<Inspection>> {
        query.apply(&self.snapshot.read().await.inspections)
    }

    async fn incidents(&self, query: &RecordQuery) -> Result<Vec<Incident>> {
        query.apply(&self.snapshot.read().await.incidents)
    }

    async fn training_events(&self, query: &RecordQuery) -> Result<Vec<TrainingEvent>> {
        query.apply(&self.snapshot.read().await.training_events)
    }
}
