//! Record store doubles that fail or stall on chosen settlements.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bastion_common::entities::{
    Certification, Incident, Inspection, SecurityComponent, Settlement, Soldier, TrainingEvent,
};
use bastion_db::{DbError, RecordQuery, RecordStore, Result};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Soldiers,
    Certifications,
    Components,
    Inspections,
    Incidents,
    TrainingEvents,
}

/// Delegates to an inner store but fails reads of chosen tables for chosen settlements.
pub struct FailingRecordStore {
    inner: Arc<dyn RecordStore>,
    failures: HashSet<(Uuid, Table)>,
}

impl FailingRecordStore {
    pub fn new(inner: Arc<dyn RecordStore>) -> Self {
        Self {
            inner,
            failures: HashSet::new(),
        }
    }

    pub fn fail(mut self, settlement_id: Uuid, table: Table) -> Self {
        self.failures.insert((settlement_id, table));
        self
    }

    fn check(&self, query: &RecordQuery, table: Table) -> Result<()> {
        match query.settlement_id {
            Some(id) if self.failures.contains(&(id, table)) => {
                Err(DbError::Backend(format!("{table:?} unavailable for {id}")))
            }
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl RecordStore for FailingRecordStore {
    async fn settlements(&self) -> Result<Vec<Settlement>> {
        self.inner.settlements().await
    }

    async fn settlement(&self, id: Uuid) -> Result<Settlement> {
        self.inner.settlement(id).await
    }

    async fn soldiers(&self, query: &RecordQuery) -> Result<Vec<Soldier>> {
        self.check(query, Table::Soldiers)?;
        self.inner.soldiers(query).await
    }

    async fn certifications(&self, query: &RecordQuery) -> Result<Vec<Certification>> {
        self.check(query, Table::Certifications)?;
        self.inner.certifications(query).await
    }

    async fn components(&self, query: &RecordQuery) -> Result<Vec<SecurityComponent>> {
        self.check(query, Table::Components)?;
        self.inner.components(query).await
    }

    async fn inspections(&self, query: &RecordQuery) -> Result<Vec<Inspection>> {
        self.check(query, Table::Inspections)?;
        self.inner.inspections(query).await
    }

    async fn incidents(&self, query: &RecordQuery) -> Result<Vec<Incident>> {
        self.check(query, Table::Incidents)?;
        self.inner.incidents(query).await
    }

    async fn training_events(&self, query: &RecordQuery) -> Result<Vec<TrainingEvent>> {
        self.check(query, Table::TrainingEvents)?;
        self.inner.training_events(query).await
    }
}

/// Delegates to an inner store but sleeps before serving chosen settlements.
pub struct SlowRecordStore {
    inner: Arc<dyn RecordStore>,
    slow: HashSet<Uuid>,
    delay: Duration,
}

impl SlowRecordStore {
    pub fn new(inner: Arc<dyn RecordStore>, delay: Duration) -> Self {
        Self {
            inner,
            slow: HashSet::new(),
            delay,
        }
    }

    pub fn slow_for(mut self, settlement_id: Uuid) -> Self {
        self.slow.insert(settlement_id);
        self
    }

    async fn stall(&self, query: &RecordQuery) {
        if query.settlement_id.is_some_and(|id| self.slow.contains(&id)) {
            tokio::time::sleep(self.delay).await;
        }
    }
}

#[async_trait]
impl RecordStore for SlowRecordStore {
    async fn settlements(&self) -> Result<Vec<Settlement>> {
        self.inner.settlements().await
    }

    async fn settlement(&self, id: Uuid) -> Result<Settlement> {
        self.inner.settlement(id).await
    }

    async fn soldiers(&self, query: &RecordQuery) -> Result<Vec<Soldier>> {
        self.stall(query).await;
        self.inner.soldiers(query).await
    }

    async fn certifications(&self, query: &RecordQuery) -> Result<Vec<Certification>> {
        self.stall(query).await;
        self.inner.certifications(query).await
    }

    async fn components(&self, query: &RecordQuery) -> Result<Vec<SecurityComponent>> {
        self.stall(query).await;
        self.inner.components(query).await
    }

    async fn inspections(&self, query: &RecordQuery) -> Result<Vec<Inspection>> {
        self.stall(query).await;
        self.inner.inspections(query).await
    }

    async fn incidents(&self, query: &RecordQuery) -> Result<Vec<Incident>> {
        self.stall(query).await;
        self.inner.incidents(query).await
    }

    async fn training_events(&self, query: &RecordQuery) -> Result<Vec<TrainingEvent>> {
        self.stall(query).await;
        self.inner.training_events(query).await
    }
}
