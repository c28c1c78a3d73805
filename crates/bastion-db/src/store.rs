//! Trait for record store access.
//!
//! The scoring engine reads settlement-defense records through this
//! abstraction so it stays independent of the hosted backend.

use async_trait::async_trait;
use bastion_common::entities::{
    Certification, Incident, Inspection, SecurityComponent, Settlement, Soldier, TrainingEvent,
};
use uuid::Uuid;

use crate::error::Result;
use crate::query::RecordQuery;

/// Read access to the settlement-defense tables.
///
/// Implementations can use:
/// - the hosted backend's REST interface (remote)
/// - a JSON snapshot held in memory (local, tests)
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// All settlements in scope, ordered by name.
    async fn settlements(&self) -> Result<Vec<Settlement>>;

    /// A single settlement. Fails with `DbError::NotFound` if unknown.
    async fn settlement(&self, id: Uuid) -> Result<Settlement>;

    async fn soldiers(&self, query: &RecordQuery) -> Result<Vec<Soldier>>;

    async fn certifications(&self, query: &RecordQuery) -> Result<Vec<Certification>>;

    async fn components(&self, query: &RecordQuery) -> Result<Vec<SecurityComponent>>;

    async fn inspections(&self, query: &RecordQuery) -> Result<Vec<Inspection>>;

    async fn incidents(&self, query: &RecordQuery) -> Result<Vec<Incident>>;

    async fn training_events(&self, query: &RecordQuery) -> Result<Vec<TrainingEvent>>;
}
