//! Trait for persisted weight configuration.
//!
//! A single durable record, not per settlement, read and written as a whole.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use bastion_common::{BastionError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::weights::WeightSet;

/// The persisted form of the weight set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightRecord {
    pub weights: WeightSet,
    /// Bumped on every save; keys the score cache
    pub version: u64,
    pub updated_at: DateTime<Utc>,
    pub updated_by: Option<String>,
}

/// Durable storage for the weight record.
///
/// Implementations can use:
/// - a JSON file on local disk
/// - the hosted backend's settings table (remote)
/// - an in-memory slot (testing)
#[async_trait]
pub trait WeightBackend: Send + Sync {
    /// Current record, or `None` if weights were never saved.
    async fn read(&self) -> Result<Option<WeightRecord>>;

    /// Replace the record in full.
    async fn write(&self, record: &WeightRecord) -> Result<()>;
}

// ── JSON file backend ────────────────────────────────────────────────────────

pub struct JsonFileWeightBackend {
    path: PathBuf,
}

impl JsonFileWeightBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl WeightBackend for JsonFileWeightBackend {
    async fn read(&self) -> Result<Option<WeightRecord>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => Ok(Some(serde_json::from_str(&content)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn write(&self, record: &WeightRecord) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let content = serde_json::to_string_pretty(record)?;

        // Write beside the target then rename so readers never see a partial record.
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, content).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

// ── Mock Implementation for Testing ────────────────────────────────────────

/// In-memory backend with switchable failures.
#[derive(Default)]
pub struct MockWeightBackend {
    record: RwLock<Option<WeightRecord>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl MockWeightBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record(record: WeightRecord) -> Self {
        Self {
            record: RwLock::new(Some(record)),
            ..Default::default()
        }
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Stored record, bypassing failure injection.
    pub async fn stored(&self) -> Option<WeightRecord> {
        self.record.read().await.clone()
    }
}

#[async_trait]
impl WeightBackend for MockWeightBackend {
    async fn read(&self) -> Result<Option<WeightRecord>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(BastionError::Persistence("weight backend unreachable".to_string()));
        }
        Ok(self.record.read().await.clone())
    }

    async fn write(&self, record: &WeightRecord) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(BastionError::Persistence("weight backend rejected write".to_string()));
        }
        *self.record.write().await = Some(record.clone());
        Ok(())
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn record(version: u64) -> WeightRecord {
        WeightRecord {
            weights: WeightSet::default(),
            version,
            updated_at: Utc::now(),
            updated_by: Some("a-01".to_string()),
        }
    }

    #[tokio::test]
    async fn test_json_file_missing_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let backend = JsonFileWeightBackend::new(dir.path().join("weights.json"));
        assert!(backend.read().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_json_file_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let backend = JsonFileWeightBackend::new(dir.path().join("nested").join("weights.json"));
        let rec = record(3);
        backend.write(&rec).await.unwrap();
        assert_eq!(backend.read().await.unwrap(), Some(rec));
        assert!(!dir.path().join("nested").join("weights.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_json_file_corrupt_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("weights.json");
        std::fs::write(&path, "{ not json").unwrap();
        let backend = JsonFileWeightBackend::new(path);
        assert!(matches!(backend.read().await, Err(BastionError::Serialization(_))));
    }

    #[tokio::test]
    async fn test_mock_failures() {
        let backend = MockWeightBackend::with_record(record(1));
        backend.set_fail_reads(true);
        assert!(backend.read().await.is_err());
        backend.set_fail_writes(true);
        assert!(backend.write(&record(2)).await.is_err());
        assert_eq!(backend.stored().await.map(|r| r.version), Some(1));
    }
}
