//! Scoring parameters for the readiness engine.
//!
//! Collector windows, normalisation caps, attention tier thresholds and the
//! weight validation policy. Loadable from YAML/JSON or embedded in `bastion.toml`.

use serde::{Deserialize, Serialize};

use crate::error::{BastionError, Result};

/// Longest accepted collector window, in days.
pub const MAX_WINDOW_DAYS: i64 = 36_500;

/// Complete scoring parameter set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoringParams {
    /// Days a range session or certification keeps a soldier current
    #[serde(default = "default_validity_days")]
    pub personnel_validity_days: i64,

    /// Lookback window for training recency
    #[serde(default = "default_lookback_days")]
    pub training_lookback_days: i64,

    /// Training events expected per lookback window
    #[serde(default = "default_expected_events")]
    pub expected_training_events: f64,

    /// Open incident count at which the incident factor saturates
    #[serde(default = "default_incident_saturation")]
    pub incident_saturation: u32,

    /// Attention tier thresholds on the 0-100 priority scale
    #[serde(default)]
    pub tiers: TierThresholds,

    /// What `save` does with a weight group that does not sum to 1.0
    #[serde(default)]
    pub validation_policy: ValidationPolicy,

    /// Per-settlement record fetch timeout
    #[serde(default = "default_fetch_timeout_ms")]
    pub fetch_timeout_ms: u64,

    /// Maximum memoized score cards
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: u64,
}

fn default_validity_days() -> i64 { 90 }
fn default_lookback_days() -> i64 { 90 }
fn default_expected_events() -> f64 { 6.0 }
fn default_incident_saturation() -> u32 { 5 }
fn default_fetch_timeout_ms() -> u64 { 5_000 }
fn default_cache_capacity() -> u64 { 1_024 }

impl Default for ScoringParams {
    fn default() -> Self {
        Self {
            personnel_validity_days: default_validity_days(),
            training_lookback_days: default_lookback_days(),
            expected_training_events: default_expected_events(),
            incident_saturation: default_incident_saturation(),
            tiers: TierThresholds::default(),
            validation_policy: ValidationPolicy::default(),
            fetch_timeout_ms: default_fetch_timeout_ms(),
            cache_capacity: default_cache_capacity(),
        }
    }
}

// ── Tier thresholds ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TierThresholds {
    #[serde(default = "default_critical")]
    pub critical: f64,
    #[serde(default = "default_elevated")]
    pub elevated: f64,
}

fn default_critical() -> f64 { 70.0 }
fn default_elevated() -> f64 { 45.0 }

impl Default for TierThresholds {
    fn default() -> Self {
        Self {
            critical: default_critical(),
            elevated: default_elevated(),
        }
    }
}

// ── Validation policy ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ValidationPolicy {
    /// Flag non-summing groups and save anyway
    #[default]
    Warn,
    /// Refuse to save while any group is flagged
    Block,
}

// ── Helper Methods ─────────────────────────────────────────────────────────────

impl ScoringParams {
    /// Reject parameter sets the collectors cannot work with.
    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_WINDOW_DAYS).contains(&self.personnel_validity_days) {
            return Err(BastionError::Config(format!(
                "personnel_validity_days must be between 1 and {MAX_WINDOW_DAYS}"
            )));
        }
        if !(1..=MAX_WINDOW_DAYS).contains(&self.training_lookback_days) {
            return Err(BastionError::Config(format!(
                "training_lookback_days must be between 1 and {MAX_WINDOW_DAYS}"
            )));
        }
        if !(self.expected_training_events > 0.0) {
            return Err(BastionError::Config("expected_training_events must be positive".into()));
        }
        if self.incident_saturation == 0 {
            return Err(BastionError::Config("incident_saturation must be at least 1".into()));
        }
        if self.tiers.elevated > self.tiers.critical {
            return Err(BastionError::Config(format!(
                "elevated threshold ({}) exceeds critical threshold ({})",
                self.tiers.elevated, self.tiers.critical
            )));
        }
        Ok(())
    }

    /// Load from YAML file
    pub fn from_yaml(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let params: Self = serde_yaml::from_str(&content)
            .map_err(|e| BastionError::Config(format!("{path}: {e}")))?;
        params.validate()?;
        Ok(params)
    }

    /// Load from JSON file
    pub fn from_json(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let params: Self = serde_json::from_str(&content)?;
        params.validate()?;
        Ok(params)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
