//! bastion-common: Shared types, errors, and access rules used across all Bastion crates.

pub mod access;
pub mod entities;
pub mod error;
pub mod scoring_config;

// Re-export commonly used types
pub use access::{Capability, Principal, Role};
pub use error::{BastionError, Result};
pub use scoring_config::{ScoringParams, TierThresholds, ValidationPolicy};
