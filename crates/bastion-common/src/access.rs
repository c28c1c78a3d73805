//! Roles and capabilities supplied by the authorization provider.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::str::FromStr;

use crate::error::BastionError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Driver,
    Commander,
    SettlementDefenseAdmin,
    SystemAdmin,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    ManageScoringWeights,
}

impl Role {
    pub fn capabilities(&self) -> &'static [Capability] {
        match self {
            Role::Driver | Role::Commander => &[],
            Role::SettlementDefenseAdmin | Role::SystemAdmin => &[Capability::ManageScoringWeights],
        }
    }
}

impl FromStr for Role {
    type Err = BastionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "driver" => Ok(Role::Driver),
            "commander" => Ok(Role::Commander),
            "settlement_defense_admin" => Ok(Role::SettlementDefenseAdmin),
            "system_admin" | "admin" => Ok(Role::SystemAdmin),
            other => Err(BastionError::Validation(format!("unknown role '{other}'"))),
        }
    }
}

/// The authenticated caller of an operation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Principal {
    pub user_id: String,
    pub roles: BTreeSet<Role>,
}

impl Principal {
    pub fn new(user_id: impl Into<String>, roles: impl IntoIterator<Item = Role>) -> Self {
        Self {
            user_id: user_id.into(),
            roles: roles.into_iter().collect(),
        }
    }

    pub fn capabilities(&self) -> BTreeSet<Capability> {
        self.roles
            .iter()
            .flat_map(|r| r.capabilities().iter().copied())
            .collect()
    }

    pub fn has_capability(&self, capability: Capability) -> bool {
        self.roles.iter().any(|r| r.capabilities().contains(&capability))
    }
}
