//! Shared fixtures and record store doubles for Bastion tests.

pub mod fixtures;
pub mod stores;

pub use fixtures::{date, snapshot_of, SettlementFixture};
pub use stores::{FailingRecordStore, SlowRecordStore, Table};
