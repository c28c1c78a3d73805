//! Bastion record store layer
//!
//! The settlement-defense tables (settlements, soldiers, certifications,
//! security components, inspections, incidents, training events) live in a
//! hosted backend. This crate defines the read contract the scoring engine
//! consumes and an in-memory implementation seeded from a JSON snapshot.
//!
//! # Example
//!
//! ```rust,no_run
//! use bastion_db::{MemoryRecordStore, RecordQuery, RecordStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = MemoryRecordStore::from_json_file("./data/records.json").await?;
//!     for settlement in store.settlements().await? {
//!         let soldiers = store.soldiers(&RecordQuery::for_settlement(settlement.id)).await?;
//!         println!("{}: {} soldiers", settlement.name, soldiers.len());
//!     }
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod memory;
pub mod query;
pub mod store;

pub use error::{DbError, Result};
pub use memory::{MemoryRecordStore, RecordSnapshot};
pub use query::{Page, RecordQuery, SortOrder};
pub use store::RecordStore;
