//! # storage-adapters
//!
//! Entity store implementations of the `domains` ports.
//! The memory store is always compiled; SQLite is behind `db-sqlite`.

pub mod memory;
#[cfg(feature = "db-sqlite")]
pub mod sqlite;

pub use memory::MemoryStore;
#[cfg(feature = "db-sqlite")]
pub use sqlite::SqliteStore;
