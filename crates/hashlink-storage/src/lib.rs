//! Durable tier implementations for the URL store.

pub mod memory;
pub mod mysql;
pub mod unavailable;

pub use hashlink_core::{DurableTable, PutOutcome, StorageError};
pub use memory::InMemoryTable;
pub use mysql::MySqlTable;
pub use unavailable::UnavailableTable;
