//! # clinic-store
//!
//! Persisted client-side storage for the clinic portal, backed by SQLite.
//!
//! The portal only keeps small string values here (the session credential
//! among them), so the schema is a single versioned key/value table.

pub mod database;
pub mod kv;
pub mod migrations;
pub mod storage;

mod error;

pub use database::Database;
pub use error::StoreError;
pub use storage::{KeyValueStorage, MemoryStorage, SqliteStorage};
