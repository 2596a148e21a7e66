//! SQLite persistence for the picbox service.
//!
//! [`SqliteStore`] is the single storage backend: it owns the connection,
//! applies schema migrations on open, and exposes entity CRUD, credential
//! lookup, and session-token persistence. Every mutation that pairs a
//! uniqueness check with an insert runs inside one transaction, so two
//! concurrent requests cannot both pass a duplicate check.
//!
//! # Modules
//!
//! - [`error`]: [`StorageError`] enum with all failure modes
//! - [`schema`]: migration setup and connection pragmas
//! - [`sqlite`]: the [`SqliteStore`] implementation

pub mod error;
pub mod schema;
pub mod sqlite;

pub use error::StorageError;
pub use sqlite::SqliteStore;
