//! SQLite storage implementation for Fundpilot.
//!
//! This crate provides all database-related functionality using Diesel ORM with SQLite.
//! It implements the keyed-store trait defined in `fundpilot-core` and contains:
//! - Database connection pooling and management
//! - Diesel migrations
//! - The `app_store` repository
//!
//! # Architecture
//!
//! This crate is the only place in the application where Diesel dependencies exist.
//! The core crate is database-agnostic and works with `KeyValueStoreTrait`.
//!
//! ```text
//!     core (domain)
//!          │
//!          ▼
//!  storage-sqlite (this crate)
//!          │
//!          ▼
//!      SQLite DB
//! ```

pub mod db;
pub mod errors;
pub mod schema;
pub mod store;

// Re-export database utilities
pub use db::{
    create_pool, get_connection, get_db_path, init, run_migrations, spawn_writer, DbConnection,
    DbPool, WriteHandle,
};

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};
pub use store::SqliteStore;

// Re-export from fundpilot-core for convenience
pub use fundpilot_core::errors::{DatabaseError, Error, Result};
