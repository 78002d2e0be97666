//! SQLite storage implementation for the keyed store.

mod model;
mod repository;

#[cfg(test)]
mod repository_tests;

pub use model::AppStoreEntryDB;
pub use repository::SqliteStore;

// Re-export trait from core for convenience
pub use fundpilot_core::store::KeyValueStoreTrait;
