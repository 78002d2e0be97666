//! Keyed store abstraction.
//!
//! The application persists a handful of whole JSON documents under fixed
//! keys (see [`crate::constants::store_keys`]). The store only offers
//! get/set-whole-value semantics per key.

mod json_codec;
mod memory_store;
mod store_traits;

pub use json_codec::{load_json, save_json};
pub use memory_store::InMemoryStore;
pub use store_traits::KeyValueStoreTrait;
