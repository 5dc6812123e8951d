/// State management module
///
/// This module handles all application state, including:
/// - The catalog data model (data.rs)
/// - Demonstration seed items (seed.rs)
/// - Key-value slot persistence (storage.rs)
/// - The item store and its change listeners (store.rs)

pub mod data;
pub mod seed;
pub mod storage;
pub mod store;

pub use data::{Item, NewItem, ITEM_TYPES};
pub use storage::SqliteStorage;
pub use store::{ItemStore, ListenerId, LoadOutcome, StoreError};
