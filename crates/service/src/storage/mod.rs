//! Storage abstractions for service layer
//!
//! `JsonMapStore` persists a small map as one JSON file; `LocalStorage` layers
//! browser-style string items and typed collections on top of it for the
//! local fallback backend.

pub mod json_map_store;
pub mod local_storage;

pub use local_storage::LocalStorage;
