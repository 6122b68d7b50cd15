//! Infrastructure layer: configuration, backend clients, function services.

pub mod config;
pub mod services;
pub mod store;

pub use config::{ConfigError, InventoryCollections, PageLimits, Settings, StoreSettings};
pub use store::{DocumentStore, HttpBackend, InMemoryBackend, StoreError, TeamDirectory};
