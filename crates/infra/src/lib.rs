//! Infrastructure layer: inventory file persistence and configuration.

pub mod config;
pub mod file_store;

pub use config::{Config, parse_threshold};
pub use file_store::{DEFAULT_INVENTORY_FILE, JsonFileStore, LoadOutcome, StoreError};
