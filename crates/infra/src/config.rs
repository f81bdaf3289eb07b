//! Configuration loading and representation.
//!
//! Values come from the environment; command-line flags override them in the
//! binary.

use std::path::PathBuf;

use stockledger_inventory::DEFAULT_LOW_STOCK_THRESHOLD;

use crate::file_store::{DEFAULT_INVENTORY_FILE, JsonFileStore};

/// Path of the inventory file.
pub const FILE_VAR: &str = "STOCKLEDGER_FILE";
/// Low-stock threshold (positive number).
pub const THRESHOLD_VAR: &str = "STOCKLEDGER_LOW_STOCK_THRESHOLD";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub inventory_file: PathBuf,
    pub low_stock_threshold: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            inventory_file: PathBuf::from(DEFAULT_INVENTORY_FILE),
            low_stock_threshold: DEFAULT_LOW_STOCK_THRESHOLD,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (the environment, or a map in tests).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let inventory_file = lookup(FILE_VAR)
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.inventory_file);

        let low_stock_threshold = match lookup(THRESHOLD_VAR) {
            None => defaults.low_stock_threshold,
            Some(raw) => parse_threshold(&raw).unwrap_or_else(|e| {
                tracing::warn!(
                    "{THRESHOLD_VAR}: {e}; using default {}",
                    defaults.low_stock_threshold
                );
                defaults.low_stock_threshold
            }),
        };

        Self {
            inventory_file,
            low_stock_threshold,
        }
    }

    pub fn store(&self) -> JsonFileStore {
        JsonFileStore::new(&self.inventory_file)
    }
}

/// Parse a low-stock threshold: a finite number above zero.
///
/// Shared by the environment lookup and the `--threshold` flag.
pub fn parse_threshold(raw: &str) -> Result<f64, String> {
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() && v > 0.0 => Ok(v),
        _ => Err(format!("{raw:?} is not a positive number")),
    }
}
