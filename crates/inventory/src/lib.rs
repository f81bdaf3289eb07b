//! Inventory domain module: the stock ledger.
//!
//! This crate contains the business rules for tracking item quantities,
//! implemented as deterministic in-memory logic (no file IO). Loading and
//! saving live in `stockledger-infra`.

pub mod item;
pub mod ledger;

pub use item::{ItemName, Quantity};
pub use ledger::{DEFAULT_LOW_STOCK_THRESHOLD, RemoveOutcome, StockLedger, StockReport};
