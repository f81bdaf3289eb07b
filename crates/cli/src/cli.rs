use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use stockledger_infra::parse_threshold;

#[derive(Parser, Debug)]
#[command(
    name = "stockledger",
    about = "Track item quantities in a JSON inventory file",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Inventory file (overrides STOCKLEDGER_FILE)
    #[arg(short, long, global = true)]
    pub file: Option<PathBuf>,

    /// Low-stock threshold, a positive number (overrides STOCKLEDGER_LOW_STOCK_THRESHOLD)
    #[arg(short, long, global = true, value_parser = parse_threshold)]
    pub threshold: Option<f64>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the sample restock session (default)
    Demo,
    /// Add stock for an item
    Add(ChangeArgs),
    /// Remove stock from an item
    Remove(ChangeArgs),
    /// Show the quantity of one item
    Query(QueryArgs),
    /// List items below the low-stock threshold
    LowStock,
    /// Print every item and its quantity
    Report,
}

#[derive(Args, Debug)]
pub struct ChangeArgs {
    pub item: String,
    /// Quantity; validated before it reaches the ledger
    pub quantity: String,
}

#[derive(Args, Debug)]
pub struct QueryArgs {
    pub item: String,
}
