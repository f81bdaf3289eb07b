use std::io::Write;

use anyhow::Context;
use serde_json::json;

use stockledger_infra::{Config, JsonFileStore};
use stockledger_inventory::{Quantity, StockLedger};

use crate::cli::*;

/// Effective settings: environment first, then command-line overrides.
struct Session {
    store: JsonFileStore,
    threshold: f64,
}

impl Session {
    fn new(cli: &Cli) -> Self {
        let mut config = Config::from_env();
        if let Some(file) = &cli.file {
            config.inventory_file = file.clone();
        }
        if let Some(threshold) = cli.threshold {
            config.low_stock_threshold = threshold;
        }
        Self {
            store: config.store(),
            threshold: config.low_stock_threshold,
        }
    }

    fn open(&self) -> StockLedger {
        let mut ledger = StockLedger::new();
        self.store.load_into(&mut ledger);
        ledger
    }

    fn save(&self, ledger: &StockLedger) -> anyhow::Result<()> {
        self.store
            .save(ledger)
            .with_context(|| format!("could not save inventory to {}", self.store.path().display()))
    }
}

pub fn run_command(cli: Cli, out: &mut dyn Write) -> anyhow::Result<()> {
    let session = Session::new(&cli);
    match cli.command.unwrap_or(Command::Demo) {
        Command::Demo => cmd_demo(&session, out),
        Command::Add(args) => cmd_add(&session, args, out),
        Command::Remove(args) => cmd_remove(&session, args, out),
        Command::Query(args) => cmd_query(&session, args, out),
        Command::LowStock => cmd_low_stock(&session, out),
        Command::Report => cmd_report(&session, out),
    }
}

/// Sample session: restock, sell, then report.
fn cmd_demo(session: &Session, out: &mut dyn Write) -> anyhow::Result<()> {
    let mut ledger = session.open();

    ledger.add("apple", 10.0);
    ledger.add("banana", 2.0);
    ledger.add_value(&json!(123), &json!("ten"));
    ledger.remove("apple", 3.0);
    ledger.remove("orange", 1.0);

    writeln!(out, "Apple stock: {}", ledger.quantity("apple"))?;
    writeln!(out, "Low items: {:?}", low_stock_names(&ledger, session.threshold))?;

    session.save(&ledger)?;

    write_report(&ledger, out)
}

// Rejected updates skip the save, so a corrupt file is left for repair.
fn cmd_add(session: &Session, args: ChangeArgs, out: &mut dyn Write) -> anyhow::Result<()> {
    let Some(quantity) = parse_quantity(&args.item, &args.quantity) else {
        return Ok(());
    };
    let mut ledger = session.open();
    if let Some(entry) = ledger.add(&args.item, quantity) {
        session.save(&ledger)?;
        writeln!(out, "{entry}")?;
    }
    Ok(())
}

fn cmd_remove(session: &Session, args: ChangeArgs, out: &mut dyn Write) -> anyhow::Result<()> {
    let Some(quantity) = parse_quantity(&args.item, &args.quantity) else {
        return Ok(());
    };
    let mut ledger = session.open();
    if ledger.remove(&args.item, quantity).is_some() {
        session.save(&ledger)?;
        writeln!(out, "{}: {}", args.item, ledger.quantity(&args.item))?;
    }
    Ok(())
}

fn cmd_query(session: &Session, args: QueryArgs, out: &mut dyn Write) -> anyhow::Result<()> {
    let ledger = session.open();
    writeln!(out, "{}: {}", args.item, ledger.quantity(&args.item))?;
    Ok(())
}

fn cmd_low_stock(session: &Session, out: &mut dyn Write) -> anyhow::Result<()> {
    let ledger = session.open();
    for name in ledger.low_stock(session.threshold) {
        writeln!(out, "{name}")?;
    }
    Ok(())
}

fn cmd_report(session: &Session, out: &mut dyn Write) -> anyhow::Result<()> {
    let ledger = session.open();
    write_report(&ledger, out)
}

fn write_report(ledger: &StockLedger, out: &mut dyn Write) -> anyhow::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", ledger.report())?;
    Ok(())
}

fn low_stock_names(ledger: &StockLedger, threshold: f64) -> Vec<String> {
    ledger
        .low_stock(threshold)
        .into_iter()
        .map(String::from)
        .collect()
}

// Bad quantities are warnings, like any other rejected update.
fn parse_quantity(item: &str, raw: &str) -> Option<f64> {
    match Quantity::parse(raw) {
        Ok(quantity) => Some(quantity.get()),
        Err(err) => {
            tracing::warn!(item, error = %err, "rejected inventory update");
            None
        }
    }
}
