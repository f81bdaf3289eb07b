use std::collections::BTreeMap;

use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde_json::Value as JsonValue;

use stockledger_core::{DomainError, DomainResult};

use crate::item::{ItemName, Quantity};

/// Items strictly below this quantity count as low stock unless a caller
/// supplies its own threshold.
pub const DEFAULT_LOW_STOCK_THRESHOLD: f64 = 5.0;

/// In-memory stock ledger: item name -> quantity.
///
/// Every stored quantity is strictly positive. Mutations that would take an
/// item to zero or below remove the entry instead.
///
/// Rejected input never surfaces as an error from `add`/`remove`; it is logged
/// at warn level and the call is a no-op. The `try_*` variants expose the
/// typed rejection for callers that need it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct StockLedger {
    items: BTreeMap<ItemName, Quantity>,
}

/// Result of a successful removal.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum RemoveOutcome {
    /// Stock was reduced and the item is still listed.
    Reduced { remaining: Quantity },
    /// Stock reached zero (or below) and the item was dropped.
    Depleted,
}

impl StockLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add stock and return a timestamped confirmation, or `None` if the
    /// input was rejected.
    pub fn add(&mut self, item: &str, quantity: f64) -> Option<String> {
        log_rejection(self.try_add(item, quantity))
    }

    /// Add stock from untyped input (e.g. values read from JSON).
    pub fn add_value(&mut self, item: &JsonValue, quantity: &JsonValue) -> Option<String> {
        let checked = ItemName::from_value(item).and_then(|name| {
            let qty = Quantity::from_value(quantity)
                .map_err(|e| DomainError::validation(format!("{e} (item {name})")))?;
            self.add_item(name, qty)
        });
        log_rejection(checked)
    }

    pub fn try_add(&mut self, item: &str, quantity: f64) -> DomainResult<String> {
        let name = ItemName::new(item)?;
        let qty = Quantity::new(quantity)
            .map_err(|e| DomainError::validation(format!("{e} (item {name})")))?;
        self.add_item(name, qty)
    }

    /// Typed add: increments (or creates) the entry for `name`.
    pub fn add_item(&mut self, name: ItemName, quantity: Quantity) -> DomainResult<String> {
        let total = match self.items.get(&name) {
            Some(current) => current.checked_add(quantity)?,
            None => quantity,
        };

        let entry = format!(
            "{}: Added {quantity} of {name}",
            Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
        );
        tracing::info!(item = %name, quantity = %quantity, total = %total, "{entry}");

        self.items.insert(name, total);
        Ok(entry)
    }

    /// Remove stock, or `None` if the input was rejected.
    pub fn remove(&mut self, item: &str, quantity: f64) -> Option<RemoveOutcome> {
        log_rejection(self.try_remove(item, quantity))
    }

    /// Remove stock using untyped input.
    pub fn remove_value(&mut self, item: &JsonValue, quantity: &JsonValue) -> Option<RemoveOutcome> {
        let checked = ItemName::from_value(item).and_then(|name| {
            let qty = Quantity::from_value(quantity)
                .map_err(|e| DomainError::validation(format!("invalid removal: {e} (item {name})")))?;
            self.remove_item(name.as_str(), qty)
        });
        log_rejection(checked)
    }

    pub fn try_remove(&mut self, item: &str, quantity: f64) -> DomainResult<RemoveOutcome> {
        let qty = Quantity::new(quantity)
            .map_err(|e| DomainError::validation(format!("invalid removal: {e} (item {item})")))?;
        self.remove_item(item, qty)
    }

    /// Typed remove: quantity is validated, the item must be present.
    pub fn remove_item(&mut self, item: &str, quantity: Quantity) -> DomainResult<RemoveOutcome> {
        let current = self
            .items
            .get_mut(item)
            .ok_or_else(|| DomainError::not_found(item))?;

        match current.checked_sub(quantity) {
            Some(remaining) => {
                *current = remaining;
                tracing::info!(
                    item,
                    quantity = %quantity,
                    remaining = %remaining,
                    "Removed {quantity} of {item}, remaining {remaining}"
                );
                Ok(RemoveOutcome::Reduced { remaining })
            }
            None => {
                self.items.remove(item);
                tracing::info!(item, quantity = %quantity, "{item} removed completely from inventory");
                Ok(RemoveOutcome::Depleted)
            }
        }
    }

    /// Current quantity for `item`, zero when absent.
    pub fn quantity(&self, item: &str) -> f64 {
        self.items.get(item).map_or(0.0, |q| q.get())
    }

    /// Names of items with quantity strictly below `threshold`, sorted by name.
    pub fn low_stock(&self, threshold: f64) -> Vec<ItemName> {
        self.items
            .iter()
            .filter(|(_, qty)| qty.get() < threshold)
            .map(|(name, _)| name.clone())
            .collect()
    }

    pub fn report(&self) -> StockReport<'_> {
        StockReport { ledger: self }
    }

    /// Entries in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&ItemName, Quantity)> + '_ {
        self.items.iter().map(|(name, qty)| (name, *qty))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

impl FromIterator<(ItemName, Quantity)> for StockLedger {
    fn from_iter<T: IntoIterator<Item = (ItemName, Quantity)>>(iter: T) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

fn log_rejection<T>(result: DomainResult<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(DomainError::NotFound(item)) => {
            tracing::warn!(item = %item, "Attempted to remove non-existent item: {item}");
            None
        }
        Err(err) => {
            tracing::warn!(error = %err, "rejected inventory update");
            None
        }
    }
}

/// Human-readable inventory listing, sorted by item name.
#[derive(Debug, Clone, Copy)]
pub struct StockReport<'a> {
    ledger: &'a StockLedger,
}

impl core::fmt::Display for StockReport<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        writeln!(f, "=== Inventory Report ===")?;
        if self.ledger.is_empty() {
            writeln!(f, "No items in stock.")?;
        } else {
            for (name, qty) in self.ledger.iter() {
                writeln!(f, "{name}: {qty}")?;
            }
        }
        writeln!(f, "========================")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn names(items: &[ItemName]) -> Vec<&str> {
        items.iter().map(ItemName::as_str).collect()
    }

    #[test]
    fn add_then_remove_scenario() {
        let mut ledger = StockLedger::new();

        assert!(ledger.add("apple", 10.0).is_some());
        assert!(ledger.add("banana", 2.0).is_some());
        let outcome = ledger.remove("apple", 3.0).unwrap();

        assert_eq!(
            outcome,
            RemoveOutcome::Reduced {
                remaining: Quantity::new(7.0).unwrap()
            }
        );
        assert_eq!(ledger.quantity("apple"), 7.0);
        assert_eq!(ledger.quantity("banana"), 2.0);
        assert_eq!(names(&ledger.low_stock(DEFAULT_LOW_STOCK_THRESHOLD)), vec!["banana"]);
    }

    #[test]
    fn confirmation_mentions_quantity_and_item() {
        let mut ledger = StockLedger::new();
        let msg = ledger.add("apple", 10.0).unwrap();
        assert!(msg.ends_with(": Added 10 of apple"), "unexpected message: {msg}");
    }

    #[test]
    fn invalid_add_is_a_no_op() {
        let mut ledger = StockLedger::new();

        assert!(ledger.add("apple", 0.0).is_none());
        assert!(ledger.add("apple", -4.0).is_none());
        assert!(ledger.add("", 3.0).is_none());
        assert!(ledger.add_value(&json!(123), &json!("ten")).is_none());
        assert!(ledger.add_value(&json!("apple"), &json!("ten")).is_none());

        assert!(ledger.is_empty());
    }

    #[test]
    fn untyped_add_accepts_well_formed_values() {
        let mut ledger = StockLedger::new();
        assert!(ledger.add_value(&json!("pear"), &json!(4)).is_some());
        assert_eq!(ledger.quantity("pear"), 4.0);
    }

    #[test]
    fn removing_unknown_item_is_a_no_op() {
        let mut ledger = StockLedger::new();

        assert!(ledger.remove("orange", 1.0).is_none());
        assert!(matches!(
            ledger.try_remove("orange", 1.0),
            Err(DomainError::NotFound(item)) if item == "orange"
        ));
        assert!(ledger.is_empty());
    }

    #[test]
    fn invalid_removal_quantity_is_rejected_before_lookup() {
        let mut ledger = StockLedger::new();
        ledger.add("apple", 5.0);

        assert!(matches!(
            ledger.try_remove("apple", 0.0),
            Err(DomainError::Validation(_))
        ));
        assert!(ledger.remove_value(&json!("apple"), &json!("two")).is_none());
        assert_eq!(ledger.quantity("apple"), 5.0);
    }

    #[test]
    fn removing_all_stock_drops_the_entry() {
        let mut ledger = StockLedger::new();
        ledger.add("apple", 3.0);

        assert_eq!(ledger.remove("apple", 5.0), Some(RemoveOutcome::Depleted));
        assert_eq!(ledger.quantity("apple"), 0.0);
        assert!(ledger.is_empty());
    }

    #[test]
    fn low_stock_uses_strict_comparison_and_name_order() {
        let mut ledger = StockLedger::new();
        ledger.add("zucchini", 1.0);
        ledger.add("apple", 4.0);
        ledger.add("melon", 5.0);

        assert_eq!(names(&ledger.low_stock(5.0)), vec!["apple", "zucchini"]);
        assert!(ledger.low_stock(1.0).is_empty());
    }

    #[test]
    fn report_lists_items_sorted() {
        let mut ledger = StockLedger::new();
        ledger.add("banana", 2.0);
        ledger.add("apple", 7.0);

        assert_eq!(
            ledger.report().to_string(),
            "=== Inventory Report ===\napple: 7\nbanana: 2\n========================\n"
        );
    }

    #[test]
    fn report_on_empty_ledger_says_so() {
        let ledger = StockLedger::new();
        assert!(ledger.report().to_string().contains("No items in stock."));
    }

    #[test]
    fn serializes_as_flat_object() {
        let mut ledger = StockLedger::new();
        ledger.add("banana", 2.0);
        ledger.add("apple", 7.5);

        assert_eq!(
            serde_json::to_value(&ledger).unwrap(),
            json!({ "apple": 7.5, "banana": 2 })
        );
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: querying after any sequence of valid additions returns their sum.
        #[test]
        fn additions_accumulate(amounts in prop::collection::vec(1u32..10_000u32, 1..20)) {
            let mut ledger = StockLedger::new();
            let mut expected = 0.0;

            for amount in amounts {
                prop_assert!(ledger.add("widget", f64::from(amount)).is_some());
                expected += f64::from(amount);
            }

            prop_assert_eq!(ledger.quantity("widget"), expected);
        }

        /// Property: removal leaves exactly the difference, or drops the entry.
        #[test]
        fn removal_subtracts_or_depletes(stock in 1u32..10_000u32, taken in 1u32..20_000u32) {
            let mut ledger = StockLedger::new();
            ledger.add("widget", f64::from(stock));

            let outcome = ledger.remove("widget", f64::from(taken));

            if taken < stock {
                prop_assert_eq!(ledger.quantity("widget"), f64::from(stock - taken));
                let is_reduced = matches!(outcome, Some(RemoveOutcome::Reduced { .. }));
                prop_assert!(is_reduced);
            } else {
                prop_assert_eq!(ledger.quantity("widget"), 0.0);
                prop_assert_eq!(outcome, Some(RemoveOutcome::Depleted));
                prop_assert!(ledger.is_empty());
            }
        }
    }
}
