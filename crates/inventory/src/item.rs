use serde::{Serialize, Serializer};
use serde_json::Value as JsonValue;

use stockledger_core::{DomainError, DomainResult, ValueObject};

/// Largest magnitude at which every whole `f64` is exactly representable.
const MAX_EXACT_WHOLE: f64 = 9_007_199_254_740_992.0;

/// Name of a stocked item (the ledger key).
///
/// Stored verbatim; must contain at least one non-whitespace character.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(into = "String")]
pub struct ItemName(String);

impl ItemName {
    pub fn new(name: impl Into<String>) -> DomainResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("item name cannot be empty"));
        }
        Ok(Self(name))
    }

    /// Validate an untyped value (deserialized data, demo input).
    pub fn from_value(value: &JsonValue) -> DomainResult<Self> {
        match value {
            JsonValue::String(s) => Self::new(s.as_str()),
            other => Err(DomainError::validation(format!(
                "invalid item name type: {other}"
            ))),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl ValueObject for ItemName {}

impl core::borrow::Borrow<str> for ItemName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for ItemName {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<ItemName> for String {
    fn from(value: ItemName) -> Self {
        value.0
    }
}

/// Stock quantity: a finite, strictly positive amount.
///
/// Zero is not a quantity; an item that would drop to zero leaves the ledger.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd)]
pub struct Quantity(f64);

impl Quantity {
    pub fn new(amount: f64) -> DomainResult<Self> {
        if !amount.is_finite() {
            return Err(DomainError::validation(format!(
                "quantity must be a finite number, got {amount}"
            )));
        }
        if amount <= 0.0 {
            return Err(DomainError::validation(format!(
                "non-positive quantity {amount}"
            )));
        }
        Ok(Self(amount))
    }

    /// Validate an untyped value. Text is rejected, never coerced.
    pub fn from_value(value: &JsonValue) -> DomainResult<Self> {
        match value.as_f64() {
            Some(amount) => Self::new(amount),
            None => Err(DomainError::validation(format!(
                "invalid quantity type: {value}"
            ))),
        }
    }

    /// Parse a quantity from a command-line argument.
    pub fn parse(input: &str) -> DomainResult<Self> {
        let amount: f64 = input
            .trim()
            .parse()
            .map_err(|_| DomainError::validation(format!("invalid quantity: {input:?}")))?;
        Self::new(amount)
    }

    pub fn get(self) -> f64 {
        self.0
    }

    pub fn checked_add(self, other: Quantity) -> DomainResult<Self> {
        let sum = self.0 + other.0;
        if !sum.is_finite() {
            return Err(DomainError::invariant("quantity overflow"));
        }
        Ok(Self(sum))
    }

    /// Subtract, returning `None` when nothing would remain.
    pub fn checked_sub(self, other: Quantity) -> Option<Self> {
        let rest = self.0 - other.0;
        (rest > 0.0).then_some(Self(rest))
    }

    fn as_whole(self) -> Option<i64> {
        (self.0.fract() == 0.0 && self.0 <= MAX_EXACT_WHOLE).then_some(self.0 as i64)
    }
}

impl ValueObject for Quantity {}

impl core::fmt::Display for Quantity {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.as_whole() {
            Some(whole) => write!(f, "{whole}"),
            None => write!(f, "{}", self.0),
        }
    }
}

// Whole amounts are written as JSON integers so files stay integer-valued.
impl Serialize for Quantity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.as_whole() {
            Some(whole) => serializer.serialize_i64(whole),
            None => serializer.serialize_f64(self.0),
        }
    }
}
