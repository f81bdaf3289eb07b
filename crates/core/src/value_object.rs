//! Value object trait: equality by value, not identity.
//!
//! Value objects are domain objects that have **no identity**. They are defined
//! entirely by their attribute values, so two item names with the same text are
//! the same item, and two quantities with the same amount are interchangeable.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**. To "modify" one,
/// build a new one (e.g. `Quantity::checked_sub` returns a fresh quantity).
///
/// Implementors validate on construction, so holding a value object means the
/// value already satisfies its domain rules:
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq)]
/// struct Quantity(f64);
///
/// impl ValueObject for Quantity {}
///
/// let q = Quantity::new(3.0)?;      // validated once
/// assert_eq!(q, Quantity::new(3.0)?); // equal by value
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
