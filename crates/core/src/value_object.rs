//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects carry no identity: two line items with the same description,
/// quantity and price are the same line item. They are immutable; to "change"
/// one, build a new value.
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq, Eq)]
/// struct Totals {
///     subtotal: Decimal,
///     total_amount: Decimal,
/// }
///
/// impl ValueObject for Totals {}
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
