//! Money/tax calculator for document line items.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use werkbank_core::ValueObject;

use crate::error::{BillingError, BillingResult};

/// Round a monetary amount to cents, half away from zero.
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// One line of a document (a "Leistung" or material position).
///
/// Invariant: `total == round(quantity * unit_price, 2)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentItem {
    pub description: String,
    pub quantity: Decimal,
    /// Unit of measure as shown on the document (e.g. "Std", "m²", "Stk").
    pub unit: String,
    pub unit_price: Decimal,
    pub total: Decimal,
}

impl ValueObject for DocumentItem {}

impl DocumentItem {
    pub fn new(
        description: impl Into<String>,
        quantity: Decimal,
        unit: impl Into<String>,
        unit_price: Decimal,
    ) -> BillingResult<Self> {
        let total = line_total(quantity, unit_price)?;
        Ok(Self {
            description: description.into(),
            quantity,
            unit: unit.into(),
            unit_price,
            total,
        })
    }

    /// Copy of this item with `total` recomputed from quantity and price.
    pub fn repriced(&self) -> BillingResult<Self> {
        Ok(Self {
            total: line_total(self.quantity, self.unit_price)?,
            ..self.clone()
        })
    }
}

/// Financial totals of a document, each rounded to cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    pub subtotal: Decimal,
    pub discount_amount: Decimal,
    pub tax_amount: Decimal,
    pub total_amount: Decimal,
}

impl ValueObject for Totals {}

impl Totals {
    pub const ZERO: Totals = Totals {
        subtotal: Decimal::ZERO,
        discount_amount: Decimal::ZERO,
        tax_amount: Decimal::ZERO,
        total_amount: Decimal::ZERO,
    };

    /// Net amount the tax is levied on.
    pub fn taxable(&self) -> Decimal {
        self.subtotal - self.discount_amount
    }
}

fn line_total(quantity: Decimal, unit_price: Decimal) -> BillingResult<Decimal> {
    if quantity.is_sign_negative() && !quantity.is_zero() {
        return Err(BillingError::invalid_input("quantity must not be negative"));
    }
    if unit_price.is_sign_negative() && !unit_price.is_zero() {
        return Err(BillingError::invalid_input("unit_price must not be negative"));
    }
    let raw = quantity
        .checked_mul(unit_price)
        .ok_or_else(|| BillingError::invalid_input("line amount overflow"))?;
    Ok(round_money(raw))
}

fn check_rate(name: &str, rate: Decimal) -> BillingResult<()> {
    if rate < Decimal::ZERO || rate > Decimal::ONE_HUNDRED {
        return Err(BillingError::invalid_input(format!(
            "{name} must be between 0 and 100 (got {rate})"
        )));
    }
    Ok(())
}

/// Compute subtotal, discount, tax and total for `items`.
///
/// Line totals are derived from quantity and unit price (stored `total`
/// fields are not trusted) and rounded before summing, so the subtotal always
/// equals the sum of the printed line totals. Discount is applied before tax.
pub fn compute_totals(
    items: &[DocumentItem],
    discount_rate: Decimal,
    tax_rate: Decimal,
) -> BillingResult<Totals> {
    check_rate("discount_rate", discount_rate)?;
    check_rate("tax_rate", tax_rate)?;

    let mut subtotal = Decimal::ZERO;
    for item in items {
        subtotal = subtotal
            .checked_add(line_total(item.quantity, item.unit_price)?)
            .ok_or_else(|| BillingError::invalid_input("subtotal overflow"))?;
    }

    let discount_amount = percent_of(subtotal, discount_rate, "discount amount overflow")?;
    let taxable = subtotal - discount_amount;
    let tax_amount = percent_of(taxable, tax_rate, "tax amount overflow")?;
    let total_amount = taxable
        .checked_add(tax_amount)
        .ok_or_else(|| BillingError::invalid_input("total amount overflow"))?;

    Ok(Totals {
        subtotal,
        discount_amount,
        tax_amount,
        total_amount,
    })
}

/// `round(amount * rate / 100, 2)` without panicking on overflow.
fn percent_of(amount: Decimal, rate: Decimal, overflow: &str) -> BillingResult<Decimal> {
    amount
        .checked_mul(rate)
        .and_then(|v| v.checked_div(Decimal::ONE_HUNDRED))
        .map(round_money)
        .ok_or_else(|| BillingError::invalid_input(overflow))
}
