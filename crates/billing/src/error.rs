//! Billing error model.

use thiserror::Error;

use crate::document::{DocumentStatus, DocumentType};

pub type BillingResult<T> = Result<T, BillingError>;

/// Typed failure of a billing operation.
///
/// Every variant is recoverable: the caller corrects its input and retries.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BillingError {
    /// Malformed numeric field (negative quantity/price, rate out of range, overflow).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The invoice already carries the final dunning notice.
    #[error("dunning level already at maximum ({max})")]
    AlreadyMaxLevel { max: u8 },

    /// Dunning was requested for a document that is not classified overdue.
    #[error("document is not overdue")]
    NotOverdue,

    /// The status lifecycle does not permit the requested change.
    #[error("invalid transition: {0}")]
    InvalidTransition(String),

    /// A payment would push `paid_amount` below zero or above `total_amount`.
    #[error("overpayment: {0}")]
    Overpayment(String),
}

/// Failure of a dunning escalation.
pub type DunningError = BillingError;

/// Failure of a payment booking.
pub type PaymentError = BillingError;

impl BillingError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn overpayment(msg: impl Into<String>) -> Self {
        Self::Overpayment(msg.into())
    }

    pub fn transition(doc_type: DocumentType, from: DocumentStatus, to: DocumentStatus) -> Self {
        Self::InvalidTransition(format!("{doc_type}: {from} -> {to} is not permitted"))
    }

    pub fn frozen(status: DocumentStatus) -> Self {
        Self::InvalidTransition(format!("document is {status} and can no longer change"))
    }
}
