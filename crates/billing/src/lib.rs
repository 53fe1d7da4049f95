//! Billing domain module.
//!
//! Business rules for quotes, invoices, order confirmations and delivery notes:
//! totals calculation, the status lifecycle, overdue classification, dunning
//! escalation and payments. Deterministic domain logic only (no IO, no clock,
//! no storage); callers pass `today` explicitly and persist the returned
//! replacement records.

pub mod document;
pub mod dunning;
pub mod error;
pub mod overdue;
pub mod payment;
pub mod totals;

pub use document::{
    ChangeStatus, Document, DocumentCommand, DocumentEvent, DocumentStatus, DocumentType,
    DraftDocument, DunningLevel, DunningNoticeSent, DunningRecord, ItemsRepriced, MarkOverdue,
    PaymentRecorded, RecordPayment, Reprice, SendDunning, StatusChanged, convert_to_invoice,
    reprice, transition,
};
pub use dunning::{MAX_DUNNING_LEVEL, escalate_dunning};
pub use error::{BillingError, BillingResult, DunningError, PaymentError};
pub use overdue::{
    AgingBucket, OverdueStatus, business_date, classify_overdue, days_overdue, days_until_due,
    mark_overdue,
};
pub use payment::{record_payment, settle_in_full};
pub use totals::{DocumentItem, Totals, compute_totals, round_money};
