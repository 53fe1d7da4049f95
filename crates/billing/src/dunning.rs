//! Dunning escalation.
//!
//! Escalation is an explicit operator action, one level at a time:
//! 0 (none) -> 1 (first notice) -> 2 (second notice) -> 3 (final notice).

use chrono::NaiveDate;

use werkbank_core::Aggregate;

use crate::document::{Document, DocumentCommand, DunningLevel, SendDunning};
use crate::error::DunningError;

/// Highest dunning level (final notice / collections handoff).
pub const MAX_DUNNING_LEVEL: u8 = DunningLevel::FINAL.get();

/// Send the next dunning notice for `invoice` as of `today`.
///
/// Fails with `AlreadyMaxLevel` at level 3 and with `NotOverdue` unless the
/// invoice is classified overdue. On success the returned record has the
/// level raised by one, a new [`crate::DunningRecord`] appended and status
/// `gemahnt`.
pub fn escalate_dunning(invoice: &Document, today: NaiveDate) -> Result<Document, DunningError> {
    let (next, _) = invoice.execute(&DocumentCommand::SendDunning(SendDunning { today }))?;
    Ok(next)
}
