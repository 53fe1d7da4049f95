//! Overdue classification.
//!
//! All arithmetic is on calendar dates. Timestamps are reduced to the date in
//! their own zone, and day differences are taken between noon anchors so a
//! DST switch can never shave an hour off a whole day.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use serde::{Deserialize, Serialize};

use werkbank_core::Aggregate;

use crate::document::{Document, DocumentCommand, DocumentStatus, DocumentType, MarkOverdue};
use crate::error::BillingResult;

/// Result of [`classify_overdue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverdueStatus {
    pub is_overdue: bool,
    pub days_overdue: i64,
}

impl OverdueStatus {
    pub const CURRENT: OverdueStatus = OverdueStatus {
        is_overdue: false,
        days_overdue: 0,
    };
}

fn at_noon(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::from_hms_opt(12, 0, 0).unwrap_or_default())
}

/// Calendar date of `instant` in its own time zone.
pub fn business_date<Tz: TimeZone>(instant: &DateTime<Tz>) -> NaiveDate {
    instant.date_naive()
}

fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    at_noon(to).signed_duration_since(at_noon(from)).num_days()
}

/// `max(0, today - due_date)` in whole days; 0 without a due date.
pub fn days_overdue(due_date: Option<NaiveDate>, today: NaiveDate) -> i64 {
    due_date
        .map(|due| days_between(due, today).max(0))
        .unwrap_or(0)
}

/// Days left until the due date (negative once past due), `None` without one.
pub fn days_until_due(document: &Document, today: NaiveDate) -> Option<i64> {
    document.due_date().map(|due| days_between(today, due))
}

/// Classify `document` as of `today`.
///
/// Only invoices can be overdue, and only while they are issued and something
/// is still outstanding: drafts, paid and cancelled invoices never are.
pub fn classify_overdue(document: &Document, today: NaiveDate) -> OverdueStatus {
    if document.doc_type() != DocumentType::Invoice {
        return OverdueStatus::CURRENT;
    }
    if matches!(
        document.status(),
        DocumentStatus::Paid | DocumentStatus::Draft | DocumentStatus::Cancelled
    ) {
        return OverdueStatus::CURRENT;
    }
    if document.outstanding_amount().is_zero() {
        return OverdueStatus::CURRENT;
    }

    let days = days_overdue(document.due_date(), today);
    OverdueStatus {
        is_overdue: days > 0,
        days_overdue: days,
    }
}

/// Move an `offen` invoice that is past due to `ueberfaellig`.
///
/// Returns the unchanged document when there is nothing to flag.
pub fn mark_overdue(document: &Document, today: NaiveDate) -> BillingResult<Document> {
    let (next, _) = document.execute(&DocumentCommand::MarkOverdue(MarkOverdue { today }))?;
    Ok(next)
}

/// Receivables aging bucket by days past due.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgingBucket {
    NotDue,
    Days1To30,
    Days31To60,
    Days61To90,
    Over90,
}

impl AgingBucket {
    pub const ALL: [AgingBucket; 5] = [
        AgingBucket::NotDue,
        AgingBucket::Days1To30,
        AgingBucket::Days31To60,
        AgingBucket::Days61To90,
        AgingBucket::Over90,
    ];

    pub fn from_days_overdue(days: i64) -> Self {
        match days {
            i64::MIN..=0 => AgingBucket::NotDue,
            1..=30 => AgingBucket::Days1To30,
            31..=60 => AgingBucket::Days31To60,
            61..=90 => AgingBucket::Days61To90,
            _ => AgingBucket::Over90,
        }
    }
}
