//! Receivables breakdowns: aging, per-customer balances and dunning levels.

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use werkbank_billing::{AgingBucket, Document, DocumentStatus, MAX_DUNNING_LEVEL, classify_overdue};
use werkbank_core::CustomerId;

fn open_receivables(documents: &[Document]) -> impl Iterator<Item = &Document> {
    documents
        .iter()
        .filter(|d| d.is_invoice() && d.status().is_receivable())
}

/// Outstanding receivables in one aging bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgingLine {
    pub bucket: AgingBucket,
    pub count: usize,
    pub outstanding: Decimal,
}

/// One line per [`AgingBucket`], in bucket order, including empty buckets.
pub fn receivables_by_age(documents: &[Document], today: NaiveDate) -> Vec<AgingLine> {
    let mut lines: Vec<AgingLine> = AgingBucket::ALL
        .iter()
        .map(|&bucket| AgingLine {
            bucket,
            count: 0,
            outstanding: Decimal::ZERO,
        })
        .collect();

    for doc in open_receivables(documents) {
        let bucket = AgingBucket::from_days_overdue(classify_overdue(doc, today).days_overdue);
        if let Some(line) = lines.iter_mut().find(|l| l.bucket == bucket) {
            line.count += 1;
            line.outstanding += doc.outstanding_amount();
        }
    }
    lines
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerBalance {
    pub customer_id: CustomerId,
    pub total_invoiced: Decimal,
    pub total_paid: Decimal,
    pub outstanding: Decimal,
    pub open_invoice_count: usize,
}

/// Per-customer invoice balances, largest outstanding first.
///
/// Drafts and cancelled invoices are not part of any balance.
pub fn customer_balances(documents: &[Document]) -> Vec<CustomerBalance> {
    let mut by_customer: HashMap<CustomerId, CustomerBalance> = HashMap::new();

    for doc in documents.iter().filter(|d| d.is_invoice()) {
        if matches!(doc.status(), DocumentStatus::Draft | DocumentStatus::Cancelled) {
            continue;
        }
        let balance = by_customer
            .entry(doc.customer_id())
            .or_insert_with(|| CustomerBalance {
                customer_id: doc.customer_id(),
                total_invoiced: Decimal::ZERO,
                total_paid: Decimal::ZERO,
                outstanding: Decimal::ZERO,
                open_invoice_count: 0,
            });
        balance.total_invoiced += doc.total_amount();
        balance.total_paid += doc.paid_amount();
        if doc.status().is_receivable() {
            balance.outstanding += doc.outstanding_amount();
            balance.open_invoice_count += 1;
        }
    }

    let mut balances: Vec<CustomerBalance> = by_customer.into_values().collect();
    balances.sort_by(|a, b| {
        b.outstanding
            .cmp(&a.outstanding)
            .then_with(|| a.customer_id.cmp(&b.customer_id))
    });
    balances
}

/// Open invoices per dunning level; index 0 is "no notice sent yet".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DunningOverview {
    pub counts: [usize; MAX_DUNNING_LEVEL as usize + 1],
}

impl DunningOverview {
    pub fn at_level(&self, level: u8) -> usize {
        self.counts.get(level as usize).copied().unwrap_or(0)
    }
}

pub fn dunning_overview(documents: &[Document]) -> DunningOverview {
    let mut overview = DunningOverview::default();
    for doc in open_receivables(documents) {
        overview.counts[doc.dunning_level().get() as usize] += 1;
    }
    overview
}
