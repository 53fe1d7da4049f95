//! Collection rate ("Beitreibungsquote").
//!
//! Share of recently invoiced volume that was paid in full on or before its
//! due date:
//!
//! ```text
//! rate = Σ total(invoices paid on time) / Σ total(invoices issued) * 100
//! ```
//!
//! over issued invoices dated within the trailing window `(today - window, today]`.

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;

use werkbank_billing::{Document, DocumentStatus, round_money};

pub const DEFAULT_COLLECTION_WINDOW_DAYS: i64 = 90;

fn in_window(doc: &Document, today: NaiveDate, window_days: i64) -> bool {
    let window_start = today - Duration::days(window_days);
    doc.date() > window_start && doc.date() <= today
}

fn paid_on_time(doc: &Document) -> bool {
    match (doc.status(), doc.paid_on(), doc.due_date()) {
        (DocumentStatus::Paid, Some(paid_on), Some(due)) => paid_on <= due,
        (DocumentStatus::Paid, _, None) => true,
        _ => false,
    }
}

/// Collection rate in percent (two decimals), `None` if nothing was invoiced
/// in the window.
pub fn collection_rate(
    documents: &[Document],
    today: NaiveDate,
    window_days: i64,
) -> Option<Decimal> {
    let mut invoiced = Decimal::ZERO;
    let mut collected = Decimal::ZERO;

    for doc in documents.iter().filter(|d| d.is_invoice()) {
        if matches!(doc.status(), DocumentStatus::Draft | DocumentStatus::Cancelled) {
            continue;
        }
        if !in_window(doc, today, window_days) {
            continue;
        }
        invoiced += doc.total_amount();
        if paid_on_time(doc) {
            collected += doc.total_amount();
        }
    }

    if invoiced.is_zero() {
        return None;
    }
    Some(round_money(collected / invoiced * Decimal::ONE_HUNDRED))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::*;
    use rust_decimal_macros::dec;
    use werkbank_billing::{record_payment, settle_in_full, transition};

    #[test]
    fn no_invoices_means_no_rate() {
        assert_eq!(collection_rate(&[], date(2026, 10, 16), 90), None);
    }

    #[test]
    fn late_and_unpaid_invoices_lower_the_rate() {
        let today = date(2026, 10, 16);
        let on_time = settle_in_full(
            &issued_invoice(dec!(100), date(2026, 9, 1), date(2026, 9, 15)),
            date(2026, 9, 14),
        )
        .unwrap();
        let late = settle_in_full(
            &issued_invoice(dec!(100), date(2026, 9, 1), date(2026, 9, 15)),
            date(2026, 9, 20),
        )
        .unwrap();
        let partly = record_payment(
            &issued_invoice(dec!(100), date(2026, 9, 1), date(2026, 9, 15)),
            dec!(50),
            date(2026, 9, 10),
        )
        .unwrap();
        let unpaid = issued_invoice(dec!(100), date(2026, 9, 1), date(2026, 9, 15));

        let rate = collection_rate(&[on_time, late, partly, unpaid], today, 90);
        assert_eq!(rate, Some(dec!(25.00)));
    }

    #[test]
    fn invoices_outside_window_are_ignored() {
        let today = date(2026, 10, 16);
        let old_unpaid = issued_invoice(dec!(100), date(2026, 7, 18), date(2026, 8, 1));
        let recent_paid = settle_in_full(
            &issued_invoice(dec!(100), date(2026, 7, 19), date(2026, 8, 2)),
            date(2026, 8, 1),
        )
        .unwrap();

        assert_eq!(collection_rate(&[old_unpaid, recent_paid], today, 90), Some(dec!(100)));
    }

    #[test]
    fn drafts_cancellations_and_quotes_are_not_invoiced_volume() {
        let today = date(2026, 10, 16);
        let draft = invoice(dec!(100), date(2026, 10, 1), Some(date(2026, 10, 2)));
        let cancelled = transition(
            &issued_invoice(dec!(100), date(2026, 10, 1), date(2026, 10, 2)),
            DocumentStatus::Cancelled,
            date(2026, 10, 1),
        )
        .unwrap();
        let open_quote = issued(quote(dec!(100)));

        assert_eq!(collection_rate(&[draft, cancelled, open_quote], today, 90), None);
    }
}
