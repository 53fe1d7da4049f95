//! Payment booking.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use werkbank_core::Aggregate;

use crate::document::{Document, DocumentCommand, RecordPayment};
use crate::error::PaymentError;

/// Book `amount` against `invoice`.
///
/// A negative amount corrects an earlier booking. When the paid amount reaches
/// the total the invoice becomes `bezahlt` and its dunning level is frozen.
pub fn record_payment(
    invoice: &Document,
    amount: Decimal,
    paid_on: NaiveDate,
) -> Result<Document, PaymentError> {
    let (next, _) =
        invoice.execute(&DocumentCommand::RecordPayment(RecordPayment { amount, paid_on }))?;
    Ok(next)
}

/// Book the full outstanding amount ("mark as paid").
pub fn settle_in_full(invoice: &Document, paid_on: NaiveDate) -> Result<Document, PaymentError> {
    record_payment(invoice, invoice.outstanding_amount(), paid_on)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::test_support::*;
    use crate::document::{DocumentStatus, DocumentType, reprice, transition};
    use crate::dunning::escalate_dunning;
    use crate::overdue::classify_overdue;
    use crate::error::BillingError;
    use crate::totals::DocumentItem;
    use rust_decimal_macros::dec;

    #[test]
    fn partial_payment_keeps_invoice_open() {
        let paid = record_payment(&open_invoice(), dec!(1000), date(2026, 9, 10)).unwrap();

        assert_eq!(paid.paid_amount(), dec!(1000));
        assert_eq!(paid.outstanding_amount(), dec!(7032.50));
        assert_eq!(paid.status(), DocumentStatus::Open);
        assert_eq!(paid.paid_on(), None);
    }

    #[test]
    fn paying_to_total_marks_invoice_paid() {
        let first = record_payment(&open_invoice(), dec!(32.50), date(2026, 9, 10)).unwrap();
        let second = record_payment(&first, dec!(8000), date(2026, 9, 12)).unwrap();

        assert_eq!(second.paid_amount(), second.total_amount());
        assert_eq!(second.status(), DocumentStatus::Paid);
        assert_eq!(second.paid_on(), Some(date(2026, 9, 12)));
    }

    #[test]
    fn payment_on_dunned_invoice_freezes_level() {
        let dunned = escalate_dunning(&open_invoice(), date(2026, 9, 30)).unwrap();
        let paid = settle_in_full(&dunned, date(2026, 10, 2)).unwrap();

        assert_eq!(paid.status(), DocumentStatus::Paid);
        assert_eq!(paid.dunning_level(), dunned.dunning_level());
        assert_eq!(paid.dunning_history(), dunned.dunning_history());
    }

    #[test]
    fn cannot_overpay_invoice() {
        let err = record_payment(&open_invoice(), dec!(8032.51), date(2026, 9, 10)).unwrap_err();
        assert!(matches!(err, BillingError::Overpayment(msg) if msg.contains("exceed")));
    }

    #[test]
    fn correction_cannot_go_below_zero() {
        let paid = record_payment(&open_invoice(), dec!(100), date(2026, 9, 10)).unwrap();

        let corrected = record_payment(&paid, dec!(-40), date(2026, 9, 11)).unwrap();
        assert_eq!(corrected.paid_amount(), dec!(60));

        let err = record_payment(&corrected, dec!(-60.01), date(2026, 9, 12)).unwrap_err();
        assert!(matches!(err, BillingError::Overpayment(msg) if msg.contains("negative")));
    }

    #[test]
    fn zero_payment_is_invalid_input() {
        let err = record_payment(&open_invoice(), dec!(0), date(2026, 9, 10)).unwrap_err();
        assert!(matches!(err, BillingError::InvalidInput(_)));
    }

    /// Open invoice whose 100% discount leaves nothing to pay.
    fn fully_discounted_invoice() -> Document {
        let items = vec![DocumentItem::new("Garantiearbeit", dec!(2), "Std", dec!(65)).unwrap()];
        let invoice =
            reprice(&open_invoice(), items, dec!(100), dec!(19), date(2026, 9, 2)).unwrap();
        assert_eq!(invoice.total_amount(), dec!(0));
        invoice
    }

    #[test]
    fn zero_total_invoice_can_be_settled() {
        let invoice = fully_discounted_invoice();

        let paid = settle_in_full(&invoice, date(2026, 9, 3)).unwrap();
        assert_eq!(paid.status(), DocumentStatus::Paid);
        assert_eq!(paid.paid_on(), Some(date(2026, 9, 3)));

        let err = record_payment(&invoice, dec!(0.01), date(2026, 9, 3)).unwrap_err();
        assert!(matches!(err, BillingError::Overpayment(_)));
    }

    #[test]
    fn zero_total_invoice_is_never_overdue_or_dunned() {
        let invoice = fully_discounted_invoice();

        assert!(!classify_overdue(&invoice, date(2026, 9, 30)).is_overdue);
        let err = escalate_dunning(&invoice, date(2026, 9, 30)).unwrap_err();
        assert_eq!(err, BillingError::NotOverdue);
    }

    #[test]
    fn paid_invoice_is_immutable() {
        let paid = settle_in_full(&open_invoice(), date(2026, 9, 10)).unwrap();

        let err = record_payment(&paid, dec!(-10), date(2026, 9, 11)).unwrap_err();
        assert!(matches!(err, BillingError::InvalidTransition(_)));

        let err = transition(&paid, DocumentStatus::Cancelled, date(2026, 9, 11)).unwrap_err();
        assert!(matches!(err, BillingError::InvalidTransition(_)));
    }

    #[test]
    fn drafts_and_quotes_do_not_accept_payments() {
        let draft = draft_of(DocumentType::Invoice, Some(date(2026, 9, 15)));
        let err = record_payment(&draft, dec!(10), date(2026, 9, 10)).unwrap_err();
        assert!(matches!(err, BillingError::InvalidTransition(_)));

        let quote = draft_of(DocumentType::Quote, None);
        let quote = transition(&quote, DocumentStatus::Open, date(2026, 9, 1)).unwrap();
        let err = record_payment(&quote, dec!(10), date(2026, 9, 10)).unwrap_err();
        assert!(matches!(err, BillingError::InvalidTransition(_)));
    }
}
