use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use werkbank_billing::{Document, DocumentStatus, DocumentType, classify_overdue};
use werkbank_projects::{Project, ProjectStatus};

use crate::collection::{DEFAULT_COLLECTION_WINDOW_DAYS, collection_rate};

/// Company-wide figures shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    /// Σ total_amount of paid documents.
    pub total_revenue: Decimal,
    /// Σ outstanding amount of issued, unpaid invoices.
    pub open_invoices_amount: Decimal,
    pub overdue_count: usize,
    pub active_projects: usize,
    pub planning_projects: usize,
    /// Quotes awaiting a customer decision.
    pub open_proposals: usize,
    pub proposal_volume: Decimal,
    /// Percentage of recently invoiced volume paid on time; `None` when
    /// nothing was invoiced in the window.
    pub collection_rate: Option<Decimal>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardOptions {
    pub collection_window_days: i64,
}

impl Default for DashboardOptions {
    fn default() -> Self {
        Self {
            collection_window_days: DEFAULT_COLLECTION_WINDOW_DAYS,
        }
    }
}

/// Roll up `documents` and `projects` as of `today` with default options.
pub fn aggregate_dashboard_stats(
    documents: &[Document],
    projects: &[Project],
    today: NaiveDate,
) -> DashboardStats {
    aggregate_dashboard_stats_with(documents, projects, today, &DashboardOptions::default())
}

pub fn aggregate_dashboard_stats_with(
    documents: &[Document],
    projects: &[Project],
    today: NaiveDate,
    options: &DashboardOptions,
) -> DashboardStats {
    let mut total_revenue = Decimal::ZERO;
    let mut open_invoices_amount = Decimal::ZERO;
    let mut overdue_count = 0;
    let mut open_proposals = 0;
    let mut proposal_volume = Decimal::ZERO;

    for doc in documents {
        if doc.status() == DocumentStatus::Paid {
            total_revenue += doc.total_amount();
        }
        if doc.is_invoice() && doc.status().is_receivable() {
            open_invoices_amount += doc.outstanding_amount();
        }
        if classify_overdue(doc, today).is_overdue {
            overdue_count += 1;
        }
        if doc.doc_type() == DocumentType::Quote && doc.status() == DocumentStatus::Open {
            open_proposals += 1;
            proposal_volume += doc.total_amount();
        }
    }

    let count_projects =
        |status: ProjectStatus| projects.iter().filter(|p| p.status == status).count();

    DashboardStats {
        total_revenue,
        open_invoices_amount,
        overdue_count,
        active_projects: count_projects(ProjectStatus::Active),
        planning_projects: count_projects(ProjectStatus::Planning),
        open_proposals,
        proposal_volume,
        collection_rate: collection_rate(documents, today, options.collection_window_days),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::*;
    use rust_decimal_macros::dec;
    use crate::receivables::receivables_by_age;
    use proptest::prelude::*;
    use werkbank_billing::{escalate_dunning, record_payment, settle_in_full, transition};
    use werkbank_core::{CustomerId, ProjectId};

    fn project(status: ProjectStatus) -> Project {
        let mut p = Project::plan(ProjectId::new(), "Baustelle", CustomerId::new()).unwrap();
        p.status = status;
        p
    }

    #[test]
    fn empty_company_has_zero_stats() {
        let stats = aggregate_dashboard_stats(&[], &[], date(2026, 10, 16));
        assert_eq!(stats.total_revenue, dec!(0));
        assert_eq!(stats.open_invoices_amount, dec!(0));
        assert_eq!(stats.overdue_count, 0);
        assert_eq!(stats.open_proposals, 0);
        assert_eq!(stats.collection_rate, None);
    }

    #[test]
    fn rolls_up_mixed_portfolio() {
        let today = date(2026, 10, 16);

        // 1000 net + 19% = 1190.00, paid
        let paid = settle_in_full(
            &issued_invoice(dec!(1000), date(2026, 10, 1), date(2026, 10, 15)),
            date(2026, 10, 10),
        )
        .unwrap();
        // 500 net = 595.00, 200 paid, overdue since 2026-10-01
        let partly = record_payment(
            &issued_invoice(dec!(500), date(2026, 9, 17), date(2026, 10, 1)),
            dec!(200),
            date(2026, 10, 2),
        )
        .unwrap();
        // 100 net = 119.00, dunned
        let dunned = escalate_dunning(
            &issued_invoice(dec!(100), date(2026, 9, 1), date(2026, 9, 15)),
            today,
        )
        .unwrap();
        // not yet due
        let current = issued_invoice(dec!(50), date(2026, 10, 10), date(2026, 10, 24));
        // quotes
        let open_quote = issued(quote(dec!(2000)));
        let draft_quote = quote(dec!(9999));
        // draft invoice is ignored everywhere
        let draft_invoice = invoice(dec!(777), date(2026, 10, 1), Some(date(2026, 10, 2)));
        // cancelled invoice is ignored everywhere
        let cancelled = transition(
            &issued_invoice(dec!(300), date(2026, 9, 1), date(2026, 9, 2)),
            DocumentStatus::Cancelled,
            date(2026, 9, 3),
        )
        .unwrap();

        let documents = vec![
            paid,
            partly,
            dunned,
            current,
            open_quote,
            draft_quote,
            draft_invoice,
            cancelled,
        ];
        let projects = vec![
            project(ProjectStatus::Active),
            project(ProjectStatus::Active),
            project(ProjectStatus::Planning),
            project(ProjectStatus::Completed),
        ];

        let stats = aggregate_dashboard_stats(&documents, &projects, today);

        assert_eq!(stats.total_revenue, dec!(1190.00));
        // 395.00 + 119.00 + 59.50
        assert_eq!(stats.open_invoices_amount, dec!(573.50));
        assert_eq!(stats.overdue_count, 2);
        assert_eq!(stats.active_projects, 2);
        assert_eq!(stats.planning_projects, 1);
        assert_eq!(stats.open_proposals, 1);
        assert_eq!(stats.proposal_volume, dec!(2380.00));
    }

    #[test]
    fn overpaid_stored_record_contributes_nothing_outstanding() {
        let issued = issued_invoice(dec!(100), date(2026, 9, 1), date(2026, 9, 15));
        let mut raw = serde_json::to_value(&issued).unwrap();
        raw["paid_amount"] = serde_json::json!("200.00");
        let overpaid: Document = serde_json::from_value(raw).unwrap();

        let documents = vec![overpaid];
        let stats = aggregate_dashboard_stats(&documents, &[], date(2026, 10, 16));
        let aged: Decimal = receivables_by_age(&documents, date(2026, 10, 16))
            .iter()
            .map(|line| line.outstanding)
            .sum();

        assert_eq!(stats.open_invoices_amount, dec!(0));
        assert_eq!(stats.open_invoices_amount, aged);
    }

    #[test]
    fn recomputation_is_deterministic() {
        let documents = vec![issued_invoice(dec!(10), date(2026, 9, 1), date(2026, 9, 5))];
        let a = aggregate_dashboard_stats(&documents, &[], date(2026, 10, 16));
        let b = aggregate_dashboard_stats(&documents, &[], date(2026, 10, 16));
        assert_eq!(a, b);
    }

    /// Issued invoice with one of several histories, picked by `kind`.
    fn build(net_cents: i64, due_offset: i64, kind: u8) -> Document {
        let on = date(2026, 6, 1);
        let due = on + chrono::Duration::days(due_offset);
        let net = Decimal::new(net_cents, 2);
        let invoice = issued_invoice(net, on, due);
        match kind {
            0 => invoice,
            1 => settle_in_full(&invoice, due).unwrap(),
            2 if net_cents > 1 => record_payment(&invoice, Decimal::new(1, 2), on).unwrap(),
            3 => transition(&invoice, DocumentStatus::Cancelled, on).unwrap(),
            _ => escalate_dunning(&invoice, date(2026, 10, 16)).unwrap_or(invoice),
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 64,
            ..ProptestConfig::default()
        })]

        /// Property: the open amount matches the aging breakdown, and the
        /// stats do not depend on document order.
        #[test]
        fn open_amount_matches_aging_and_ignores_order(
            specs in prop::collection::vec((1i64..1_000_000, 0i64..200, 0u8..5), 0..25),
        ) {
            let today = date(2026, 10, 16);
            let documents: Vec<Document> = specs
                .iter()
                .map(|&(cents, offset, kind)| build(cents, offset, kind))
                .collect();

            let stats = aggregate_dashboard_stats(&documents, &[], today);
            let aged: Decimal = receivables_by_age(&documents, today)
                .iter()
                .map(|line| line.outstanding)
                .sum();
            prop_assert_eq!(stats.open_invoices_amount, aged);

            let mut reversed = documents.clone();
            reversed.reverse();
            prop_assert_eq!(aggregate_dashboard_stats(&reversed, &[], today), stats);
        }
    }
}
