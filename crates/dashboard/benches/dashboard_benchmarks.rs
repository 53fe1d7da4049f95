use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use werkbank_billing::{
    Document, DocumentItem, DocumentStatus, DocumentType, DraftDocument, escalate_dunning,
    settle_in_full, transition,
};
use werkbank_core::{CustomerId, DocumentId, ProjectId};
use werkbank_dashboard::{
    aggregate_dashboard_stats, customer_balances, receivables_by_age,
};
use werkbank_projects::{Project, ProjectStatus};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Mixed portfolio: issued, paid, dunned invoices and open quotes spread over
/// a year, shared among a few dozen customers.
fn portfolio(size: usize) -> Vec<Document> {
    let customers: Vec<CustomerId> = (0..40).map(|_| CustomerId::new()).collect();
    let start = date(2025, 10, 1);

    (0..size)
        .map(|i| {
            let on = start + Duration::days((i % 365) as i64);
            let doc_type = if i % 5 == 0 { DocumentType::Quote } else { DocumentType::Invoice };
            let draft = Document::draft(DraftDocument {
                id: DocumentId::new(),
                number: format!("2026-{i:05}"),
                doc_type,
                customer_id: customers[i % customers.len()],
                project_id: None,
                date: on,
                due_date: Some(on + Duration::days(14)),
                items: vec![
                    DocumentItem::new(
                        "Arbeitszeit",
                        Decimal::from(8 + i % 7),
                        "h",
                        Decimal::from(65),
                    )
                    .unwrap(),
                    DocumentItem::new(
                        "Material",
                        Decimal::ONE,
                        "psch",
                        Decimal::new(12_345 + i as i64, 2),
                    )
                    .unwrap(),
                ],
                discount_rate: Decimal::ZERO,
                tax_rate: Decimal::from(19),
                notes: None,
            })
            .unwrap();
            let issued = transition(&draft, DocumentStatus::Open, on).unwrap();

            match (doc_type, i % 3) {
                (DocumentType::Invoice, 0) => {
                    settle_in_full(&issued, on + Duration::days(10)).unwrap()
                }
                (DocumentType::Invoice, 1) => {
                    escalate_dunning(&issued, on + Duration::days(30)).unwrap()
                }
                _ => issued,
            }
        })
        .collect()
}

fn projects(size: usize) -> Vec<Project> {
    (0..size)
        .map(|i| {
            let mut project =
                Project::plan(ProjectId::new(), format!("Projekt {i}"), CustomerId::new()).unwrap();
            if i % 2 == 0 {
                project.status = ProjectStatus::Active;
            }
            project
        })
        .collect()
}

fn bench_dashboard_aggregation(c: &mut Criterion) {
    let mut group = c.benchmark_group("dashboard_aggregation");
    let today = date(2026, 10, 16);
    let projects = projects(200);

    for size in [500usize, 2_000, 5_000].iter() {
        let documents = portfolio(*size);
        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(
            BenchmarkId::new("aggregate_dashboard_stats", size),
            &documents,
            |b, documents| {
                b.iter(|| aggregate_dashboard_stats(black_box(documents), &projects, today));
            },
        );
    }

    group.finish();
}

fn bench_receivables(c: &mut Criterion) {
    let mut group = c.benchmark_group("receivables");
    let today = date(2026, 10, 16);
    let documents = portfolio(5_000);

    group.bench_function("receivables_by_age", |b| {
        b.iter(|| receivables_by_age(black_box(&documents), today));
    });
    group.bench_function("customer_balances", |b| {
        b.iter(|| customer_balances(black_box(&documents)));
    });

    group.finish();
}

criterion_group!(benches, bench_dashboard_aggregation, bench_receivables);
criterion_main!(benches);
