//! Billing application service.
//!
//! Owns the read-modify-write cycle against a [`RecordStore`]: load a record,
//! run the pure domain operation, store the replacement with a version check.

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use werkbank_billing::{
    AgingBucket, BillingError, ChangeStatus, Document, DocumentCommand, DocumentItem,
    DocumentStatus, DocumentType, DraftDocument, DunningLevel, MarkOverdue, RecordPayment, Reprice,
    SendDunning, classify_overdue,
};
use werkbank_core::{
    Aggregate, AggregateRoot, CustomerId, DocumentId, DomainError, DomainEvent, ExpectedVersion,
    ProjectId,
};
use werkbank_dashboard::{
    AgingLine, CustomerBalance, DashboardOptions, DashboardStats, DunningOverview,
    aggregate_dashboard_stats_with, customer_balances, dunning_overview, receivables_by_age,
};
use werkbank_parties::{Customer, Employee};
use werkbank_projects::Project;

use crate::config::AppConfig;
use crate::record_store::{RecordStore, StoreError};
use crate::repository::Repository;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Billing(#[from] BillingError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Defaults the service applies to new documents and reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BillingSettings {
    pub default_tax_rate: Decimal,
    pub payment_terms_days: i64,
    pub collection_window_days: i64,
}

impl Default for BillingSettings {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for BillingSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            default_tax_rate: config.billing.default_tax_rate,
            payment_terms_days: config.billing.payment_terms_days,
            collection_window_days: config.dashboard.collection_window_days,
        }
    }
}

/// Input for [`BillingService::create_document`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDocument {
    pub doc_type: DocumentType,
    pub number: String,
    pub customer_id: CustomerId,
    pub project_id: Option<ProjectId>,
    pub date: NaiveDate,
    /// Invoices without one get `date + payment_terms_days`.
    pub due_date: Option<NaiveDate>,
    pub items: Vec<DocumentItem>,
    pub discount_rate: Decimal,
    /// Falls back to the configured default rate.
    pub tax_rate: Option<Decimal>,
    pub notes: Option<String>,
}

/// One row of the overdue list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverdueInvoice {
    pub id: DocumentId,
    pub number: String,
    pub customer_id: CustomerId,
    pub status: DocumentStatus,
    pub due_date: Option<NaiveDate>,
    pub days_overdue: i64,
    pub dunning_level: DunningLevel,
    pub outstanding_amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceivablesReport {
    pub aging: Vec<AgingLine>,
    pub customers: Vec<CustomerBalance>,
    pub dunning: DunningOverview,
}

pub struct BillingService<S> {
    store: S,
    settings: BillingSettings,
}

impl<S: RecordStore> BillingService<S> {
    pub fn new(store: S, settings: BillingSettings) -> Self {
        Self { store, settings }
    }

    pub fn settings(&self) -> &BillingSettings {
        &self.settings
    }

    pub fn documents(&self) -> Repository<'_, Document, S> {
        Repository::new(&self.store)
    }

    pub fn customers(&self) -> Repository<'_, Customer, S> {
        Repository::new(&self.store)
    }

    pub fn employees(&self) -> Repository<'_, Employee, S> {
        Repository::new(&self.store)
    }

    pub fn projects(&self) -> Repository<'_, Project, S> {
        Repository::new(&self.store)
    }

    fn default_due_date(&self, doc_type: DocumentType, date: NaiveDate) -> Option<NaiveDate> {
        (doc_type == DocumentType::Invoice)
            .then(|| date + Duration::days(self.settings.payment_terms_days))
    }

    fn ensure_references(
        &self,
        customer_id: CustomerId,
        project_id: Option<ProjectId>,
    ) -> ServiceResult<()> {
        if self.customers().find(customer_id)?.is_none() {
            return Err(DomainError::not_found(format!("customer {customer_id}")).into());
        }
        if let Some(project_id) = project_id {
            let project = self
                .projects()
                .find(project_id)?
                .ok_or_else(|| DomainError::not_found(format!("project {project_id}")))?;
            if project.customer_id != customer_id {
                return Err(DomainError::validation(format!(
                    "project {project_id} belongs to another customer"
                ))
                .into());
            }
        }
        Ok(())
    }

    /// Create a draft document for an existing customer (and project).
    pub fn create_document(&self, input: NewDocument) -> ServiceResult<Document> {
        self.ensure_references(input.customer_id, input.project_id)?;

        let due_date = input
            .due_date
            .or_else(|| self.default_due_date(input.doc_type, input.date));
        let draft = Document::draft(DraftDocument {
            id: DocumentId::new(),
            number: input.number,
            doc_type: input.doc_type,
            customer_id: input.customer_id,
            project_id: input.project_id,
            date: input.date,
            due_date,
            items: input.items,
            discount_rate: input.discount_rate,
            tax_rate: input.tax_rate.unwrap_or(self.settings.default_tax_rate),
            notes: input.notes,
        })?;

        self.documents().insert(&draft)?;
        info!(
            document_id = %draft.id_typed(),
            number = draft.number(),
            doc_type = %draft.doc_type(),
            total = %draft.total_amount(),
            "document created"
        );
        Ok(draft)
    }

    /// Load, decide, store. Logs every emitted event.
    fn execute(&self, id: DocumentId, command: DocumentCommand) -> ServiceResult<Document> {
        let documents = self.documents();
        let current = documents.get(id)?;

        let (next, events) = match current.execute(&command) {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(
                    document_id = %id,
                    status = %current.status(),
                    error = %err,
                    "command rejected"
                );
                return Err(err.into());
            }
        };
        if events.is_empty() {
            return Ok(current);
        }

        documents.replace(&next, ExpectedVersion::Exact(current.version()))?;
        for event in &events {
            info!(
                document_id = %id,
                event = event.event_type(),
                status = %next.status(),
                level = next.dunning_level().get(),
                version = next.version(),
                "document updated"
            );
        }
        Ok(next)
    }

    /// Replace line items and rates of a draft or open document.
    pub fn update_items(
        &self,
        id: DocumentId,
        items: Vec<DocumentItem>,
        discount_rate: Decimal,
        tax_rate: Decimal,
        on: NaiveDate,
    ) -> ServiceResult<Document> {
        self.execute(
            id,
            DocumentCommand::Reprice(Reprice {
                items,
                discount_rate,
                tax_rate,
                on,
            }),
        )
    }

    /// Operator status change (issue, accept, reject, cancel).
    pub fn transition(
        &self,
        id: DocumentId,
        to: DocumentStatus,
        on: NaiveDate,
    ) -> ServiceResult<Document> {
        self.execute(id, DocumentCommand::ChangeStatus(ChangeStatus { to, on }))
    }

    pub fn send_dunning(&self, id: DocumentId, today: NaiveDate) -> ServiceResult<Document> {
        self.execute(id, DocumentCommand::SendDunning(SendDunning { today }))
    }

    pub fn record_payment(
        &self,
        id: DocumentId,
        amount: Decimal,
        paid_on: NaiveDate,
    ) -> ServiceResult<Document> {
        self.execute(
            id,
            DocumentCommand::RecordPayment(RecordPayment { amount, paid_on }),
        )
    }

    /// Create a draft invoice from an accepted quote or order confirmation.
    pub fn convert_to_invoice(
        &self,
        source_id: DocumentId,
        number: impl Into<String>,
        date: NaiveDate,
    ) -> ServiceResult<Document> {
        let source = self.documents().get(source_id)?;
        let invoice = werkbank_billing::convert_to_invoice(
            &source,
            DocumentId::new(),
            number,
            date,
            self.default_due_date(DocumentType::Invoice, date),
        )?;

        self.documents().insert(&invoice)?;
        info!(
            document_id = %invoice.id_typed(),
            source_id = %source_id,
            number = invoice.number(),
            "invoice created from {}",
            source.doc_type()
        );
        Ok(invoice)
    }

    /// Flag every `offen` invoice past its due date as `ueberfaellig`.
    ///
    /// Writes the collection once; returns the ids that changed.
    pub fn refresh_overdue(&self, today: NaiveDate) -> ServiceResult<Vec<DocumentId>> {
        let documents = self.documents();
        let mut all = documents.list()?;
        let mut flagged = Vec::new();

        for doc in all.iter_mut() {
            let (next, events) =
                doc.execute(&DocumentCommand::MarkOverdue(MarkOverdue { today }))?;
            if !events.is_empty() {
                flagged.push(next.id_typed());
                *doc = next;
            }
        }

        if !flagged.is_empty() {
            documents.save_all(&all)?;
            info!(count = flagged.len(), %today, "invoices flagged overdue");
        }
        Ok(flagged)
    }

    pub fn dashboard(&self, today: NaiveDate) -> ServiceResult<DashboardStats> {
        let documents = self.documents().list()?;
        let projects = self.projects().list()?;
        let options = DashboardOptions {
            collection_window_days: self.settings.collection_window_days,
        };
        Ok(aggregate_dashboard_stats_with(&documents, &projects, today, &options))
    }

    pub fn receivables(&self, today: NaiveDate) -> ServiceResult<ReceivablesReport> {
        let documents = self.documents().list()?;
        Ok(ReceivablesReport {
            aging: receivables_by_age(&documents, today),
            customers: customer_balances(&documents),
            dunning: dunning_overview(&documents),
        })
    }

    /// Overdue invoices, longest overdue first.
    pub fn overdue_invoices(&self, today: NaiveDate) -> ServiceResult<Vec<OverdueInvoice>> {
        let mut overdue: Vec<OverdueInvoice> = self
            .documents()
            .list()?
            .into_iter()
            .filter_map(|doc| {
                let status = classify_overdue(&doc, today);
                status.is_overdue.then(|| OverdueInvoice {
                    id: doc.id_typed(),
                    number: doc.number().to_string(),
                    customer_id: doc.customer_id(),
                    status: doc.status(),
                    due_date: doc.due_date(),
                    days_overdue: status.days_overdue,
                    dunning_level: doc.dunning_level(),
                    outstanding_amount: doc.outstanding_amount(),
                })
            })
            .collect();

        overdue.sort_by(|a, b| {
            b.days_overdue
                .cmp(&a.days_overdue)
                .then_with(|| a.number.cmp(&b.number))
        });
        Ok(overdue)
    }

    /// Aging bucket of one invoice, for display next to the overdue list.
    pub fn aging_bucket(&self, id: DocumentId, today: NaiveDate) -> ServiceResult<AgingBucket> {
        let doc = self.documents().get(id)?;
        Ok(AgingBucket::from_days_overdue(
            classify_overdue(&doc, today).days_overdue,
        ))
    }
}
