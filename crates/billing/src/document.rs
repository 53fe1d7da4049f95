use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use werkbank_core::{Aggregate, AggregateRoot, CustomerId, DocumentId, DomainEvent, ProjectId};

use crate::error::{BillingError, BillingResult};
use crate::overdue::classify_overdue;
use crate::totals::{DocumentItem, Totals, compute_totals};

/// Kind of business document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentType {
    #[serde(rename = "angebot")]
    Quote,
    #[serde(rename = "rechnung")]
    Invoice,
    #[serde(rename = "auftragsbestaetigung")]
    OrderConfirmation,
    #[serde(rename = "lieferschein")]
    DeliveryNote,
}

impl DocumentType {
    pub fn as_str(self) -> &'static str {
        match self {
            DocumentType::Quote => "angebot",
            DocumentType::Invoice => "rechnung",
            DocumentType::OrderConfirmation => "auftragsbestaetigung",
            DocumentType::DeliveryNote => "lieferschein",
        }
    }
}

impl core::fmt::Display for DocumentType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Document status lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentStatus {
    #[serde(rename = "entwurf")]
    Draft,
    #[serde(rename = "offen")]
    Open,
    #[serde(rename = "angenommen")]
    Accepted,
    #[serde(rename = "abgelehnt")]
    Rejected,
    #[serde(rename = "ueberfaellig")]
    Overdue,
    #[serde(rename = "bezahlt")]
    Paid,
    #[serde(rename = "gemahnt")]
    Dunned,
    #[serde(rename = "storniert")]
    Cancelled,
}

impl DocumentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            DocumentStatus::Draft => "entwurf",
            DocumentStatus::Open => "offen",
            DocumentStatus::Accepted => "angenommen",
            DocumentStatus::Rejected => "abgelehnt",
            DocumentStatus::Overdue => "ueberfaellig",
            DocumentStatus::Paid => "bezahlt",
            DocumentStatus::Dunned => "gemahnt",
            DocumentStatus::Cancelled => "storniert",
        }
    }

    /// No further status change is permitted from a terminal status.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            DocumentStatus::Accepted
                | DocumentStatus::Rejected
                | DocumentStatus::Paid
                | DocumentStatus::Cancelled
        )
    }

    /// Invoice statuses that still carry an open receivable.
    pub fn is_receivable(self) -> bool {
        matches!(
            self,
            DocumentStatus::Open | DocumentStatus::Overdue | DocumentStatus::Dunned
        )
    }

    /// Transition table of the document lifecycle.
    pub fn permits(self, doc_type: DocumentType, to: DocumentStatus) -> bool {
        use DocumentStatus::*;
        use DocumentType::*;

        match (doc_type, self, to) {
            (_, Draft, Open | Cancelled) => true,
            (_, Draft, _) => false,

            (Quote | OrderConfirmation, Open, Accepted | Rejected | Cancelled) => true,
            (Invoice, Open, Overdue | Dunned | Paid | Cancelled) => true,
            (Invoice, Overdue, Dunned | Paid | Cancelled) => true,
            (Invoice, Dunned, Dunned | Paid | Cancelled) => true,
            (DeliveryNote, Open, Cancelled) => true,
            (_, Open | Overdue | Dunned, _) => false,

            (_, Accepted | Rejected | Paid | Cancelled, _) => false,
        }
    }
}

impl core::fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Dunning escalation level: 0 = none, 1 = first notice, 2 = second notice,
/// 3 = final notice (collections handoff).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct DunningLevel(u8);

impl DunningLevel {
    pub const NONE: DunningLevel = DunningLevel(0);
    pub const FINAL: DunningLevel = DunningLevel(3);

    pub const fn get(self) -> u8 {
        self.0
    }

    /// The next level, or `None` once the final notice has been sent.
    pub fn next(self) -> Option<DunningLevel> {
        if self < Self::FINAL {
            Some(DunningLevel(self.0 + 1))
        } else {
            None
        }
    }
}

impl TryFrom<u8> for DunningLevel {
    type Error = BillingError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if value > Self::FINAL.0 {
            return Err(BillingError::invalid_input(format!(
                "dunning level {value} exceeds {}",
                Self::FINAL.0
            )));
        }
        Ok(DunningLevel(value))
    }
}

impl From<DunningLevel> for u8 {
    fn from(value: DunningLevel) -> Self {
        value.0
    }
}

impl core::fmt::Display for DunningLevel {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// One sent dunning notice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DunningRecord {
    pub level: DunningLevel,
    pub date: NaiveDate,
    /// `total_amount - paid_amount` when the notice was sent.
    pub amount_due: Decimal,
}

/// Input for a new draft document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftDocument {
    pub id: DocumentId,
    pub number: String,
    pub doc_type: DocumentType,
    pub customer_id: CustomerId,
    pub project_id: Option<ProjectId>,
    pub date: NaiveDate,
    pub due_date: Option<NaiveDate>,
    pub items: Vec<DocumentItem>,
    pub discount_rate: Decimal,
    pub tax_rate: Decimal,
    pub notes: Option<String>,
}

/// Aggregate root: a quote, invoice, order confirmation or delivery note.
///
/// Fields only change through [`Aggregate::apply`], one event at a time, so
/// status, dunning level and amounts never disagree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    id: DocumentId,
    number: String,
    doc_type: DocumentType,
    status: DocumentStatus,
    customer_id: CustomerId,
    #[serde(default)]
    project_id: Option<ProjectId>,
    date: NaiveDate,
    #[serde(default)]
    due_date: Option<NaiveDate>,
    tax_rate: Decimal,
    discount_rate: Decimal,
    items: Vec<DocumentItem>,
    subtotal: Decimal,
    discount_amount: Decimal,
    tax_amount: Decimal,
    total_amount: Decimal,
    paid_amount: Decimal,
    #[serde(default)]
    dunning_level: DunningLevel,
    #[serde(default)]
    dunning_history: Vec<DunningRecord>,
    #[serde(default)]
    paid_on: Option<NaiveDate>,
    #[serde(default)]
    notes: Option<String>,
    #[serde(default)]
    version: u64,
}

impl Document {
    /// Create a new document in status `entwurf` with computed totals.
    pub fn draft(input: DraftDocument) -> BillingResult<Self> {
        if input.number.trim().is_empty() {
            return Err(BillingError::invalid_input("document number must not be empty"));
        }
        if let Some(due) = input.due_date {
            if due < input.date {
                return Err(BillingError::invalid_input(
                    "due_date must not be before the document date",
                ));
            }
        }

        let items = input
            .items
            .iter()
            .map(DocumentItem::repriced)
            .collect::<BillingResult<Vec<_>>>()?;
        let totals = compute_totals(&items, input.discount_rate, input.tax_rate)?;

        Ok(Self {
            id: input.id,
            number: input.number,
            doc_type: input.doc_type,
            status: DocumentStatus::Draft,
            customer_id: input.customer_id,
            project_id: input.project_id,
            date: input.date,
            due_date: input.due_date,
            tax_rate: input.tax_rate,
            discount_rate: input.discount_rate,
            items,
            subtotal: totals.subtotal,
            discount_amount: totals.discount_amount,
            tax_amount: totals.tax_amount,
            total_amount: totals.total_amount,
            paid_amount: Decimal::ZERO,
            dunning_level: DunningLevel::NONE,
            dunning_history: Vec::new(),
            paid_on: None,
            notes: input.notes,
            version: 0,
        })
    }

    pub fn id_typed(&self) -> DocumentId {
        self.id
    }

    pub fn number(&self) -> &str {
        &self.number
    }

    pub fn doc_type(&self) -> DocumentType {
        self.doc_type
    }

    pub fn status(&self) -> DocumentStatus {
        self.status
    }

    pub fn customer_id(&self) -> CustomerId {
        self.customer_id
    }

    pub fn project_id(&self) -> Option<ProjectId> {
        self.project_id
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn due_date(&self) -> Option<NaiveDate> {
        self.due_date
    }

    pub fn tax_rate(&self) -> Decimal {
        self.tax_rate
    }

    pub fn discount_rate(&self) -> Decimal {
        self.discount_rate
    }

    pub fn items(&self) -> &[DocumentItem] {
        &self.items
    }

    pub fn totals(&self) -> Totals {
        Totals {
            subtotal: self.subtotal,
            discount_amount: self.discount_amount,
            tax_amount: self.tax_amount,
            total_amount: self.total_amount,
        }
    }

    pub fn subtotal(&self) -> Decimal {
        self.subtotal
    }

    pub fn tax_amount(&self) -> Decimal {
        self.tax_amount
    }

    pub fn total_amount(&self) -> Decimal {
        self.total_amount
    }

    pub fn paid_amount(&self) -> Decimal {
        self.paid_amount
    }

    pub fn outstanding_amount(&self) -> Decimal {
        (self.total_amount - self.paid_amount).max(Decimal::ZERO)
    }

    pub fn dunning_level(&self) -> DunningLevel {
        self.dunning_level
    }

    pub fn dunning_history(&self) -> &[DunningRecord] {
        &self.dunning_history
    }

    pub fn paid_on(&self) -> Option<NaiveDate> {
        self.paid_on
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn is_invoice(&self) -> bool {
        self.doc_type == DocumentType::Invoice
    }

    /// Whether the document still accepts payments.
    pub fn can_accept_payment(&self) -> bool {
        self.is_invoice() && self.status.is_receivable()
    }
}

impl AggregateRoot for Document {
    type Id = DocumentId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: replace line items and/or rates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reprice {
    pub items: Vec<DocumentItem>,
    pub discount_rate: Decimal,
    pub tax_rate: Decimal,
    pub on: NaiveDate,
}

/// Command: operator status change (issue, accept, reject, cancel).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeStatus {
    pub to: DocumentStatus,
    pub on: NaiveDate,
}

/// Command: flag an open invoice as `ueberfaellig` if it is past due.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkOverdue {
    pub today: NaiveDate,
}

/// Command: send the next dunning notice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendDunning {
    pub today: NaiveDate,
}

/// Command: book a payment (negative amounts are corrections).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordPayment {
    pub amount: Decimal,
    pub paid_on: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentCommand {
    Reprice(Reprice),
    ChangeStatus(ChangeStatus),
    MarkOverdue(MarkOverdue),
    SendDunning(SendDunning),
    RecordPayment(RecordPayment),
}

/// Event: ItemsRepriced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemsRepriced {
    pub items: Vec<DocumentItem>,
    pub discount_rate: Decimal,
    pub tax_rate: Decimal,
    pub totals: Totals,
    pub occurred_on: NaiveDate,
}

/// Event: StatusChanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusChanged {
    pub from: DocumentStatus,
    pub to: DocumentStatus,
    pub occurred_on: NaiveDate,
}

/// Event: DunningNoticeSent. Applying it raises the level, appends the record
/// and sets the status to `gemahnt` in one step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DunningNoticeSent {
    pub record: DunningRecord,
}

/// Event: PaymentRecorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRecorded {
    pub amount: Decimal,
    pub new_paid_amount: Decimal,
    pub settled: bool,
    pub paid_on: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentEvent {
    ItemsRepriced(ItemsRepriced),
    StatusChanged(StatusChanged),
    DunningNoticeSent(DunningNoticeSent),
    PaymentRecorded(PaymentRecorded),
}

impl DomainEvent for DocumentEvent {
    fn event_type(&self) -> &'static str {
        match self {
            DocumentEvent::ItemsRepriced(_) => "billing.document.items_repriced",
            DocumentEvent::StatusChanged(_) => "billing.document.status_changed",
            DocumentEvent::DunningNoticeSent(_) => "billing.document.dunning_sent",
            DocumentEvent::PaymentRecorded(_) => "billing.document.payment_recorded",
        }
    }

    fn occurred_on(&self) -> NaiveDate {
        match self {
            DocumentEvent::ItemsRepriced(e) => e.occurred_on,
            DocumentEvent::StatusChanged(e) => e.occurred_on,
            DocumentEvent::DunningNoticeSent(e) => e.record.date,
            DocumentEvent::PaymentRecorded(e) => e.paid_on,
        }
    }
}

impl Aggregate for Document {
    type Command = DocumentCommand;
    type Event = DocumentEvent;
    type Error = BillingError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            DocumentEvent::ItemsRepriced(e) => {
                self.items = e.items.clone();
                self.discount_rate = e.discount_rate;
                self.tax_rate = e.tax_rate;
                self.subtotal = e.totals.subtotal;
                self.discount_amount = e.totals.discount_amount;
                self.tax_amount = e.totals.tax_amount;
                self.total_amount = e.totals.total_amount;
            }
            DocumentEvent::StatusChanged(e) => {
                self.status = e.to;
            }
            DocumentEvent::DunningNoticeSent(e) => {
                self.dunning_level = e.record.level;
                self.dunning_history.push(e.record.clone());
                self.status = DocumentStatus::Dunned;
            }
            DocumentEvent::PaymentRecorded(e) => {
                self.paid_amount = e.new_paid_amount;
                if e.settled {
                    self.status = DocumentStatus::Paid;
                    self.paid_on = Some(e.paid_on);
                }
            }
        }

        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            DocumentCommand::Reprice(cmd) => self.handle_reprice(cmd),
            DocumentCommand::ChangeStatus(cmd) => self.handle_change_status(cmd),
            DocumentCommand::MarkOverdue(cmd) => self.handle_mark_overdue(cmd),
            DocumentCommand::SendDunning(cmd) => self.handle_send_dunning(cmd),
            DocumentCommand::RecordPayment(cmd) => self.handle_record_payment(cmd),
        }
    }
}

impl Document {
    fn ensure_permits(&self, to: DocumentStatus) -> BillingResult<()> {
        if self.status.is_terminal() {
            return Err(BillingError::frozen(self.status));
        }
        if !self.status.permits(self.doc_type, to) {
            return Err(BillingError::transition(self.doc_type, self.status, to));
        }
        Ok(())
    }

    fn handle_reprice(&self, cmd: &Reprice) -> BillingResult<Vec<DocumentEvent>> {
        if !matches!(self.status, DocumentStatus::Draft | DocumentStatus::Open) {
            return Err(BillingError::frozen(self.status));
        }

        let items = cmd
            .items
            .iter()
            .map(DocumentItem::repriced)
            .collect::<BillingResult<Vec<_>>>()?;
        let totals = compute_totals(&items, cmd.discount_rate, cmd.tax_rate)?;

        if totals.total_amount < self.paid_amount {
            return Err(BillingError::overpayment(format!(
                "new total {} is below the amount already paid ({})",
                totals.total_amount, self.paid_amount
            )));
        }

        Ok(vec![DocumentEvent::ItemsRepriced(ItemsRepriced {
            items,
            discount_rate: cmd.discount_rate,
            tax_rate: cmd.tax_rate,
            totals,
            occurred_on: cmd.on,
        })])
    }

    fn handle_change_status(&self, cmd: &ChangeStatus) -> BillingResult<Vec<DocumentEvent>> {
        // Derived statuses have dedicated commands that keep amounts and
        // dunning state consistent with them.
        if matches!(
            cmd.to,
            DocumentStatus::Overdue | DocumentStatus::Dunned | DocumentStatus::Paid
        ) {
            return Err(BillingError::InvalidTransition(format!(
                "{} is set by the overdue check, dunning or payments, not directly",
                cmd.to
            )));
        }
        self.ensure_permits(cmd.to)?;

        Ok(vec![DocumentEvent::StatusChanged(StatusChanged {
            from: self.status,
            to: cmd.to,
            occurred_on: cmd.on,
        })])
    }

    fn handle_mark_overdue(&self, cmd: &MarkOverdue) -> BillingResult<Vec<DocumentEvent>> {
        if self.status != DocumentStatus::Open || !classify_overdue(self, cmd.today).is_overdue {
            return Ok(Vec::new());
        }
        self.ensure_permits(DocumentStatus::Overdue)?;

        Ok(vec![DocumentEvent::StatusChanged(StatusChanged {
            from: self.status,
            to: DocumentStatus::Overdue,
            occurred_on: cmd.today,
        })])
    }

    fn handle_send_dunning(&self, cmd: &SendDunning) -> BillingResult<Vec<DocumentEvent>> {
        let level = self.dunning_level.next().ok_or(BillingError::AlreadyMaxLevel {
            max: DunningLevel::FINAL.get(),
        })?;

        if !classify_overdue(self, cmd.today).is_overdue {
            return Err(BillingError::NotOverdue);
        }
        self.ensure_permits(DocumentStatus::Dunned)?;

        Ok(vec![DocumentEvent::DunningNoticeSent(DunningNoticeSent {
            record: DunningRecord {
                level,
                date: cmd.today,
                amount_due: self.total_amount - self.paid_amount,
            },
        })])
    }

    fn handle_record_payment(&self, cmd: &RecordPayment) -> BillingResult<Vec<DocumentEvent>> {
        if self.status.is_terminal() {
            return Err(BillingError::frozen(self.status));
        }
        if !self.can_accept_payment() {
            return Err(BillingError::transition(
                self.doc_type,
                self.status,
                DocumentStatus::Paid,
            ));
        }
        if cmd.amount.is_zero() && !self.outstanding_amount().is_zero() {
            return Err(BillingError::invalid_input("payment amount must not be zero"));
        }

        // A zero booking against a fully covered invoice (e.g. 100% discount)
        // settles it.
        let new_paid_amount = self
            .paid_amount
            .checked_add(cmd.amount)
            .ok_or_else(|| BillingError::invalid_input("payment total overflow"))?;

        if new_paid_amount < Decimal::ZERO {
            return Err(BillingError::overpayment(format!(
                "correction of {} would make the paid amount negative",
                cmd.amount
            )));
        }
        if new_paid_amount > self.total_amount {
            return Err(BillingError::overpayment(format!(
                "paid amount {} would exceed the total of {}",
                new_paid_amount, self.total_amount
            )));
        }

        Ok(vec![DocumentEvent::PaymentRecorded(PaymentRecorded {
            amount: cmd.amount,
            new_paid_amount,
            settled: new_paid_amount >= self.total_amount,
            paid_on: cmd.paid_on,
        })])
    }
}

/// Apply an operator status change and return the replacement record.
pub fn transition(
    document: &Document,
    to: DocumentStatus,
    on: NaiveDate,
) -> BillingResult<Document> {
    let (next, _) = document.execute(&DocumentCommand::ChangeStatus(ChangeStatus { to, on }))?;
    Ok(next)
}

/// Replace items and rates of a draft or open document, recomputing totals.
pub fn reprice(
    document: &Document,
    items: Vec<DocumentItem>,
    discount_rate: Decimal,
    tax_rate: Decimal,
    on: NaiveDate,
) -> BillingResult<Document> {
    let command = DocumentCommand::Reprice(Reprice {
        items,
        discount_rate,
        tax_rate,
        on,
    });
    let (next, _) = document.execute(&command)?;
    Ok(next)
}

/// Build a draft invoice from an accepted quote or order confirmation.
pub fn convert_to_invoice(
    source: &Document,
    id: DocumentId,
    number: impl Into<String>,
    date: NaiveDate,
    due_date: Option<NaiveDate>,
) -> BillingResult<Document> {
    if !matches!(
        source.doc_type,
        DocumentType::Quote | DocumentType::OrderConfirmation
    ) {
        return Err(BillingError::InvalidTransition(format!(
            "only quotes and order confirmations can be invoiced (got {})",
            source.doc_type
        )));
    }
    if source.status != DocumentStatus::Accepted {
        return Err(BillingError::InvalidTransition(format!(
            "{} must be {} before invoicing (is {})",
            source.doc_type,
            DocumentStatus::Accepted,
            source.status
        )));
    }

    Document::draft(DraftDocument {
        id,
        number: number.into(),
        doc_type: DocumentType::Invoice,
        customer_id: source.customer_id,
        project_id: source.project_id,
        date,
        due_date,
        items: source.items.clone(),
        discount_rate: source.discount_rate,
        tax_rate: source.tax_rate,
        notes: source.notes.clone(),
    })
}
