//! Typed access to one collection of a [`RecordStore`].

use std::fmt::Display;
use std::marker::PhantomData;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use tracing::debug;

use werkbank_billing::Document;
use werkbank_core::{
    AggregateRoot, CustomerId, DocumentId, EmployeeId, Entity, ExpectedVersion, ProjectId,
};
use werkbank_parties::{Customer, Employee};
use werkbank_projects::Project;

use crate::record_store::{self, RecordStore, StoreError};

/// A record type persisted in a named collection.
pub trait StoredRecord: Serialize + DeserializeOwned + Clone {
    type Key: Copy + PartialEq + Display;

    const COLLECTION: &'static str;

    fn key(&self) -> Self::Key;

    /// Change counter checked by [`Repository::replace`]. Records without
    /// a lifecycle stay at 0.
    fn revision(&self) -> u64 {
        0
    }
}

impl StoredRecord for Document {
    type Key = DocumentId;
    const COLLECTION: &'static str = record_store::DOCUMENTS;

    fn key(&self) -> DocumentId {
        self.id_typed()
    }

    fn revision(&self) -> u64 {
        self.version()
    }
}

impl StoredRecord for Customer {
    type Key = CustomerId;
    const COLLECTION: &'static str = record_store::CUSTOMERS;

    fn key(&self) -> CustomerId {
        *Entity::id(self)
    }
}

impl StoredRecord for Employee {
    type Key = EmployeeId;
    const COLLECTION: &'static str = record_store::EMPLOYEES;

    fn key(&self) -> EmployeeId {
        *Entity::id(self)
    }
}

impl StoredRecord for Project {
    type Key = ProjectId;
    const COLLECTION: &'static str = record_store::PROJECTS;

    fn key(&self) -> ProjectId {
        *Entity::id(self)
    }
}

/// Read-modify-write helper over `T::COLLECTION`.
///
/// Every mutation loads the collection, changes it in memory and writes it
/// back with [`RecordStore::replace_all`].
pub struct Repository<'a, T, S: ?Sized> {
    store: &'a S,
    _record: PhantomData<fn() -> T>,
}

impl<'a, T, S> Repository<'a, T, S>
where
    T: StoredRecord,
    S: RecordStore + ?Sized,
{
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            _record: PhantomData,
        }
    }

    fn not_found(key: T::Key) -> StoreError {
        StoreError::NotFound {
            collection: T::COLLECTION.to_string(),
            key: key.to_string(),
        }
    }

    fn encode(record: &T) -> Result<JsonValue, StoreError> {
        serde_json::to_value(record).map_err(|e| StoreError::serialization(T::COLLECTION, e))
    }

    pub fn list(&self) -> Result<Vec<T>, StoreError> {
        self.store
            .get_all(T::COLLECTION)?
            .into_iter()
            .map(|value| {
                serde_json::from_value(value)
                    .map_err(|e| StoreError::serialization(T::COLLECTION, e))
            })
            .collect()
    }

    pub fn find(&self, key: T::Key) -> Result<Option<T>, StoreError> {
        Ok(self.list()?.into_iter().find(|r| r.key() == key))
    }

    pub fn get(&self, key: T::Key) -> Result<T, StoreError> {
        self.find(key)?.ok_or_else(|| Self::not_found(key))
    }

    /// Append a new record; fails with `Conflict` if the key is taken.
    pub fn insert(&self, record: &T) -> Result<(), StoreError> {
        let mut records = self.list()?;
        if records.iter().any(|r| r.key() == record.key()) {
            return Err(StoreError::Conflict(format!(
                "{} record {} already exists",
                T::COLLECTION,
                record.key()
            )));
        }
        records.push(record.clone());
        self.save_all(&records)?;
        debug!(collection = T::COLLECTION, key = %record.key(), "inserted record");
        Ok(())
    }

    /// Replace the stored record with the same key.
    ///
    /// `expected` is checked against the stored revision, so a caller that
    /// read a record, changed it and writes it back fails with `Conflict` if
    /// someone else saved it in between.
    pub fn replace(&self, record: &T, expected: ExpectedVersion) -> Result<(), StoreError> {
        let mut records = self.list()?;
        let slot = records
            .iter_mut()
            .find(|r| r.key() == record.key())
            .ok_or_else(|| Self::not_found(record.key()))?;

        expected
            .check(slot.revision())
            .map_err(|e| StoreError::Conflict(format!("{} {}: {e}", T::COLLECTION, record.key())))?;

        *slot = record.clone();
        self.save_all(&records)?;
        debug!(
            collection = T::COLLECTION,
            key = %record.key(),
            revision = record.revision(),
            "replaced record"
        );
        Ok(())
    }

    /// Delete and return the record with `key`.
    pub fn remove(&self, key: T::Key) -> Result<T, StoreError> {
        let mut records = self.list()?;
        let index = records
            .iter()
            .position(|r| r.key() == key)
            .ok_or_else(|| Self::not_found(key))?;
        let removed = records.remove(index);
        self.save_all(&records)?;
        debug!(collection = T::COLLECTION, key = %key, "removed record");
        Ok(removed)
    }

    /// Overwrite the whole collection.
    pub fn save_all(&self, records: &[T]) -> Result<(), StoreError> {
        let values = records
            .iter()
            .map(Self::encode)
            .collect::<Result<Vec<_>, _>>()?;
        self.store.replace_all(T::COLLECTION, values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record_store::InMemoryRecordStore;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use werkbank_billing::{DocumentItem, DocumentStatus, DocumentType, DraftDocument, transition};
    use werkbank_parties::ContactInfo;

    fn customer(name: &str) -> Customer {
        Customer::new(CustomerId::new(), "K-1001", name, ContactInfo::default()).unwrap()
    }

    fn draft_invoice() -> Document {
        let on = NaiveDate::from_ymd_opt(2026, 10, 1).unwrap();
        Document::draft(DraftDocument {
            id: DocumentId::new(),
            number: "RE-2026-0042".to_string(),
            doc_type: DocumentType::Invoice,
            customer_id: CustomerId::new(),
            project_id: None,
            date: on,
            due_date: Some(on + chrono::Duration::days(14)),
            items: vec![
                DocumentItem::new("Montage", Decimal::from(2), "h", Decimal::from(80)).unwrap(),
            ],
            discount_rate: Decimal::ZERO,
            tax_rate: Decimal::from(19),
            notes: None,
        })
        .unwrap()
    }

    #[test]
    fn insert_get_list_remove() {
        let store = InMemoryRecordStore::new();
        let repo: Repository<'_, Customer, _> = Repository::new(&store);
        let mueller = customer("Müller Bau GmbH");
        let schmidt = customer("Schmidt & Söhne");

        repo.insert(&mueller).unwrap();
        repo.insert(&schmidt).unwrap();
        assert_eq!(repo.list().unwrap().len(), 2);
        assert_eq!(repo.get(mueller.key()).unwrap(), mueller);

        let removed = repo.remove(mueller.key()).unwrap();
        assert_eq!(removed, mueller);
        assert!(repo.find(mueller.key()).unwrap().is_none());
        assert!(matches!(repo.get(mueller.key()), Err(StoreError::NotFound { .. })));
    }

    #[test]
    fn duplicate_insert_conflicts() {
        let store = InMemoryRecordStore::new();
        let repo: Repository<'_, Customer, _> = Repository::new(&store);
        let c = customer("Müller Bau GmbH");
        repo.insert(&c).unwrap();
        assert!(matches!(repo.insert(&c), Err(StoreError::Conflict(_))));
    }

    #[test]
    fn stale_replace_conflicts() {
        let store = InMemoryRecordStore::new();
        let repo: Repository<'_, Document, _> = Repository::new(&store);
        let draft = draft_invoice();
        repo.insert(&draft).unwrap();

        let on = draft.date();
        let issued = transition(&draft, DocumentStatus::Open, on).unwrap();
        repo.replace(&issued, ExpectedVersion::Exact(draft.version())).unwrap();

        // A second writer still holding the draft.
        let cancelled = transition(&draft, DocumentStatus::Cancelled, on).unwrap();
        let err = repo
            .replace(&cancelled, ExpectedVersion::Exact(draft.version()))
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
        assert_eq!(repo.get(draft.key()).unwrap().status(), DocumentStatus::Open);
    }

    #[test]
    fn replace_of_unknown_record_is_not_found() {
        let store = InMemoryRecordStore::new();
        let repo: Repository<'_, Document, _> = Repository::new(&store);
        let err = repo.replace(&draft_invoice(), ExpectedVersion::Any).unwrap_err();
        assert!(matches!(
            err,
            StoreError::NotFound { collection, .. } if collection == "documents"
        ));
    }

    #[test]
    fn documents_round_trip_through_json() {
        let store = InMemoryRecordStore::new();
        let repo: Repository<'_, Document, _> = Repository::new(&store);
        let draft = draft_invoice();
        repo.insert(&draft).unwrap();

        let raw = store.get_all("documents").unwrap();
        assert_eq!(raw[0]["doc_type"], "rechnung");
        assert_eq!(raw[0]["status"], "entwurf");
        assert_eq!(repo.get(draft.key()).unwrap(), draft);
    }
}
