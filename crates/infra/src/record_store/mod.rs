//! Collection-keyed record persistence.
//!
//! The whole application state is a handful of named collections, each a list
//! of JSON records. A store only supports reading and replacing a collection as
//! a whole; typed access and version checks live in [`crate::repository`].

pub mod in_memory;
pub mod json_file;

use std::sync::Arc;

use serde_json::Value as JsonValue;
use thiserror::Error;

pub use in_memory::InMemoryRecordStore;
pub use json_file::JsonFileRecordStore;

/// Collection holding quotes, invoices, order confirmations and delivery notes.
pub const DOCUMENTS: &str = "documents";
pub const CUSTOMERS: &str = "customers";
pub const EMPLOYEES: &str = "employees";
pub const PROJECTS: &str = "projects";

/// Record store operation error.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error on collection `{collection}`: {source}")]
    Io {
        collection: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed data in collection `{collection}`: {source}")]
    Serialization {
        collection: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid collection name: {0:?}")]
    InvalidCollection(String),

    #[error("{collection} record {key} not found")]
    NotFound { collection: String, key: String },

    #[error("optimistic concurrency check failed: {0}")]
    Conflict(String),

    #[error("record store lock poisoned")]
    Poisoned,
}

impl StoreError {
    pub(crate) fn io(collection: &str, source: std::io::Error) -> Self {
        Self::Io {
            collection: collection.to_string(),
            source,
        }
    }

    pub(crate) fn serialization(collection: &str, source: serde_json::Error) -> Self {
        Self::Serialization {
            collection: collection.to_string(),
            source,
        }
    }
}

/// Collection names become file names, so only `[a-z0-9_-]` is accepted.
pub(crate) fn validate_collection(collection: &str) -> Result<(), StoreError> {
    let valid = !collection.is_empty()
        && collection
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_' || b == b'-');
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidCollection(collection.to_string()))
    }
}

/// Key-value record store keyed by collection name.
///
/// `get_all` on a collection that was never written returns an empty list.
/// `replace_all` swaps the whole collection in one step: readers see either
/// the old or the new list, never a mix.
pub trait RecordStore: Send + Sync {
    fn get_all(&self, collection: &str) -> Result<Vec<JsonValue>, StoreError>;

    fn replace_all(&self, collection: &str, records: Vec<JsonValue>) -> Result<(), StoreError>;
}

impl<S> RecordStore for Arc<S>
where
    S: RecordStore + ?Sized,
{
    fn get_all(&self, collection: &str) -> Result<Vec<JsonValue>, StoreError> {
        (**self).get_all(collection)
    }

    fn replace_all(&self, collection: &str, records: Vec<JsonValue>) -> Result<(), StoreError> {
        (**self).replace_all(collection, records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collection_names_are_restricted() {
        assert!(validate_collection(DOCUMENTS).is_ok());
        assert!(validate_collection("time_entries-2026").is_ok());
        assert!(validate_collection("").is_err());
        assert!(validate_collection("../etc/passwd").is_err());
        assert!(validate_collection("Documents").is_err());
    }
}
