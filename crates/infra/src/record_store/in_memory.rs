use std::collections::HashMap;
use std::sync::RwLock;

use serde_json::Value as JsonValue;

use super::{RecordStore, StoreError, validate_collection};

/// In-memory record store for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryRecordStore {
    inner: RwLock<HashMap<String, Vec<JsonValue>>>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordStore for InMemoryRecordStore {
    fn get_all(&self, collection: &str) -> Result<Vec<JsonValue>, StoreError> {
        validate_collection(collection)?;
        let map = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        Ok(map.get(collection).cloned().unwrap_or_default())
    }

    fn replace_all(&self, collection: &str, records: Vec<JsonValue>) -> Result<(), StoreError> {
        validate_collection(collection)?;
        let mut map = self.inner.write().map_err(|_| StoreError::Poisoned)?;
        map.insert(collection.to_string(), records);
        Ok(())
    }
}
