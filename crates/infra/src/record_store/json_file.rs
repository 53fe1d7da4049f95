//! File-backed record store: one `<collection>.json` array per collection.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde_json::Value as JsonValue;
use tracing::debug;

use super::{RecordStore, StoreError, validate_collection};

/// Stores each collection as a pretty-printed JSON array under `data_dir`.
///
/// Writes go to a sibling temp file first and are renamed into place, so a
/// crash mid-write leaves the previous collection intact.
#[derive(Debug, Clone)]
pub struct JsonFileRecordStore {
    data_dir: PathBuf,
}

impl JsonFileRecordStore {
    /// Open (and create if needed) a data directory.
    pub fn open(data_dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let data_dir = data_dir.into();
        fs::create_dir_all(&data_dir).map_err(|e| StoreError::io("<data_dir>", e))?;
        Ok(Self { data_dir })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn path_of(&self, collection: &str) -> PathBuf {
        self.data_dir.join(format!("{collection}.json"))
    }
}

impl RecordStore for JsonFileRecordStore {
    fn get_all(&self, collection: &str) -> Result<Vec<JsonValue>, StoreError> {
        validate_collection(collection)?;
        let path = self.path_of(collection);

        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(collection, "collection file missing, treating as empty");
                return Ok(Vec::new());
            }
            Err(e) => return Err(StoreError::io(collection, e)),
        };

        let records: Vec<JsonValue> = serde_json::from_slice(&bytes)
            .map_err(|e| StoreError::serialization(collection, e))?;
        debug!(collection, count = records.len(), "loaded collection");
        Ok(records)
    }

    fn replace_all(&self, collection: &str, records: Vec<JsonValue>) -> Result<(), StoreError> {
        validate_collection(collection)?;
        let path = self.path_of(collection);
        let tmp = self.data_dir.join(format!(".{collection}.json.tmp"));

        let bytes = serde_json::to_vec_pretty(&records)
            .map_err(|e| StoreError::serialization(collection, e))?;
        fs::write(&tmp, bytes).map_err(|e| StoreError::io(collection, e))?;
        fs::rename(&tmp, &path).map_err(|e| StoreError::io(collection, e))?;

        debug!(collection, count = records.len(), "wrote collection");
        Ok(())
    }
}
