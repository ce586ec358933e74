//! Persistence for metadata records.

use crate::core::catalog::METADATA_FILE;
use crate::utils::{FileUtils, JsonSerializer, Serializer};
use flowdoc_types::MetadataRecord;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("invalid JSON in {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("{} does not match the metadata layout: {source}", .path.display())]
    Shape {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("failed to serialize metadata: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("failed to write {}: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },
}

/// Sink that receives a metadata record after every completed migration step.
pub trait RecordStore {
    fn save(&mut self, record: &MetadataRecord) -> Result<(), StoreError>;
}

/// `metadata.json` inside a catalog folder.
///
/// The JSON object read by [`MetadataFile::load`] is kept, and every save
/// merges the record into it: keys keep their position, new keys are
/// appended, and keys the record has no value for (unknown nested keys,
/// explicit `null`s) stay as they were.
#[derive(Debug, Clone)]
pub struct MetadataFile {
    path: PathBuf,
    stored: Option<Map<String, Value>>,
}

impl MetadataFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            stored: None,
        }
    }

    pub fn in_folder(folder: &Path) -> Self {
        Self::new(folder.join(METADATA_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Read the stored JSON and cast it into a typed record.
    pub fn load(&mut self) -> Result<MetadataRecord, StoreError> {
        let bytes = FileUtils::read(&self.path).map_err(|source| StoreError::Read {
            path: self.path.clone(),
            source,
        })?;
        let value: Value = JsonSerializer
            .deserialize(&bytes)
            .map_err(|source| StoreError::Parse {
                path: self.path.clone(),
                source,
            })?;
        let record = MetadataRecord::deserialize(&value).map_err(|source| StoreError::Shape {
            path: self.path.clone(),
            source,
        })?;
        if let Value::Object(map) = value {
            self.stored = Some(map);
        }
        Ok(record)
    }
}

impl RecordStore for MetadataFile {
    fn save(&mut self, record: &MetadataRecord) -> Result<(), StoreError> {
        let Value::Object(fields) = serde_json::to_value(record).map_err(StoreError::Serialize)?
        else {
            return Err(StoreError::Serialize(serde::ser::Error::custom(
                "metadata record did not serialize to an object",
            )));
        };
        let mut merged = self.stored.clone().unwrap_or_default();
        merge_into(&mut merged, fields);

        let bytes = JsonSerializer
            .serialize(&merged)
            .map_err(StoreError::Serialize)?;
        FileUtils::write_atomic(&self.path, &bytes).map_err(|source| StoreError::Write {
            path: self.path.clone(),
            source,
        })?;
        self.stored = Some(merged);
        Ok(())
    }
}

fn merge_into(target: &mut Map<String, Value>, fields: Map<String, Value>) {
    for (key, value) in fields {
        match value {
            Value::Object(nested) => {
                if let Some(Value::Object(existing)) = target.get_mut(&key) {
                    merge_into(existing, nested);
                } else {
                    target.insert(key, Value::Object(nested));
                }
            }
            value => {
                target.insert(key, value);
            }
        }
    }
}

/// Keeps every saved snapshot in memory, in save order.
#[derive(Debug, Default)]
pub struct MemoryStore {
    pub snapshots: Vec<MetadataRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<&MetadataRecord> {
        self.snapshots.last()
    }
}

impl RecordStore for MemoryStore {
    fn save(&mut self, record: &MetadataRecord) -> Result<(), StoreError> {
        self.snapshots.push(record.clone());
        Ok(())
    }
}
