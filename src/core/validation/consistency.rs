//! Cross-record checks: workflow names must be unique across the catalog.

use crate::core::catalog::WorkflowFolder;
use indexmap::IndexMap;
use serde_json::Value;
use std::fs;
use std::path::PathBuf;

/// A name claimed by more than one folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateName {
    pub name: String,
    /// Folders using the name, in discovery order.
    pub paths: Vec<PathBuf>,
}

#[derive(Debug, Clone, Default)]
pub struct ConsistencyReport {
    pub duplicates: Vec<DuplicateName>,
    /// Folders whose metadata carried a usable name.
    pub scanned: usize,
    /// Metadata files that could not be read or parsed.
    pub skipped: Vec<(PathBuf, String)>,
}

impl ConsistencyReport {
    pub fn is_consistent(&self) -> bool {
        self.duplicates.is_empty()
    }
}

/// Group folders by metadata `name` and report every name used twice or more.
///
/// Folders without metadata, or whose metadata has no non-empty string name,
/// take no part in the check.
pub fn check_consistency(folders: &[WorkflowFolder]) -> ConsistencyReport {
    let mut report = ConsistencyReport::default();
    let mut by_name: IndexMap<String, Vec<PathBuf>> = IndexMap::new();

    for folder in folders {
        let path = folder.metadata_path();
        if !path.is_file() {
            continue;
        }
        let metadata = match fs::read_to_string(&path)
            .map_err(|err| err.to_string())
            .and_then(|content| serde_json::from_str::<Value>(&content).map_err(|err| err.to_string()))
        {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "skipping unreadable metadata");
                report.skipped.push((path, err));
                continue;
            }
        };

        let Some(name) = metadata
            .get("name")
            .and_then(Value::as_str)
            .filter(|name| !name.is_empty())
        else {
            continue;
        };
        report.scanned += 1;
        by_name
            .entry(name.to_string())
            .or_default()
            .push(folder.path.clone());
    }

    report.duplicates = by_name
        .into_iter()
        .filter(|(_, paths)| paths.len() > 1)
        .map(|(name, paths)| DuplicateName { name, paths })
        .collect();
    report
}
