//! Turn generated metadata text into a `metadata.json` the catalog accepts.
//!
//! The generator is an external collaborator; its output arrives as a raw
//! text blob that may be wrapped in a Markdown code fence and may use values
//! outside the catalog vocabulary.

use crate::core::catalog::WORKFLOW_FILE;
use crate::core::store::{MetadataFile, RecordStore, StoreError};
use flowdoc_types::{Complexity, MetadataRecord, ResourceLevel};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use thiserror::Error;

const EXCERPT_CHARS: usize = 200;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("workflow.json not found in {}", .0.display())]
    MissingWorkflow(PathBuf),
    #[error("Generated metadata is not valid JSON: {message} (starts with: {excerpt}...)")]
    InvalidJson { message: String, excerpt: String },
    #[error("Generated metadata must be a JSON object")]
    NotAnObject,
    #[error("Generated metadata does not fit the metadata record: {0}")]
    Shape(#[source] serde_json::Error),
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportOutcome {
    Written(PathBuf),
    /// `metadata.json` was already present and overwriting was not requested.
    SkippedExisting(PathBuf),
}

/// Remove a leading ```` ```json ```` or ```` ``` ```` fence and its closing fence.
pub fn strip_code_fence(raw: &str) -> &str {
    let text = raw.trim();
    let inner = if let Some(rest) = text.strip_prefix("```json") {
        rest
    } else if let Some(rest) = text.strip_prefix("```") {
        rest
    } else {
        return text;
    };
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

/// Parse generated text into a JSON object.
pub fn parse_generated_metadata(raw: &str) -> Result<Map<String, Value>, IngestError> {
    let text = strip_code_fence(raw);
    let value: Value = serde_json::from_str(text).map_err(|err| IngestError::InvalidJson {
        message: err.to_string(),
        excerpt: text.chars().take(EXCERPT_CHARS).collect(),
    })?;
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(IngestError::NotAnObject),
    }
}

/// Repair generated values so they fit the catalog vocabulary.
///
/// Only keys that are present are touched. Empty enum-valued keys are
/// dropped so the result still fits `MetadataRecord`.
pub fn normalize_metadata(metadata: &mut Map<String, Value>) {
    if let Some(Value::String(name)) = metadata.get_mut("name") {
        let cleaned: String = name
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace() || *c == '-' || *c == '_')
            .collect();
        *name = cleaned.trim().to_string();
    }

    if let Some(Value::Array(tags)) = metadata.get_mut("tags") {
        for tag in tags.iter_mut() {
            if let Value::String(text) = tag {
                *text = kebab_case(text);
            }
        }
    }

    if let Some(Value::Array(triggers)) = metadata.get_mut("triggers") {
        for trigger in triggers.iter_mut() {
            if let Value::String(text) = trigger {
                *text = text.to_lowercase();
            }
        }
    }

    if let Some(complexity) = metadata.get("complexity") {
        if is_present(complexity) {
            let level = complexity
                .as_str()
                .and_then(Complexity::parse_loose)
                .unwrap_or(Complexity::Medium);
            metadata.insert("complexity".to_string(), level.as_str().into());
        } else {
            metadata.shift_remove("complexity");
        }
    }

    if let Some(Value::Object(resources)) = metadata.get_mut("resources") {
        for (key, fallback) in [
            ("memory", ResourceLevel::Low),
            ("cpu", ResourceLevel::Medium),
            ("storage", ResourceLevel::Minimal),
        ] {
            let Some(level) = resources.get(key) else {
                continue;
            };
            if is_present(level) {
                let parsed = level
                    .as_str()
                    .and_then(ResourceLevel::parse_loose)
                    .unwrap_or(fallback);
                resources.insert(key.to_string(), parsed.as_str().into());
            } else {
                resources.shift_remove(key);
            }
        }
    }
}

/// Parse, normalize and write generated metadata into `folder`.
pub fn import_generated_metadata(
    folder: &Path,
    raw: &str,
    force: bool,
) -> Result<ImportOutcome, IngestError> {
    if !folder.join(WORKFLOW_FILE).is_file() {
        return Err(IngestError::MissingWorkflow(folder.to_path_buf()));
    }

    let mut file = MetadataFile::in_folder(folder);
    if file.exists() && !force {
        tracing::info!(path = %file.path().display(), "metadata.json already exists, skipping");
        return Ok(ImportOutcome::SkippedExisting(file.path().to_path_buf()));
    }

    let mut metadata = parse_generated_metadata(raw)?;
    normalize_metadata(&mut metadata);
    let record: MetadataRecord =
        serde_json::from_value(Value::Object(metadata)).map_err(IngestError::Shape)?;

    file.save(&record)?;
    tracing::info!(path = %file.path().display(), "wrote generated metadata");
    Ok(ImportOutcome::Written(file.path().to_path_buf()))
}

fn kebab_case(tag: &str) -> String {
    let mut out = String::with_capacity(tag.len());
    for c in tag.to_lowercase().chars() {
        let c = if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' {
            c
        } else {
            '-'
        };
        if c == '-' && out.ends_with('-') {
            continue;
        }
        out.push(c);
    }
    out.trim_matches('-').to_string()
}

fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}
