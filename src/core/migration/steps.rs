//! Built-in metadata migration steps.
//!
//! Each step only fills gaps. Values that are already present are left
//! alone, which makes every step safe to re-apply.

use super::registry::MigrationStep;
use super::MigrationError;
use crate::core::version::Version;
use flowdoc_types::{
    is_missing, Complexity, MetadataRecord, Requirements, ResourceLevel, ResourceUsage,
};

pub const DEFAULT_CATEGORY: &str = "uncategorized";
pub const DEFAULT_EXECUTION_TIME: &str = "Unknown";
/// Placeholder recorded when the originating n8n release is unknown.
pub const DEFAULT_N8N_VERSION: &str = "1.0.0";
pub const DEFAULT_TRIGGER: &str = "manual";

pub fn builtin_steps() -> Vec<MigrationStep> {
    vec![
        MigrationStep::new(Version::from_segments(&[1, 0, 0]), to_v1_0_0),
        MigrationStep::new(Version::from_segments(&[1, 1, 0]), to_v1_1_0),
        MigrationStep::new(Version::from_segments(&[1, 2, 0]), to_v1_2_0),
    ]
}

/// Initial structure: category and tags.
pub fn to_v1_0_0(
    mut record: MetadataRecord,
    current: &Version,
) -> Result<MetadataRecord, MigrationError> {
    tracing::debug!(from = %current, "applying 1.0.0 migration");
    if is_missing(&record.category) {
        record.category = Some(DEFAULT_CATEGORY.to_string());
    }
    if record.tags.is_none() {
        record.tags = Some(Vec::new());
    }
    if is_missing(&record.version) {
        record.version = Some("1.0.0".to_string());
    }
    Ok(record)
}

/// Performance characteristics.
pub fn to_v1_1_0(
    mut record: MetadataRecord,
    current: &Version,
) -> Result<MetadataRecord, MigrationError> {
    tracing::debug!(from = %current, "applying 1.1.0 migration");
    if is_missing(&record.execution_time) {
        record.execution_time = Some(DEFAULT_EXECUTION_TIME.to_string());
    }
    if record.complexity.as_ref().map_or(true, Complexity::is_blank) {
        record.complexity = Some(Complexity::Medium);
    }
    if record.resources.is_none() {
        record.resources = Some(ResourceUsage {
            memory: Some(ResourceLevel::Medium),
            cpu: Some(ResourceLevel::Medium),
            storage: Some(ResourceLevel::Minimal),
        });
    }
    record.version = Some("1.1.0".to_string());
    Ok(record)
}

/// n8n version, requirement lists and triggers.
pub fn to_v1_2_0(
    mut record: MetadataRecord,
    current: &Version,
) -> Result<MetadataRecord, MigrationError> {
    tracing::debug!(from = %current, "applying 1.2.0 migration");
    if is_missing(&record.n8n_version) {
        record.n8n_version = Some(DEFAULT_N8N_VERSION.to_string());
    }

    let requirements = record.requirements.get_or_insert_with(Requirements::default);
    requirements.credentials.get_or_insert_with(Vec::new);
    requirements.nodes.get_or_insert_with(Vec::new);
    requirements.environment_variables.get_or_insert_with(Vec::new);

    if record.triggers.is_none() {
        record.triggers = Some(vec![DEFAULT_TRIGGER.to_string()]);
    }
    record.version = Some("1.2.0".to_string());
    Ok(record)
}
