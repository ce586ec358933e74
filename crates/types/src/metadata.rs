use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Version assumed for a record that has never been migrated.
pub const INITIAL_VERSION: &str = "0.0.0";

/// Returns `true` when an optional string field counts as absent.
///
/// Empty strings are treated the same as a missing key; catalogs written by
/// older tooling use `""` as a placeholder.
pub fn is_missing(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, str::is_empty)
}

/// Persisted description of a single workflow (`metadata.json`).
///
/// All fields are optional on read so that records from every schema
/// generation deserialize. Keys this type does not know about are kept in
/// `extra` and written back untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetadataRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub n8n_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requirements: Option<Requirements>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub triggers: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complexity: Option<Complexity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<ResourceUsage>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MetadataRecord {
    /// The stored schema version, or [`INITIAL_VERSION`] when none is recorded.
    pub fn version_or_initial(&self) -> &str {
        match self.version.as_deref() {
            Some(version) if !version.is_empty() => version,
            _ => INITIAL_VERSION,
        }
    }
}

/// Credentials, node types and environment variables a workflow needs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirements {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credentials: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nodes: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment_variables: Option<Vec<String>>,
}

/// Rough workflow complexity bucket.
///
/// Values outside the catalog vocabulary are kept verbatim in `Other` so a
/// record written by hand survives a migration unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Complexity {
    Simple,
    Medium,
    Complex,
    Other(String),
}

impl Complexity {
    pub const ALL: [Complexity; 3] = [Complexity::Simple, Complexity::Medium, Complexity::Complex];

    pub fn as_str(&self) -> &str {
        match self {
            Complexity::Simple => "simple",
            Complexity::Medium => "medium",
            Complexity::Complex => "complex",
            Complexity::Other(value) => value,
        }
    }

    /// `true` for the empty string, which older catalogs use as "unset".
    pub fn is_blank(&self) -> bool {
        self.as_str().is_empty()
    }

    /// Case-insensitive lookup used when repairing generated metadata.
    pub fn parse_loose(value: &str) -> Option<Self> {
        let lowered = value.trim().to_lowercase();
        Self::ALL.into_iter().find(|c| c.as_str() == lowered)
    }
}

impl From<String> for Complexity {
    fn from(value: String) -> Self {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == value)
            .unwrap_or(Complexity::Other(value))
    }
}

impl From<Complexity> for String {
    fn from(value: Complexity) -> Self {
        match value {
            Complexity::Other(value) => value,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Complexity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resource demand level for memory, cpu and storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ResourceLevel {
    Minimal,
    Low,
    Medium,
    High,
    VeryHigh,
    Other(String),
}

impl ResourceLevel {
    pub const ALL: [ResourceLevel; 5] = [
        ResourceLevel::Minimal,
        ResourceLevel::Low,
        ResourceLevel::Medium,
        ResourceLevel::High,
        ResourceLevel::VeryHigh,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            ResourceLevel::Minimal => "minimal",
            ResourceLevel::Low => "low",
            ResourceLevel::Medium => "medium",
            ResourceLevel::High => "high",
            ResourceLevel::VeryHigh => "very-high",
            ResourceLevel::Other(value) => value,
        }
    }

    pub fn parse_loose(value: &str) -> Option<Self> {
        let lowered = value.trim().to_lowercase();
        Self::ALL.into_iter().find(|level| level.as_str() == lowered)
    }
}

impl From<String> for ResourceLevel {
    fn from(value: String) -> Self {
        Self::ALL
            .into_iter()
            .find(|level| level.as_str() == value)
            .unwrap_or(ResourceLevel::Other(value))
    }
}

impl From<ResourceLevel> for String {
    fn from(value: ResourceLevel) -> Self {
        match value {
            ResourceLevel::Other(value) => value,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for ResourceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceUsage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory: Option<ResourceLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu: Option<ResourceLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage: Option<ResourceLevel>,
}
