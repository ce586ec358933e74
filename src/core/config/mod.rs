use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::core::validation::validator::DEFAULT_README_SECTIONS;

/// Catalog configuration loaded from flowdoc.toml
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FlowdocConfig {
    /// Catalog layout
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// JSON Schema documents applied during validation
    #[serde(default)]
    pub schemas: SchemaConfig,

    /// README completeness rules
    #[serde(default)]
    pub readme: ReadmeConfig,
}

impl FlowdocConfig {
    /// Resolve a configured path against the catalog root.
    pub fn resolve(&self, root: &Path, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            root.join(path)
        }
    }

    /// Absolute location of the workflows directory.
    pub fn workflows_path(&self, root: &Path) -> PathBuf {
        self.resolve(root, &self.catalog.workflows_dir)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Directory holding `<category>/<workflow>/` folders
    #[serde(default = "default_workflows_dir")]
    pub workflows_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaConfig {
    #[serde(default = "default_workflow_schema")]
    pub workflow: Option<PathBuf>,

    #[serde(default = "default_metadata_schema")]
    pub metadata: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadmeConfig {
    /// Substrings a README should contain
    #[serde(default = "default_required_sections")]
    pub required_sections: Vec<String>,
}

fn default_workflows_dir() -> PathBuf {
    PathBuf::from("workflows")
}

fn default_workflow_schema() -> Option<PathBuf> {
    Some(PathBuf::from("schemas/workflow.schema.json"))
}

fn default_metadata_schema() -> Option<PathBuf> {
    Some(PathBuf::from("schemas/metadata.schema.json"))
}

fn default_required_sections() -> Vec<String> {
    DEFAULT_README_SECTIONS.iter().map(|s| s.to_string()).collect()
}

impl Default for CatalogConfig {
    fn default() -> Self {
        CatalogConfig {
            workflows_dir: default_workflows_dir(),
        }
    }
}

impl Default for SchemaConfig {
    fn default() -> Self {
        SchemaConfig {
            workflow: default_workflow_schema(),
            metadata: default_metadata_schema(),
        }
    }
}

impl Default for ReadmeConfig {
    fn default() -> Self {
        ReadmeConfig {
            required_sections: default_required_sections(),
        }
    }
}


pub mod loader;
pub mod validation;

pub use loader::ConfigLoader;
pub use validation::ConfigValidator;
