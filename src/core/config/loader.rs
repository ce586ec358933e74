#![allow(clippy::result_large_err)]

use super::FlowdocConfig;
use crate::core::error::AppError;
use crate::core::types::ErrorCategory;
use std::env;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "flowdoc.toml";

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config from the catalog root (root/flowdoc.toml)
    /// Environment variables override config file values
    pub fn load_from_root(root: &Path) -> Result<FlowdocConfig, AppError> {
        let config_path = root.join(CONFIG_FILE);
        let mut config = Self::load_from_file(&config_path)?.unwrap_or_default();

        Self::apply_env_overrides(&mut config);

        tracing::debug!(config = %config_path.display(), "loaded catalog configuration");
        Ok(config)
    }

    /// Load config from specific file path
    /// Returns Ok(None) if file doesn't exist
    pub fn load_from_file(path: &Path) -> Result<Option<FlowdocConfig>, AppError> {
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            AppError::new(
                ErrorCategory::IoError,
                format!("Failed to read config file {}: {}", path.display(), e),
            )
        })?;

        let config: FlowdocConfig = toml::from_str(&content).map_err(|e| {
            AppError::new(
                ErrorCategory::ConfigError,
                format!("Failed to parse config file {}: {}", path.display(), e),
            )
            .with_suggestion("Check flowdoc.toml against the documented [catalog], [schemas] and [readme] tables")
        })?;

        Ok(Some(config))
    }

    /// Environment variables take precedence over config file values.
    /// An empty schema variable disables that schema.
    pub fn apply_env_overrides(config: &mut FlowdocConfig) {
        if let Ok(dir) = env::var("FLOWDOC_WORKFLOWS_DIR") {
            config.catalog.workflows_dir = PathBuf::from(dir);
        }

        if let Ok(schema) = env::var("FLOWDOC_WORKFLOW_SCHEMA") {
            config.schemas.workflow = non_empty_path(schema);
        }

        if let Ok(schema) = env::var("FLOWDOC_METADATA_SCHEMA") {
            config.schemas.metadata = non_empty_path(schema);
        }
    }
}

fn non_empty_path(value: String) -> Option<PathBuf> {
    if value.trim().is_empty() {
        None
    } else {
        Some(PathBuf::from(value))
    }
}
