#![allow(clippy::result_large_err)]

use super::FlowdocConfig;
use crate::core::error::AppError;
use crate::core::types::ErrorCategory;

pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate configuration rules
    pub fn validate(config: &FlowdocConfig) -> Result<(), AppError> {
        if config.catalog.workflows_dir.as_os_str().is_empty() {
            return Err(AppError::new(
                ErrorCategory::ConfigError,
                "catalog.workflows_dir cannot be empty",
            ));
        }

        if config
            .readme
            .required_sections
            .iter()
            .any(|section| section.is_empty())
        {
            return Err(AppError::new(
                ErrorCategory::ConfigError,
                "readme.required_sections cannot contain empty entries",
            ));
        }

        Ok(())
    }
}
