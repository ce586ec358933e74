use super::lint::LintRegistry;
use crate::core::catalog::{self, WorkflowFolder, METADATA_FILE, README_FILE, REQUIRED_FILES, WORKFLOW_FILE};
use crate::core::config::FlowdocConfig;
use crate::core::error::AppError;
use flowdoc_types::{ValidationResult, WorkflowRecord};
use jsonschema::Validator;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use thiserror::Error;

/// Metadata keys that must hold a non-empty value.
pub const REQUIRED_METADATA_FIELDS: [&str; 4] = ["name", "description", "version", "category"];

/// Section markers a rendered README is expected to contain.
pub const DEFAULT_README_SECTIONS: [&str; 6] = [
    "# ",
    "## Overview",
    "## Technical Specification",
    "### Input Requirements",
    "### Processing Logic",
    "### Output Specification",
];

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("could not read schema {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("schema {} is not valid JSON: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("schema {} could not be compiled: {message}", .path.display())]
    Compile { path: PathBuf, message: String },
}

/// Counts printed at the end of a collection run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ValidationSummary {
    pub valid: usize,
    pub invalid: usize,
    pub total: usize,
}

#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub folders: Vec<(WorkflowFolder, ValidationResult)>,
    pub summary: ValidationSummary,
}

impl ValidationReport {
    pub fn all_valid(&self) -> bool {
        self.summary.invalid == 0
    }
}

/// Checks catalog folders for missing artifacts, malformed JSON, required
/// metadata fields, optional JSON Schema conformance and README sections.
pub struct WorkflowValidator {
    workflow_schema: Option<Validator>,
    metadata_schema: Option<Validator>,
    readme_sections: Vec<String>,
    lint: LintRegistry,
}

impl WorkflowValidator {
    /// Validator without external schemas and with the default README sections.
    pub fn new() -> Self {
        Self {
            workflow_schema: None,
            metadata_schema: None,
            readme_sections: DEFAULT_README_SECTIONS.iter().map(|s| s.to_string()).collect(),
            lint: LintRegistry::new(),
        }
    }

    /// Build from configuration, resolving schema paths against `root`.
    ///
    /// Schemas that do not exist are not applied. Schemas that exist but
    /// cannot be loaded are logged and skipped.
    pub fn from_config(config: &FlowdocConfig, root: &Path) -> Self {
        let mut validator = Self::new();
        validator.readme_sections = config.readme.required_sections.clone();
        validator.workflow_schema = config
            .schemas
            .workflow
            .as_ref()
            .and_then(|path| load_or_warn(&config.resolve(root, path)));
        validator.metadata_schema = config
            .schemas
            .metadata
            .as_ref()
            .and_then(|path| load_or_warn(&config.resolve(root, path)));
        validator
    }

    pub fn with_workflow_schema(mut self, schema: &Value) -> Result<Self, SchemaError> {
        self.workflow_schema = Some(compile_schema(Path::new("<inline>"), schema)?);
        Ok(self)
    }

    pub fn with_metadata_schema(mut self, schema: &Value) -> Result<Self, SchemaError> {
        self.metadata_schema = Some(compile_schema(Path::new("<inline>"), schema)?);
        Ok(self)
    }

    /// Run every folder check. Each check runs regardless of earlier failures.
    pub fn validate_folder(&self, folder: &Path) -> ValidationResult {
        let mut result = ValidationResult::new();

        let missing: Vec<&str> = REQUIRED_FILES
            .iter()
            .copied()
            .filter(|file| !folder.join(file).is_file())
            .collect();
        if !missing.is_empty() {
            result.error(format!("Missing required files: {}", missing.join(", ")));
        }

        self.check_workflow(&folder.join(WORKFLOW_FILE), &mut result);
        self.check_metadata(&folder.join(METADATA_FILE), &mut result);
        self.check_readme(&folder.join(README_FILE), &mut result);

        tracing::debug!(
            folder = %folder.display(),
            valid = result.valid,
            errors = result.errors.len(),
            warnings = result.warnings.len(),
            "validated folder"
        );
        result
    }

    /// Validate every folder under `workflows_dir`.
    pub fn validate_all(&self, workflows_dir: &Path) -> Result<ValidationReport, AppError> {
        let mut report = ValidationReport::default();
        for folder in catalog::discover(workflows_dir)? {
            let result = self.validate_folder(&folder.path);
            if result.valid {
                report.summary.valid += 1;
            } else {
                report.summary.invalid += 1;
            }
            report.summary.total += 1;
            report.folders.push((folder, result));
        }
        tracing::info!(
            valid = report.summary.valid,
            invalid = report.summary.invalid,
            "validation run finished"
        );
        Ok(report)
    }

    fn check_workflow(&self, path: &Path, result: &mut ValidationResult) {
        if !path.is_file() {
            return;
        }
        let workflow = match read_json(path) {
            Ok(value) => value,
            Err(message) => {
                result.error(format!("Invalid JSON in {}: {}", WORKFLOW_FILE, message));
                return;
            }
        };

        if !workflow.get("nodes").is_some_and(Value::is_array) {
            result.error("workflow.json must contain a nodes array");
        }
        if !workflow.get("connections").is_some_and(is_truthy) {
            result.warning("workflow.json should contain connections object");
        }
        if let Some(details) = self
            .workflow_schema
            .as_ref()
            .and_then(|schema| schema_violations(schema, &workflow))
        {
            result.error(format!("Workflow schema validation failed: {}", details));
        }

        if let Ok(record) = serde_json::from_value::<WorkflowRecord>(workflow) {
            for finding in self.lint.run(&record) {
                result.warning(finding.to_string());
            }
        }
    }

    fn check_metadata(&self, path: &Path, result: &mut ValidationResult) {
        if !path.is_file() {
            return;
        }
        let metadata = match read_json(path) {
            Ok(value) => value,
            Err(message) => {
                result.error(format!("Invalid JSON in {}: {}", METADATA_FILE, message));
                return;
            }
        };

        let missing: Vec<&str> = REQUIRED_METADATA_FIELDS
            .iter()
            .copied()
            .filter(|field| !metadata.get(*field).is_some_and(is_truthy))
            .collect();
        if !missing.is_empty() {
            result.error(format!(
                "Missing required metadata fields: {}",
                missing.join(", ")
            ));
        }

        if let Some(version) = metadata.get("version").filter(|v| is_truthy(v)) {
            let text = match version {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            if !semver_pattern().is_match(&text) {
                result.warning("Version should follow semantic versioning (x.y.z)");
            }
        }

        if let Some(details) = self
            .metadata_schema
            .as_ref()
            .and_then(|schema| schema_violations(schema, &metadata))
        {
            result.error(format!("Metadata schema validation failed: {}", details));
        }
    }

    fn check_readme(&self, path: &Path, result: &mut ValidationResult) {
        if !path.is_file() {
            return;
        }
        let content = match fs::read(path) {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(err) => {
                result.warning(format!("Could not read {}: {}", README_FILE, err));
                return;
            }
        };

        let missing: Vec<&str> = self
            .readme_sections
            .iter()
            .map(String::as_str)
            .filter(|section| !content.contains(section))
            .collect();
        if !missing.is_empty() {
            result.warning(format!(
                "README.md missing recommended sections: {}",
                missing.join(", ")
            ));
        }
    }
}

impl Default for WorkflowValidator {
    fn default() -> Self {
        Self::new()
    }
}

/// Load and compile a JSON Schema document. A missing file yields `None`.
pub fn load_schema(path: &Path) -> Result<Option<Validator>, SchemaError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path).map_err(|source| SchemaError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let schema: Value = serde_json::from_str(&content).map_err(|source| SchemaError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    compile_schema(path, &schema).map(Some)
}

fn load_or_warn(path: &Path) -> Option<Validator> {
    match load_schema(path) {
        Ok(Some(validator)) => {
            tracing::debug!(schema = %path.display(), "loaded schema");
            Some(validator)
        }
        Ok(None) => None,
        Err(err) => {
            tracing::warn!("Could not load schema {}: {}", path.display(), err);
            None
        }
    }
}

fn compile_schema(path: &Path, schema: &Value) -> Result<Validator, SchemaError> {
    Validator::new(schema).map_err(|err| SchemaError::Compile {
        path: path.to_path_buf(),
        message: err.to_string(),
    })
}

fn schema_violations(schema: &Validator, instance: &Value) -> Option<String> {
    let errors: Vec<String> = schema.iter_errors(instance).map(|e| e.to_string()).collect();
    if errors.is_empty() {
        None
    } else {
        Some(errors.join(", "))
    }
}

fn read_json(path: &Path) -> Result<Value, String> {
    let content = fs::read_to_string(path).map_err(|err| err.to_string())?;
    serde_json::from_str(&content).map_err(|err| err.to_string())
}

/// Presence test used for required keys: null, false, 0 and "" count as absent.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn semver_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[0-9]+\.[0-9]+\.[0-9]+$").expect("semver pattern compiles"))
}
