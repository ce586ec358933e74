//! Folder validation and cross-record consistency checks.

pub mod consistency;
pub mod lint;
pub mod validator;

pub use consistency::{check_consistency, ConsistencyReport, DuplicateName};
pub use lint::{LintRegistry, LintResult, WorkflowLintRule};
pub use validator::{ValidationReport, ValidationSummary, WorkflowValidator};
pub use flowdoc_types::ValidationResult;
