//! Record shapes shared by the flowdoc migration and validation engines.
//!
//! Everything here mirrors what is persisted inside a catalog folder:
//! `metadata.json` ([`MetadataRecord`]), `workflow.json` ([`WorkflowRecord`])
//! and the transient outcome of checking a folder ([`ValidationResult`]).

pub mod metadata;
pub mod validation;
pub mod workflow;

pub use metadata::{
    is_missing, Complexity, MetadataRecord, Requirements, ResourceLevel, ResourceUsage,
    INITIAL_VERSION,
};
pub use validation::ValidationResult;
pub use workflow::{ConnectionTarget, WorkflowConnections, WorkflowNode, WorkflowRecord};
