pub mod catalog;
pub mod config;
pub mod error;
pub mod ingest;
pub mod migration;
pub mod store;
pub mod types;
pub mod validation;
pub mod version;

pub use catalog::{discover, WorkflowFolder};
pub use config::{ConfigLoader, ConfigValidator, FlowdocConfig};
pub use error::AppError;
pub use migration::{MigrationError, MigrationRegistry, Migrator};
pub use store::{MetadataFile, RecordStore, StoreError};
pub use types::*;
pub use validation::{check_consistency, WorkflowValidator};
pub use version::{compare_versions, Version, VersionError};
