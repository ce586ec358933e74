//! Versioned metadata migrations.
//!
//! A [`MigrationRegistry`] maps target versions to pure step functions. The
//! [`Migrator`] walks a record from its stored version to the newest (or
//! requested) version one step at a time, persisting after every step so an
//! aborted run leaves the record at the last version that fully applied.

pub mod driver;
pub mod registry;
pub mod steps;

pub use driver::{
    FolderMigration, MigrationEvent, MigrationOutcome, MigrationReport, MigrationSummary, Migrator,
};
pub use registry::{MigrationFn, MigrationRegistry, MigrationStep};

use crate::core::store::StoreError;
use crate::core::version::VersionError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("metadata.json not found in {}", .0.display())]
    MissingMetadata(PathBuf),
    #[error(transparent)]
    Version(#[from] VersionError),
    #[error("migration to {version} failed: {reason}")]
    StepFailed { version: String, reason: String },
    #[error("no migration registered for version {0}")]
    UnknownStep(String),
    #[error("duplicate migration registered for version {0}")]
    DuplicateStep(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}
