use super::{MigrationError, MigrationRegistry};
use crate::core::catalog::{self, WorkflowFolder};
use crate::core::error::AppError;
use crate::core::store::{MetadataFile, RecordStore};
use crate::core::version::Version;
use flowdoc_types::MetadataRecord;
use serde::Serialize;
use std::path::Path;

/// Result of migrating a single record.
#[derive(Debug, Clone)]
pub struct MigrationOutcome {
    pub initial: Version,
    pub current: Version,
    /// Versions applied, in order. Empty when the record was already current.
    pub applied: Vec<Version>,
    pub record: MetadataRecord,
}

impl MigrationOutcome {
    pub fn changed(&self) -> bool {
        !self.applied.is_empty()
    }
}

/// Tally printed at the end of a collection run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MigrationSummary {
    pub migrated: usize,
    pub skipped: usize,
    pub failed: usize,
    pub total: usize,
}

/// Progress reported while a single record is walked forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrationEvent<'v> {
    /// The record's stored version, before any step runs.
    Started(&'v Version),
    /// A step completed and the record was saved at `to`.
    Applied { from: &'v Version, to: &'v Version },
}

/// What happened to one folder during a collection run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FolderMigration {
    Migrated { from: String, to: String },
    UpToDate { version: String },
    MissingMetadata,
    Failed { error: String },
}

#[derive(Debug, Clone, Default)]
pub struct MigrationReport {
    pub folders: Vec<(WorkflowFolder, FolderMigration)>,
    pub summary: MigrationSummary,
}

impl MigrationReport {
    fn record(&mut self, folder: WorkflowFolder, status: FolderMigration) {
        match status {
            FolderMigration::Migrated { .. } => self.summary.migrated += 1,
            FolderMigration::UpToDate { .. } | FolderMigration::MissingMetadata => {
                self.summary.skipped += 1
            }
            FolderMigration::Failed { .. } => self.summary.failed += 1,
        }
        self.summary.total += 1;
        self.folders.push((folder, status));
    }
}

/// Applies registry steps to metadata records.
pub struct Migrator<'a> {
    registry: &'a MigrationRegistry,
}

impl<'a> Migrator<'a> {
    pub fn new(registry: &'a MigrationRegistry) -> Self {
        Self { registry }
    }

    /// Step `record` forward until no registered version applies.
    ///
    /// After each step the record's `version` is set to the step's target and
    /// the record is saved to `store` exactly once. The first failing step
    /// aborts the walk; whatever `store` last received stays the latest
    /// persisted state.
    pub fn migrate<S: RecordStore>(
        &self,
        record: MetadataRecord,
        store: &mut S,
        target: Option<&Version>,
    ) -> Result<MigrationOutcome, MigrationError> {
        self.migrate_observed(record, store, target, |_| {})
    }

    /// [`Migrator::migrate`], reporting each saved step to `on_event` as it
    /// happens, so steps persisted before a failure are still seen.
    pub fn migrate_observed<S, F>(
        &self,
        mut record: MetadataRecord,
        store: &mut S,
        target: Option<&Version>,
        mut on_event: F,
    ) -> Result<MigrationOutcome, MigrationError>
    where
        S: RecordStore,
        F: FnMut(MigrationEvent<'_>),
    {
        let initial = Version::parse(record.version_or_initial())?;
        on_event(MigrationEvent::Started(&initial));
        let mut current = initial.clone();
        let mut applied = Vec::new();

        while let Some(next) = self.registry.next_version(&current, target) {
            let next = next.clone();
            let step = self
                .registry
                .get(&next)
                .ok_or_else(|| MigrationError::UnknownStep(next.to_string()))?;

            record = step(record, &current).map_err(|err| {
                tracing::error!(from = %current, to = %next, error = %err, "migration step failed");
                err
            })?;
            record.version = Some(next.to_string());
            store.save(&record)?;

            tracing::info!(from = %current, to = %next, "migrated metadata");
            on_event(MigrationEvent::Applied {
                from: &current,
                to: &next,
            });
            applied.push(next.clone());
            current = next;
        }

        Ok(MigrationOutcome {
            initial,
            current,
            applied,
            record,
        })
    }

    /// Migrate the `metadata.json` inside `folder` in place.
    pub fn migrate_folder(
        &self,
        folder: &Path,
        target: Option<&Version>,
    ) -> Result<MigrationOutcome, MigrationError> {
        self.migrate_folder_observed(folder, target, |_| {})
    }

    pub fn migrate_folder_observed<F>(
        &self,
        folder: &Path,
        target: Option<&Version>,
        on_event: F,
    ) -> Result<MigrationOutcome, MigrationError>
    where
        F: FnMut(MigrationEvent<'_>),
    {
        let mut file = MetadataFile::in_folder(folder);
        if !file.exists() {
            return Err(MigrationError::MissingMetadata(folder.to_path_buf()));
        }
        let record = file.load()?;
        let span = tracing::info_span!("migrate", folder = %folder.display());
        let _entered = span.enter();
        self.migrate_observed(record, &mut file, target, on_event)
    }

    /// Migrate every folder under `workflows_dir`, one at a time.
    ///
    /// A failing folder is recorded and the run moves on; only a missing
    /// catalog root is an error.
    pub fn migrate_all(
        &self,
        workflows_dir: &Path,
        target: Option<&Version>,
    ) -> Result<MigrationReport, AppError> {
        let mut report = MigrationReport::default();
        for folder in catalog::discover(workflows_dir)? {
            let status = self.migrate_catalog_folder(&folder.path, target);
            report.record(folder, status);
        }
        tracing::info!(
            migrated = report.summary.migrated,
            skipped = report.summary.skipped,
            failed = report.summary.failed,
            "migration run finished"
        );
        Ok(report)
    }

    fn migrate_catalog_folder(&self, path: &Path, target: Option<&Version>) -> FolderMigration {
        if !MetadataFile::in_folder(path).exists() {
            tracing::warn!(folder = %path.display(), "skipping folder without metadata.json");
            return FolderMigration::MissingMetadata;
        }
        match self.migrate_folder(path, target) {
            Ok(outcome) if outcome.changed() => FolderMigration::Migrated {
                from: outcome.initial.to_string(),
                to: outcome.current.to_string(),
            },
            Ok(outcome) => FolderMigration::UpToDate {
                version: outcome.current.to_string(),
            },
            Err(err) => {
                tracing::warn!(folder = %path.display(), error = %err, "migration failed");
                FolderMigration::Failed {
                    error: err.to_string(),
                }
            }
        }
    }
}
