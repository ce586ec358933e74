use super::{steps, MigrationError};
use crate::core::version::Version;
use flowdoc_types::MetadataRecord;
use indexmap::IndexMap;

/// Step function: takes the record and the version it is currently at.
pub type MigrationFn = fn(MetadataRecord, &Version) -> Result<MetadataRecord, MigrationError>;

/// A target version paired with the function that reaches it.
#[derive(Clone)]
pub struct MigrationStep {
    pub target: Version,
    pub apply: MigrationFn,
}

impl MigrationStep {
    pub fn new(target: Version, apply: MigrationFn) -> Self {
        Self { target, apply }
    }
}

impl std::fmt::Debug for MigrationStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MigrationStep")
            .field("target", &self.target)
            .finish_non_exhaustive()
    }
}

/// Immutable table of migration steps keyed by target version.
///
/// Insertion order carries no meaning; every lookup sorts by version.
#[derive(Debug, Clone)]
pub struct MigrationRegistry {
    steps: IndexMap<Version, MigrationStep>,
}

impl MigrationRegistry {
    /// Registry holding the built-in `1.0.0`, `1.1.0` and `1.2.0` steps.
    pub fn builtin() -> Self {
        let mut table = IndexMap::new();
        for step in steps::builtin_steps() {
            table.insert(step.target.clone(), step);
        }
        Self { steps: table }
    }

    /// Build a registry from arbitrary steps. Two steps for the same version
    /// (including `1.0` vs `1.0.0`) are rejected.
    pub fn from_steps(
        steps: impl IntoIterator<Item = MigrationStep>,
    ) -> Result<Self, MigrationError> {
        let mut table = IndexMap::new();
        for step in steps {
            if table.contains_key(&step.target) {
                return Err(MigrationError::DuplicateStep(step.target.to_string()));
            }
            table.insert(step.target.clone(), step);
        }
        Ok(Self { steps: table })
    }

    /// All registered versions, ascending.
    pub fn versions(&self) -> Vec<&Version> {
        let mut versions: Vec<&Version> = self.steps.keys().collect();
        versions.sort();
        versions
    }

    /// Smallest registered version above `current` and not above `target`.
    pub fn next_version(&self, current: &Version, target: Option<&Version>) -> Option<&Version> {
        self.versions().into_iter().find(|candidate| {
            *candidate > current && target.map_or(true, |target| *candidate <= target)
        })
    }

    pub fn get(&self, version: &Version) -> Option<MigrationFn> {
        self.steps.get(version).map(|step| step.apply)
    }
}
