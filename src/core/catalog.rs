//! Catalog layout: `<workflows_dir>/<category>/<workflow>/`.

use crate::core::error::AppError;
use crate::core::types::ErrorCategory;
use std::fs;
use std::path::{Path, PathBuf};

pub const WORKFLOW_FILE: &str = "workflow.json";
pub const METADATA_FILE: &str = "metadata.json";
pub const README_FILE: &str = "README.md";

/// Files every workflow folder is expected to carry, in reporting order.
pub const REQUIRED_FILES: [&str; 3] = [WORKFLOW_FILE, README_FILE, METADATA_FILE];

/// One workflow folder found in the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowFolder {
    pub category: String,
    pub name: String,
    pub path: PathBuf,
}

impl WorkflowFolder {
    pub fn metadata_path(&self) -> PathBuf {
        self.path.join(METADATA_FILE)
    }
}

/// List every workflow folder under `workflows_dir`, categories first.
///
/// Both levels are sorted by directory name. Plain files at either level are
/// ignored.
pub fn discover(workflows_dir: &Path) -> Result<Vec<WorkflowFolder>, AppError> {
    if !workflows_dir.is_dir() {
        return Err(AppError::new(
            ErrorCategory::CatalogError,
            format!(
                "workflows directory not found: {}",
                workflows_dir.display()
            ),
        )
        .with_suggestion("Run from the catalog root or pass --root"));
    }

    let mut folders = Vec::new();
    for (category, category_path) in subdirectories(workflows_dir)? {
        for (name, path) in subdirectories(&category_path)? {
            folders.push(WorkflowFolder {
                category: category.clone(),
                name,
                path,
            });
        }
    }
    tracing::debug!(
        count = folders.len(),
        root = %workflows_dir.display(),
        "discovered workflow folders"
    );
    Ok(folders)
}

fn subdirectories(dir: &Path) -> Result<Vec<(String, PathBuf)>, AppError> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        entries.push((name, entry.path()));
    }
    entries.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(entries)
}
