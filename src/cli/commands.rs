use crate::cli::args::{ImportArgs, MigrateArgs, ValidateArgs};
use crate::cli::CommandStatus;
use crate::core::catalog::{self, WorkflowFolder};
use crate::core::config::{ConfigLoader, ConfigValidator, FlowdocConfig};
use crate::core::ingest::{self, ImportOutcome};
use crate::core::migration::{
    FolderMigration, MigrationEvent, MigrationRegistry, MigrationReport, Migrator,
};
use crate::core::validation::{check_consistency, ConsistencyReport, ValidationReport, WorkflowValidator};
use crate::core::version::Version;
use crate::Result;
use anyhow::Context;
use flowdoc_types::ValidationResult;
use std::env;
use std::fmt::Write as _;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

pub fn migrate(args: MigrateArgs) -> Result<CommandStatus> {
    let registry = MigrationRegistry::builtin();
    if args.list_versions {
        print!("{}", render_version_list(&registry));
        return Ok(CommandStatus::Success);
    }

    let target = args
        .target
        .as_deref()
        .map(Version::parse)
        .transpose()
        .context("--target must be a dotted numeric version such as 1.1.0")?;
    let migrator = Migrator::new(&registry);

    if let Some(path) = args.path {
        return migrate_single(&migrator, &path, target.as_ref());
    }

    let root = catalog_root(args.root)?;
    let config = load_config(&root)?;
    let workflows_dir = config.workflows_path(&root);

    println!("Starting migration for all workflows...");
    if let Some(target) = &target {
        println!("Target version: {}", target);
    }
    println!();

    let report = migrator.migrate_all(&workflows_dir, target.as_ref())?;
    print!("{}", render_migration_report(&report));
    Ok(CommandStatus::from_success(report.summary.failed == 0))
}

fn migrate_single(migrator: &Migrator<'_>, path: &Path, target: Option<&Version>) -> Result<CommandStatus> {
    println!("Starting migration for {}", folder_label(path));
    let result = migrator.migrate_folder_observed(path, target, |event| match event {
        MigrationEvent::Started(version) => println!("Current version: {}", version),
        MigrationEvent::Applied { to, .. } => println!("Migrated to {}", to),
    });
    match result {
        Ok(outcome) => {
            println!("Migration complete. Final version: {}", outcome.current);
            Ok(CommandStatus::Success)
        }
        Err(err) => {
            eprintln!("Error: {}", err);
            Ok(CommandStatus::Failure)
        }
    }
}

pub fn validate(args: ValidateArgs) -> Result<CommandStatus> {
    let root = catalog_root(args.root)?;
    let config = load_config(&root)?;
    let workflows_dir = config.workflows_path(&root);

    if args.check_consistency {
        let folders = catalog::discover(&workflows_dir)?;
        let report = check_consistency(&folders);
        print!("{}", render_consistency_report(&report, &root));
        return Ok(CommandStatus::from_success(report.is_consistent()));
    }

    if args.check_readme {
        println!("README completeness check is included in the main validation");
    }

    let validator = WorkflowValidator::from_config(&config, &root);
    println!("Validating all workflows...");
    println!();
    let report = validator.validate_all(&workflows_dir)?;
    print!("{}", render_validation_report(&report));
    Ok(CommandStatus::from_success(report.all_valid()))
}

pub fn import(args: ImportArgs) -> Result<CommandStatus> {
    let raw = match &args.from {
        Some(file) => fs::read_to_string(file)
            .with_context(|| format!("failed to read generated metadata {}", file.display()))?,
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read generated metadata from stdin")?;
            buffer
        }
    };

    match ingest::import_generated_metadata(&args.folder, &raw, args.force) {
        Ok(ImportOutcome::Written(path)) => {
            println!("Wrote {}", path.display());
            Ok(CommandStatus::Success)
        }
        Ok(ImportOutcome::SkippedExisting(path)) => {
            println!(
                "Skipping {}: metadata.json already exists (use --force to overwrite)",
                path.display()
            );
            Ok(CommandStatus::Success)
        }
        Err(err) => {
            eprintln!("Error: {}", err);
            Ok(CommandStatus::Failure)
        }
    }
}

fn catalog_root(root: Option<PathBuf>) -> Result<PathBuf> {
    match root {
        Some(root) => Ok(root),
        None => env::current_dir().context("failed to resolve current directory"),
    }
}

fn load_config(root: &Path) -> Result<FlowdocConfig> {
    let config = ConfigLoader::load_from_root(root)?;
    ConfigValidator::validate(&config)?;
    Ok(config)
}

fn folder_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

pub fn render_version_list(registry: &MigrationRegistry) -> String {
    let mut out = String::from("Available migration versions:\n");
    for version in registry.versions() {
        let _ = writeln!(out, "  - {}", version);
    }
    out
}

/// Per-category listing followed by the tally.
pub fn render_migration_report(report: &MigrationReport) -> String {
    let mut out = String::new();
    let mut category: Option<&str> = None;
    for (folder, status) in &report.folders {
        write_category_header(&mut out, &mut category, folder);
        let line = match status {
            FolderMigration::Migrated { from, to } => {
                format!("  {}: migrated {} -> {}", folder.name, from, to)
            }
            FolderMigration::UpToDate { version } => {
                format!("  {}: already at target version ({})", folder.name, version)
            }
            FolderMigration::MissingMetadata => {
                format!("  Skipping {}: metadata.json not found", folder.name)
            }
            FolderMigration::Failed { error } => {
                format!("  Failed to migrate {}: {}", folder.name, error)
            }
        };
        let _ = writeln!(out, "{}", line);
    }

    let summary = report.summary;
    let _ = writeln!(out);
    let _ = writeln!(out, "Migration Summary:");
    let _ = writeln!(out, "  Migrated: {}", summary.migrated);
    let _ = writeln!(out, "  Skipped: {}", summary.skipped);
    let _ = writeln!(out, "  Failed: {}", summary.failed);
    let _ = writeln!(out, "  Total: {}", summary.total);
    out
}

pub fn render_validation_report(report: &ValidationReport) -> String {
    let mut out = String::new();
    let mut category: Option<&str> = None;
    for (folder, result) in &report.folders {
        write_category_header(&mut out, &mut category, folder);
        write_folder_result(&mut out, folder, result);
    }

    let summary = report.summary;
    let _ = writeln!(out);
    let _ = writeln!(out, "Validation Summary:");
    let _ = writeln!(out, "  Valid workflows: {}", summary.valid);
    let _ = writeln!(out, "  Invalid workflows: {}", summary.invalid);
    let _ = writeln!(out, "  Total workflows: {}", summary.total);
    out
}

fn write_folder_result(out: &mut String, folder: &WorkflowFolder, result: &ValidationResult) {
    let _ = writeln!(out, "  {}", folder.name);
    if !result.errors.is_empty() {
        let _ = writeln!(out, "    Errors:");
        for error in &result.errors {
            let _ = writeln!(out, "      - {}", error);
        }
    }
    if !result.warnings.is_empty() {
        let _ = writeln!(out, "    Warnings:");
        for warning in &result.warnings {
            let _ = writeln!(out, "      - {}", warning);
        }
    }
    if result.is_clean() {
        let _ = writeln!(out, "    Valid");
    }
}

/// Paths are shown relative to `root` when possible.
pub fn render_consistency_report(report: &ConsistencyReport, root: &Path) -> String {
    let mut out = String::new();
    for (path, error) in &report.skipped {
        let _ = writeln!(
            out,
            "Warning: Could not parse metadata for {}: {}",
            relative(path, root),
            error
        );
    }
    if report.is_consistent() {
        let _ = writeln!(out, "No duplicate workflow names found");
        return out;
    }
    let _ = writeln!(out, "Duplicate workflow names found:");
    for duplicate in &report.duplicates {
        let _ = writeln!(out, "  - \"{}\" in:", duplicate.name);
        for path in &duplicate.paths {
            let _ = writeln!(out, "    {}", relative(path, root));
        }
    }
    out
}

fn write_category_header<'a>(out: &mut String, current: &mut Option<&'a str>, folder: &'a WorkflowFolder) {
    if *current != Some(folder.category.as_str()) {
        if current.is_some() {
            let _ = writeln!(out);
        }
        let _ = writeln!(out, "Category: {}", folder.category);
        *current = Some(folder.category.as_str());
    }
}

fn relative(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}

/// Surface a fatal setup error with its recovery hints, if any.
pub fn describe_error(err: &anyhow::Error) -> String {
    let mut message = format!("Error: {:#}", err);
    if let Some(app) = err.downcast_ref::<crate::core::error::AppError>() {
        message = format!("Error: {}", app.message);
        for suggestion in &app.recovery_suggestions {
            let _ = write!(message, "\n  hint: {}", suggestion);
        }
    }
    message
}
