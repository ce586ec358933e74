use flowdoc::core::migration::{
    steps, FolderMigration, MigrationError, MigrationRegistry, MigrationStep, Migrator,
};
use flowdoc::core::store::MemoryStore;
use flowdoc::core::version::Version;
use flowdoc_types::MetadataRecord;
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn workflow_folder(root: &Path, category: &str, name: &str, metadata: Option<Value>) -> PathBuf {
    let folder = root.join(category).join(name);
    fs::create_dir_all(&folder).unwrap();
    if let Some(metadata) = metadata {
        fs::write(
            folder.join("metadata.json"),
            serde_json::to_string_pretty(&metadata).unwrap(),
        )
        .unwrap();
    }
    folder
}

fn read_metadata(folder: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(folder.join("metadata.json")).unwrap()).unwrap()
}

fn fail_step(_: MetadataRecord, _: &Version) -> Result<MetadataRecord, MigrationError> {
    Err(MigrationError::StepFailed {
        version: "1.1.0".to_string(),
        reason: "simulated failure".to_string(),
    })
}

#[test]
fn record_without_version_runs_every_step_in_order() {
    let registry = MigrationRegistry::builtin();
    let mut store = MemoryStore::new();
    let outcome = Migrator::new(&registry)
        .migrate(MetadataRecord::default(), &mut store, None)
        .unwrap();

    assert_eq!(outcome.initial.to_string(), "0.0.0");
    assert_eq!(outcome.current.to_string(), "1.2.0");
    let persisted: Vec<String> = store
        .snapshots
        .iter()
        .filter_map(|record| record.version.clone())
        .collect();
    assert_eq!(persisted, vec!["1.0.0", "1.1.0", "1.2.0"]);
}

#[test]
fn legacy_record_reaches_latest_with_every_default() {
    let temp = TempDir::new().unwrap();
    let folder = workflow_folder(
        temp.path(),
        "email",
        "send-email",
        Some(json!({ "name": "Send Email", "version": "0.9.0" })),
    );

    let registry = MigrationRegistry::builtin();
    let outcome = Migrator::new(&registry).migrate_folder(&folder, None).unwrap();
    assert_eq!(outcome.applied.len(), 3);

    let metadata = read_metadata(&folder);
    assert_eq!(metadata["name"], "Send Email");
    assert_eq!(metadata["version"], "1.2.0");
    assert_eq!(metadata["category"], "uncategorized");
    assert_eq!(metadata["tags"], json!([]));
    assert_eq!(metadata["execution_time"], "Unknown");
    assert_eq!(metadata["complexity"], "medium");
    assert_eq!(
        metadata["resources"],
        json!({ "memory": "medium", "cpu": "medium", "storage": "minimal" })
    );
    assert_eq!(metadata["n8n_version"], "1.0.0");
    assert_eq!(
        metadata["requirements"],
        json!({ "credentials": [], "nodes": [], "environment_variables": [] })
    );
    assert_eq!(metadata["triggers"], json!(["manual"]));
}

#[test]
fn migrated_record_is_left_byte_identical() {
    let temp = TempDir::new().unwrap();
    let folder = workflow_folder(temp.path(), "email", "send-email", Some(json!({ "name": "Send Email" })));
    let registry = MigrationRegistry::builtin();
    let migrator = Migrator::new(&registry);

    migrator.migrate_folder(&folder, None).unwrap();
    let first = fs::read(folder.join("metadata.json")).unwrap();

    let second_run = migrator.migrate_folder(&folder, None).unwrap();
    assert!(!second_run.changed());
    assert_eq!(fs::read(folder.join("metadata.json")).unwrap(), first);
}

#[test]
fn failing_step_leaves_last_successful_version_on_disk() {
    let temp = TempDir::new().unwrap();
    let folder = workflow_folder(temp.path(), "email", "send-email", Some(json!({ "name": "Send Email" })));
    let registry = MigrationRegistry::from_steps([
        MigrationStep::new(Version::from_segments(&[1, 0, 0]), steps::to_v1_0_0),
        MigrationStep::new(Version::from_segments(&[1, 1, 0]), fail_step),
        MigrationStep::new(Version::from_segments(&[1, 2, 0]), steps::to_v1_2_0),
    ])
    .unwrap();

    let err = Migrator::new(&registry).migrate_folder(&folder, None).unwrap_err();
    assert!(matches!(err, MigrationError::StepFailed { .. }));
    assert_eq!(read_metadata(&folder)["version"], "1.0.0");
}

#[test]
fn missing_metadata_is_reported_verbatim() {
    let temp = TempDir::new().unwrap();
    let folder = workflow_folder(temp.path(), "email", "send-email", None);
    let registry = MigrationRegistry::builtin();

    let err = Migrator::new(&registry).migrate_folder(&folder, None).unwrap_err();
    assert!(matches!(err, MigrationError::MissingMetadata(_)));
    assert_eq!(
        err.to_string(),
        format!("metadata.json not found in {}", folder.display())
    );
}

#[test]
fn target_version_stops_the_walk() {
    let temp = TempDir::new().unwrap();
    let folder = workflow_folder(temp.path(), "email", "send-email", Some(json!({ "name": "Send Email" })));
    let registry = MigrationRegistry::builtin();
    let target = Version::parse("1.1.0").unwrap();

    let outcome = Migrator::new(&registry)
        .migrate_folder(&folder, Some(&target))
        .unwrap();
    assert_eq!(outcome.current.to_string(), "1.1.0");

    let metadata = read_metadata(&folder);
    assert_eq!(metadata["version"], "1.1.0");
    assert!(metadata.get("n8n_version").is_none());
}

#[test]
fn unknown_keys_survive_migration() {
    let temp = TempDir::new().unwrap();
    let folder = workflow_folder(
        temp.path(),
        "email",
        "send-email",
        Some(json!({ "name": "Send Email", "homepage": "https://example.com" })),
    );
    let registry = MigrationRegistry::builtin();
    Migrator::new(&registry).migrate_folder(&folder, None).unwrap();
    assert_eq!(read_metadata(&folder)["homepage"], "https://example.com");
}

#[test]
fn duplicate_step_versions_are_rejected() {
    let result = MigrationRegistry::from_steps([
        MigrationStep::new(Version::parse("1.0").unwrap(), steps::to_v1_0_0),
        MigrationStep::new(Version::parse("1.0.0").unwrap(), steps::to_v1_0_0),
    ]);
    assert!(matches!(result, Err(MigrationError::DuplicateStep(_))));
}

#[test]
fn collection_run_isolates_failures_per_folder() {
    let temp = TempDir::new().unwrap();
    let workflows = temp.path().join("workflows");
    workflow_folder(&workflows, "email", "a-fresh", Some(json!({ "name": "Fresh" })));
    workflow_folder(&workflows, "email", "b-missing", None);
    workflow_folder(&workflows, "sync", "c-broken", Some(json!({ "name": "Broken", "version": "one.two" })));
    workflow_folder(&workflows, "sync", "d-current", Some(json!({ "name": "Current", "version": "1.2.0" })));

    let registry = MigrationRegistry::builtin();
    let report = Migrator::new(&registry).migrate_all(&workflows, None).unwrap();

    assert_eq!(report.summary.migrated, 1);
    assert_eq!(report.summary.skipped, 2);
    assert_eq!(report.summary.failed, 1);
    assert_eq!(report.summary.total, 4);

    let statuses: Vec<&FolderMigration> = report.folders.iter().map(|(_, status)| status).collect();
    assert!(matches!(statuses[0], FolderMigration::Migrated { .. }));
    assert_eq!(statuses[1], &FolderMigration::MissingMetadata);
    assert!(matches!(statuses[2], FolderMigration::Failed { .. }));
    assert!(matches!(statuses[3], FolderMigration::UpToDate { .. }));
}

#[test]
fn collection_run_requires_workflows_directory() {
    let temp = TempDir::new().unwrap();
    let registry = MigrationRegistry::builtin();
    let err = Migrator::new(&registry)
        .migrate_all(&temp.path().join("missing"), None)
        .unwrap_err();
    assert!(err.message.contains("workflows directory not found"));
}

#[test]
fn lower_target_leaves_current_record_untouched() {
    let registry = MigrationRegistry::builtin();
    let migrator = Migrator::new(&registry);
    let lower = Version::parse("1.0.0").unwrap();

    let record = MetadataRecord {
        name: Some("Send Email".to_string()),
        version: Some("1.2.0".to_string()),
        ..Default::default()
    };
    let mut store = MemoryStore::new();
    let outcome = migrator.migrate(record, &mut store, Some(&lower)).unwrap();
    assert!(!outcome.changed());
    assert!(store.snapshots.is_empty());

    let temp = TempDir::new().unwrap();
    let folder = workflow_folder(
        temp.path(),
        "email",
        "send-email",
        Some(json!({ "name": "Send Email", "version": "1.2.0" })),
    );
    let before = fs::read(folder.join("metadata.json")).unwrap();
    let outcome = migrator.migrate_folder(&folder, Some(&lower)).unwrap();
    assert_eq!(outcome.current.to_string(), "1.2.0");
    assert_eq!(fs::read(folder.join("metadata.json")).unwrap(), before);
}

#[test]
fn migration_keeps_stored_key_order() {
    let temp = TempDir::new().unwrap();
    let folder = workflow_folder(temp.path(), "email", "send-email", None);
    fs::write(
        folder.join("metadata.json"),
        r#"{"version":"1.0.0","category":"email","name":"Send"}"#,
    )
    .unwrap();

    let registry = MigrationRegistry::builtin();
    Migrator::new(&registry).migrate_folder(&folder, None).unwrap();

    let metadata = read_metadata(&folder);
    let keys: Vec<&str> = metadata
        .as_object()
        .unwrap()
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(keys[..3].to_vec(), vec!["version", "category", "name"]);
    assert_eq!(metadata["version"], "1.2.0");
    assert!(keys.contains(&"triggers"));
}

#[test]
fn migration_keeps_nulls_and_unrecognized_levels() {
    let temp = TempDir::new().unwrap();
    let folder = workflow_folder(
        temp.path(),
        "email",
        "send-email",
        Some(json!({
            "name": "Send Email",
            "author": null,
            "complexity": "Medium",
            "resources": { "memory": "huge" }
        })),
    );

    let registry = MigrationRegistry::builtin();
    let outcome = Migrator::new(&registry).migrate_folder(&folder, None).unwrap();
    assert_eq!(outcome.current.to_string(), "1.2.0");

    let metadata = read_metadata(&folder);
    assert_eq!(metadata["author"], Value::Null);
    assert!(metadata.as_object().unwrap().contains_key("author"));
    assert_eq!(metadata["complexity"], "Medium");
    assert_eq!(metadata["resources"], json!({ "memory": "huge" }));
}
