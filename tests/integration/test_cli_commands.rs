use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const BIN: &str = "flowdoc";

const FULL_README: &str = "# Workflow\n\n## Overview\n\n## Technical Specification\n\n### Input Requirements\n\n### Processing Logic\n\n### Output Specification\n";

fn flowdoc(cwd: &Path) -> Command {
    let mut cmd = Command::cargo_bin(BIN).unwrap();
    cmd.current_dir(cwd)
        .env("CI", "1")
        .env_remove("FLOWDOC_WORKFLOWS_DIR")
        .env_remove("FLOWDOC_WORKFLOW_SCHEMA")
        .env_remove("FLOWDOC_METADATA_SCHEMA");
    cmd
}

fn add_workflow(root: &Path, category: &str, folder: &str, metadata: Option<Value>) -> PathBuf {
    let path = root.join("workflows").join(category).join(folder);
    fs::create_dir_all(&path).unwrap();
    fs::write(
        path.join("workflow.json"),
        json!({ "nodes": [], "connections": {} }).to_string(),
    )
    .unwrap();
    fs::write(path.join("README.md"), FULL_README).unwrap();
    if let Some(metadata) = metadata {
        fs::write(path.join("metadata.json"), metadata.to_string()).unwrap();
    }
    path
}

fn complete_metadata(name: &str) -> Value {
    json!({
        "name": name,
        "description": "Does a thing",
        "version": "1.2.0",
        "category": "email"
    })
}

#[test]
fn help_lists_catalog_commands() {
    let temp = TempDir::new().unwrap();
    flowdoc(temp.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("migrate"))
        .stdout(predicate::str::contains("validate"))
        .stdout(predicate::str::contains("import"));
}

#[test]
fn list_versions_prints_registry_in_order() {
    let temp = TempDir::new().unwrap();
    flowdoc(temp.path())
        .args(["migrate", "--list-versions"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Available migration versions:\n  - 1.0.0\n  - 1.1.0\n  - 1.2.0\n",
        ));
}

#[test]
fn migrate_all_updates_catalog_and_prints_tally() {
    let temp = TempDir::new().unwrap();
    let folder = add_workflow(temp.path(), "email", "send-email", Some(json!({ "name": "Send Email", "version": "0.9.0" })));
    add_workflow(temp.path(), "email", "no-metadata", None);

    flowdoc(temp.path())
        .arg("migrate")
        .assert()
        .success()
        .stdout(predicate::str::contains("Category: email"))
        .stdout(predicate::str::contains("send-email: migrated 0.9.0 -> 1.2.0"))
        .stdout(predicate::str::contains("Migrated: 1"))
        .stdout(predicate::str::contains("Skipped: 1"))
        .stdout(predicate::str::contains("Total: 2"));

    let metadata: Value =
        serde_json::from_str(&fs::read_to_string(folder.join("metadata.json")).unwrap()).unwrap();
    assert_eq!(metadata["version"], "1.2.0");
}

#[test]
fn migrate_all_fails_when_a_folder_fails() {
    let temp = TempDir::new().unwrap();
    add_workflow(temp.path(), "email", "bad-version", Some(json!({ "name": "Bad", "version": "v1" })));

    flowdoc(temp.path())
        .arg("migrate")
        .assert()
        .failure()
        .stdout(predicate::str::contains("Failed to migrate bad-version"))
        .stdout(predicate::str::contains("Failed: 1"));
}

#[test]
fn migrate_single_folder_with_target() {
    let temp = TempDir::new().unwrap();
    let folder = add_workflow(temp.path(), "email", "send-email", Some(json!({ "name": "Send Email" })));

    flowdoc(temp.path())
        .args(["migrate", folder.to_str().unwrap(), "--target", "1.1.0"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Current version: 0.0.0\nMigrated to 1.0.0\nMigrated to 1.1.0\n",
        ))
        .stdout(predicate::str::contains("Migration complete. Final version: 1.1.0"));
}

#[test]
fn migrate_single_folder_without_metadata_fails() {
    let temp = TempDir::new().unwrap();
    let folder = add_workflow(temp.path(), "email", "send-email", None);

    flowdoc(temp.path())
        .args(["migrate", folder.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("metadata.json not found in"));
}

#[test]
fn invalid_target_is_rejected() {
    let temp = TempDir::new().unwrap();
    flowdoc(temp.path())
        .args(["migrate", "--target", "latest"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--target"));
}

#[test]
fn missing_workflows_directory_is_fatal() {
    let temp = TempDir::new().unwrap();
    flowdoc(temp.path())
        .arg("validate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("workflows directory not found"));
}

#[test]
fn validate_reports_valid_catalog() {
    let temp = TempDir::new().unwrap();
    add_workflow(temp.path(), "email", "send-email", Some(complete_metadata("Send Email")));

    flowdoc(temp.path())
        .args(["validate", "--root", temp.path().to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Valid workflows: 1"))
        .stdout(predicate::str::contains("Invalid workflows: 0"));
}

#[test]
fn validate_fails_on_incomplete_folder() {
    let temp = TempDir::new().unwrap();
    add_workflow(temp.path(), "email", "send-email", Some(complete_metadata("Send Email")));
    add_workflow(temp.path(), "email", "draft", None);

    flowdoc(temp.path())
        .arg("validate")
        .assert()
        .failure()
        .stdout(predicate::str::contains("Missing required files: metadata.json"))
        .stdout(predicate::str::contains("Invalid workflows: 1"));
}

#[test]
fn check_readme_prints_note() {
    let temp = TempDir::new().unwrap();
    add_workflow(temp.path(), "email", "send-email", Some(complete_metadata("Send Email")));

    flowdoc(temp.path())
        .args(["validate", "--check-readme"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "README completeness check is included in the main validation",
        ));
}

#[test]
fn consistency_check_flags_duplicate_names() {
    let temp = TempDir::new().unwrap();
    add_workflow(temp.path(), "email", "send-email", Some(complete_metadata("Send Email")));
    add_workflow(temp.path(), "marketing", "send-email", Some(complete_metadata("Send Email")));

    flowdoc(temp.path())
        .args(["validate", "--check-consistency"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Duplicate workflow names found:"))
        .stdout(predicate::str::contains("\"Send Email\" in:"));
}

#[test]
fn consistency_check_passes_for_unique_names() {
    let temp = TempDir::new().unwrap();
    add_workflow(temp.path(), "email", "send-email", Some(complete_metadata("Send Email")));
    add_workflow(temp.path(), "email", "digest", Some(complete_metadata("Digest")));

    flowdoc(temp.path())
        .args(["validate", "--check-consistency"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No duplicate workflow names found"));
}

#[test]
fn workflows_dir_can_be_overridden_from_environment() {
    let temp = TempDir::new().unwrap();
    let folder = temp.path().join("flows").join("email").join("send-email");
    fs::create_dir_all(&folder).unwrap();
    fs::write(folder.join("workflow.json"), r#"{"nodes":[],"connections":{}}"#).unwrap();
    fs::write(folder.join("README.md"), FULL_README).unwrap();
    fs::write(folder.join("metadata.json"), complete_metadata("Send Email").to_string()).unwrap();

    flowdoc(temp.path())
        .arg("validate")
        .env("FLOWDOC_WORKFLOWS_DIR", "flows")
        .assert()
        .success()
        .stdout(predicate::str::contains("Total workflows: 1"));
}

#[test]
fn import_reads_generated_metadata_from_stdin() {
    let temp = TempDir::new().unwrap();
    let folder = add_workflow(temp.path(), "email", "send-email", None);

    flowdoc(temp.path())
        .args(["import", folder.to_str().unwrap()])
        .write_stdin("```json\n{\"name\": \"Send Email!\", \"tags\": [\"Email Automation\"]}\n```")
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote"));

    let metadata: Value =
        serde_json::from_str(&fs::read_to_string(folder.join("metadata.json")).unwrap()).unwrap();
    assert_eq!(metadata["name"], "Send Email");
    assert_eq!(metadata["tags"], json!(["email-automation"]));
}

#[test]
fn import_skips_existing_metadata_without_force() {
    let temp = TempDir::new().unwrap();
    let folder = add_workflow(temp.path(), "email", "send-email", Some(complete_metadata("Original")));
    let generated = temp.path().join("generated.txt");
    fs::write(&generated, r#"{"name": "Replacement"}"#).unwrap();

    flowdoc(temp.path())
        .args(["import", folder.to_str().unwrap(), "--from", generated.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));

    flowdoc(temp.path())
        .args([
            "import",
            folder.to_str().unwrap(),
            "--from",
            generated.to_str().unwrap(),
            "--force",
        ])
        .assert()
        .success();

    let metadata: Value =
        serde_json::from_str(&fs::read_to_string(folder.join("metadata.json")).unwrap()).unwrap();
    assert_eq!(metadata["name"], "Replacement");
}

#[test]
fn import_rejects_unparseable_output() {
    let temp = TempDir::new().unwrap();
    let folder = add_workflow(temp.path(), "email", "send-email", None);

    flowdoc(temp.path())
        .args(["import", folder.to_str().unwrap()])
        .write_stdin("I could not analyze this workflow.")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Generated metadata is not valid JSON"));
}
