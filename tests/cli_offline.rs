use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

const FIXTURE: &str = "tests/fixtures/cleanup/shop.yaml";

fn cleaner() -> Command {
    let mut cmd = Command::cargo_bin("kubectl-cleaner").unwrap();
    cmd.env("NO_COLOR", "1")
        .env_remove("KUBECTL_CLEANER_RULES_FILE")
        .env_remove("RUST_LOG");
    cmd
}

fn rules_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn analyze_lists_flagged_resources() {
    cleaner()
        .args(["analyze", "-n", "shop", "--from-file", FIXTURE])
        .args(["--deployments-replicas", "0", "--orphaned-secrets-only"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Potentially removable resources:"))
        .stdout(predicate::str::contains("- Deployment   legacy-admin"))
        .stdout(predicate::str::contains("- Secret       old-deploy-token"))
        .stdout(predicate::str::contains("postgres-credentials").not())
        .stdout(predicate::str::contains("(Dry-run only. No resources have been deleted.)"));
}

#[test]
fn analyze_json_output() {
    let output = cleaner()
        .args(["analyze", "-n", "shop", "--from-file", FIXTURE, "-o", "json"])
        .args(["--pvc-phases", "Pending"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["namespace"], "shop");
    let pvcs: Vec<&str> = report["resources"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|r| r["kind"] == "PVC")
        .filter_map(|r| r["name"].as_str())
        .collect();
    assert_eq!(pvcs, vec!["scratch"]);
    assert_eq!(report["warnings"].as_array().map(Vec::len), Some(0));
}

#[test]
fn empty_namespace_reports_nothing_found() {
    cleaner()
        .args(["analyze", "-n", "nowhere", "--from-file", FIXTURE])
        .args(["--jobs-completed-only", "--orphaned-services-only"])
        .args(["--orphaned-secrets-only", "--orphaned-configmaps-only"])
        .assert()
        .success()
        .stdout("No unused, orphaned, or stale resources found.\n");
}

#[test]
fn cli_flag_overrides_rules_file() {
    let file = rules_file("older_than: 100000\n");

    cleaner()
        .args(["analyze", "-n", "shop", "--from-file", FIXTURE])
        .arg("--rules-file")
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("StatefulSet  postgres").not());

    cleaner()
        .args(["analyze", "-n", "shop", "--from-file", FIXTURE])
        .arg("--rules-file")
        .arg(file.path())
        .args(["--older-than", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("- StatefulSet  postgres"));
}

#[test]
fn malformed_rules_file_fails_loudly() {
    let file = rules_file("older_than: [30\n");

    cleaner()
        .args(["analyze", "-n", "shop", "--from-file", FIXTURE])
        .arg("--rules-file")
        .arg(file.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse rules file"));
}

#[test]
fn unknown_rules_key_fails() {
    let file = rules_file("older_than_dayz: 30\n");

    cleaner()
        .args(["analyze", "--from-file", FIXTURE])
        .arg("--rules-file")
        .arg(file.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("older_than_dayz"));
}

#[test]
fn purge_defaults_to_dry_run() {
    cleaner()
        .args(["purge", "-n", "shop", "--from-file", FIXTURE, "--orphaned-configmaps-only"])
        .args(["--older-than", "100"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleting "))
        .stdout(predicate::str::contains("- ConfigMap    feature-flags-v1"))
        .stdout(predicate::str::contains("Dry-run mode: no resources were actually deleted."));
}

#[test]
fn purge_from_file_refuses_real_deletion() {
    cleaner()
        .args(["purge", "-n", "shop", "--from-file", FIXTURE, "--dry-run=false"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--from-file only supports --dry-run"));
}

#[test]
fn missing_manifest_fails() {
    cleaner()
        .args(["analyze", "--from-file", "tests/fixtures/cleanup/missing.yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read manifest"));
}
