//! Integration tests for the wadesk layout subcommands

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use assert_cmd::Command as AssertCommand;
use predicates::prelude::*;
use tempfile::TempDir;

// =============================================================================
// Test Helpers
// =============================================================================

/// Test environment with an isolated config and storage file
struct TestEnv {
    _temp_dir: TempDir,
    config_path: PathBuf,
    storage_path: PathBuf,
}

impl TestEnv {
    fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        let storage_path = temp_dir.path().join("storage.json");

        fs::write(
            &config_path,
            format!("storage = {:?}\n", storage_path.to_str().unwrap()),
        )
        .unwrap();

        Self {
            _temp_dir: temp_dir,
            config_path,
            storage_path,
        }
    }

    /// Seed the key/value store file with the given entries
    fn seed(&self, entries: &[(&str, &str)]) {
        let map: BTreeMap<&str, &str> = entries.iter().copied().collect();
        fs::write(&self.storage_path, serde_json::to_string_pretty(&map).unwrap()).unwrap();
    }

    /// Read the store file back as a map (empty when the file is missing)
    fn store(&self) -> BTreeMap<String, String> {
        match fs::read_to_string(&self.storage_path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap(),
            Err(_) => BTreeMap::new(),
        }
    }

    fn cmd(&self) -> AssertCommand {
        let mut cmd = AssertCommand::cargo_bin("wadesk").unwrap();
        cmd.args(["--config", self.config_path.to_str().unwrap()]);
        cmd
    }
}

const CANONICAL_KEY: &str = "wd-contact-sections-order";
const LEGACY_KEY: &str = "contactSectionsOrder";
const LEGACY_BACKUP_KEY: &str = "contactSectionsBackup";

const SNAPSHOT: &str = r#"{"sections":[{"id":"conversation-info","isOpen":true,"order":0}],"lastUpdated":0,"version":"2.0"}"#;

// =============================================================================
// layout dump
// =============================================================================

#[test]
fn dump_prints_the_stored_snapshot() {
    let env = TestEnv::new();
    env.seed(&[(CANONICAL_KEY, SNAPSHOT)]);

    env.cmd()
        .args(["layout", "dump"])
        .assert()
        .success()
        .stdout(predicate::str::contains("conversation-info"))
        .stdout(predicate::str::contains("\"version\":\"2.0\""));
}

#[test]
fn dump_without_stored_layout_reports_nothing() {
    let env = TestEnv::new();

    env.cmd()
        .args(["layout", "dump"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No stored section layout."));
}

#[test]
fn dump_falls_back_to_the_legacy_key_without_migrating() {
    let env = TestEnv::new();
    let legacy = r#"[{"id":"conversation-actions","order":0,"collapsed":false}]"#;
    env.seed(&[(LEGACY_KEY, legacy), (LEGACY_BACKUP_KEY, legacy)]);

    env.cmd()
        .args(["layout", "dump"])
        .assert()
        .success()
        .stdout(predicate::str::contains("conversation-actions"));

    // Dump is read-only: legacy keys stay, canonical key stays absent
    let store = env.store();
    assert!(store.contains_key(LEGACY_KEY));
    assert!(store.contains_key(LEGACY_BACKUP_KEY));
    assert!(!store.contains_key(CANONICAL_KEY));
}

// =============================================================================
// layout reset
// =============================================================================

#[test]
fn reset_removes_canonical_and_legacy_keys() {
    let env = TestEnv::new();
    env.seed(&[
        (CANONICAL_KEY, SNAPSHOT),
        (LEGACY_KEY, "[]"),
        (LEGACY_BACKUP_KEY, "[]"),
        ("contactInfoSidebarOpen", "true"),
    ]);

    env.cmd()
        .args(["layout", "reset"])
        .assert()
        .success()
        .stdout(predicate::str::contains("reset"));

    let store = env.store();
    assert!(!store.contains_key(CANONICAL_KEY));
    assert!(!store.contains_key(LEGACY_KEY));
    assert!(!store.contains_key(LEGACY_BACKUP_KEY));
    // Unrelated preferences survive a layout reset
    assert_eq!(store.get("contactInfoSidebarOpen").map(String::as_str), Some("true"));
}

#[test]
fn reset_on_an_empty_store_succeeds() {
    let env = TestEnv::new();

    env.cmd().args(["layout", "reset"]).assert().success();
    assert!(env.store().is_empty());
}

// =============================================================================
// configuration errors
// =============================================================================

#[test]
fn invalid_config_file_is_an_error() {
    let env = TestEnv::new();
    fs::write(&env.config_path, "storage = [not toml").unwrap();

    env.cmd()
        .args(["layout", "dump"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("TOML"));
}
