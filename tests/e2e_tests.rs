//! End-to-end CLI tests for scour.
//!
//! These tests exercise the full binary with isolated environments: each
//! test creates its own temporary workspace and config file, wired up via
//! the `SCOUR_CONFIG` environment variable.

use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

// =============================================================================
// Test Environment Helper
// =============================================================================

/// Isolated test environment with its own workspace and config.
struct TestEnv {
    _temp_dir: TempDir,
    workspace_path: PathBuf,
    config_path: PathBuf,
}

impl TestEnv {
    /// Create a new environment with an empty workspace.
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let root = temp_dir.path();

        let workspace_path = root.join("workspace");
        fs::create_dir_all(&workspace_path).expect("Failed to create workspace dir");

        let config_path = root.join("config.toml");
        let config_content = format!("[workspace]\nroot = \"{}\"\n", workspace_path.display());
        fs::write(&config_path, config_content).expect("Failed to write config");

        Self {
            _temp_dir: temp_dir,
            workspace_path,
            config_path,
        }
    }

    /// Create an environment with sample workspace files.
    fn with_files() -> Self {
        let env = Self::new();

        env.write("AGENTS.md", "# Operating notes\n\nBe helpful, be quick.");
        env.write(
            "memory/2026-08-01.md",
            "# Daily log\n\nShipped the nanobot deployment pipeline.\nFollow up on retries.",
        );
        env.write(
            "memory/knowledge/deploys.md",
            "# Deploys\n\nCanary first, then fleet-wide nanobot rollout.",
        );
        env.write("projects/todo.txt", "buy milk\nwater the plants");

        env
    }

    fn write(&self, rel: &str, content: &str) {
        let path = self.workspace_path.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create dir");
        }
        fs::write(path, content).expect("Failed to write file");
    }

    /// Get a Command configured for this test environment.
    fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("scour").expect("binary builds");
        cmd.env("SCOUR_CONFIG", &self.config_path);
        cmd.env_remove("SCOUR_WORKSPACE");
        cmd
    }
}

// =============================================================================
// 1. Help / No Command
// =============================================================================

#[test]
fn no_subcommand_shows_help() {
    let env = TestEnv::new();

    env.command()
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("search"))
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("get"));
}

#[test]
fn help_flag() {
    let env = TestEnv::new();

    env.command()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Ranked search across an agent workspace",
        ));
}

#[test]
fn version_flag() {
    let env = TestEnv::new();

    env.command()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("scour"));
}

// =============================================================================
// 2. Search Command
// =============================================================================

#[test]
fn search_with_matches() {
    let env = TestEnv::with_files();

    env.command()
        .args(["search", "nanobot"])
        .assert()
        .success()
        .stdout(predicate::str::contains("memory/2026-08-01.md"))
        .stdout(predicate::str::contains("memory/knowledge/deploys.md"))
        .stdout(predicate::str::contains("result(s) found"));
}

#[test]
fn search_with_no_matches() {
    let env = TestEnv::with_files();

    env.command()
        .args(["search", "xyznonexistent123"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "No matches found for 'xyznonexistent123'",
        ));
}

#[test]
fn search_below_minimum_length_finds_nothing() {
    let env = TestEnv::with_files();

    env.command()
        .args(["search", "a"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No matches found for 'a'"));
}

#[test]
fn search_with_limit() {
    let env = TestEnv::with_files();

    env.command()
        .args(["search", "nanobot", "--limit", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 result(s) found"));
}

#[test]
fn search_with_group_filter() {
    let env = TestEnv::with_files();

    env.command()
        .args(["search", "nanobot", "--group", "knowledge"])
        .assert()
        .success()
        .stdout(predicate::str::contains("memory/knowledge/deploys.md"))
        .stdout(predicate::str::contains("memory/2026-08-01.md").not());
}

#[test]
fn search_json_output() {
    let env = TestEnv::with_files();

    let output = env
        .command()
        .args(["search", "nanobot", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let parsed: serde_json::Value =
        serde_json::from_slice(&output).expect("stdout is valid JSON");
    let results = parsed.as_array().expect("JSON array of results");
    assert!(!results.is_empty());
    assert!(results[0]["path"].is_string());
    assert!(results[0]["score"].is_number());
    assert!(results[0]["matches"].is_array());
}

#[test]
fn search_snippet_shows_line_number() {
    let env = TestEnv::with_files();

    // "Shipped the nanobot deployment pipeline." is line 3 of the daily log.
    env.command()
        .args(["search", "nanobot"])
        .assert()
        .success()
        .stdout(predicate::str::contains("3: Shipped the nanobot"));
}

#[test]
fn search_rejects_over_long_query() {
    let env = TestEnv::with_files();
    let long_query = "a".repeat(1001);

    env.command()
        .args(["search", &long_query])
        .assert()
        .failure()
        .stderr(predicate::str::contains("too long"));
}

#[test]
fn search_missing_workspace_is_not_an_error() {
    let env = TestEnv::new();
    fs::remove_dir_all(&env.workspace_path).expect("Failed to remove workspace");

    env.command()
        .args(["search", "anything"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No matches found"));
}

#[test]
fn search_cjk_query() {
    let env = TestEnv::new();
    env.write("notes/reading.md", "周末在微信读书上看完了一本书");

    env.command()
        .args(["search", "微信"])
        .assert()
        .success()
        .stdout(predicate::str::contains("notes/reading.md"));
}

// =============================================================================
// 3. List Command
// =============================================================================

#[test]
fn list_shows_groups_and_sizes() {
    let env = TestEnv::with_files();

    env.command()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("AGENTS.md [workspace]"))
        .stdout(predicate::str::contains("memory/2026-08-01.md [memory]"))
        .stdout(predicate::str::contains(
            "memory/knowledge/deploys.md [knowledge]",
        ))
        .stdout(predicate::str::contains("projects/todo.txt [projects]"))
        .stdout(predicate::str::contains("file(s)"));
}

#[test]
fn list_with_group_filter() {
    let env = TestEnv::with_files();

    env.command()
        .args(["list", "--group", "memory"])
        .assert()
        .success()
        .stdout(predicate::str::contains("memory/2026-08-01.md"))
        .stdout(predicate::str::contains("AGENTS.md").not())
        .stdout(predicate::str::contains("deploys.md").not());
}

#[test]
fn list_json_uses_wire_field_names() {
    let env = TestEnv::with_files();

    let output = env
        .command()
        .args(["list", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let parsed: serde_json::Value =
        serde_json::from_slice(&output).expect("stdout is valid JSON");
    let files = parsed.as_array().expect("JSON array of files");
    assert!(!files.is_empty());
    assert!(files[0]["sizeBytes"].is_number());
    assert!(files[0]["group"].is_string());
}

#[test]
fn list_empty_workspace() {
    let env = TestEnv::new();

    env.command()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No viewable files"));
}

// =============================================================================
// 4. Get Command
// =============================================================================

#[test]
fn get_prints_file_content() {
    let env = TestEnv::with_files();

    env.command()
        .args(["get", "memory/2026-08-01.md"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Shipped the nanobot deployment"));
}

#[test]
fn get_missing_file_fails() {
    let env = TestEnv::with_files();

    env.command()
        .args(["get", "memory/never-wrote-this.md"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn get_rejects_path_traversal() {
    let env = TestEnv::with_files();

    env.command()
        .args(["get", "../config.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("traversal"));
}

#[test]
fn get_rejects_non_viewable_extension() {
    let env = TestEnv::with_files();
    env.write("projects/script.py", "print('hi')");

    env.command()
        .args(["get", "projects/script.py"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not allowed"));
}

// =============================================================================
// 5. Configuration
// =============================================================================

#[test]
fn workspace_env_var_overrides_config() {
    let env = TestEnv::new();

    let other = TempDir::new().expect("Failed to create temp dir");
    fs::create_dir_all(other.path().join("notes")).expect("Failed to create dir");
    fs::write(other.path().join("notes/pinned.md"), "the magpie collection")
        .expect("Failed to write file");

    env.command()
        .env("SCOUR_WORKSPACE", other.path())
        .args(["search", "magpie"])
        .assert()
        .success()
        .stdout(predicate::str::contains("notes/pinned.md"));
}

#[test]
fn missing_config_file_uses_defaults() {
    let env = TestEnv::new();
    let nonexistent = env.config_path.with_file_name("absent.toml");

    // Defaults point at a home-relative workspace; the command should still
    // run and simply find nothing in this isolated environment.
    let other = TempDir::new().expect("Failed to create temp dir");
    env.command()
        .env("SCOUR_CONFIG", &nonexistent)
        .env("SCOUR_WORKSPACE", other.path())
        .args(["search", "anything"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No matches found"));
}
