//! End-to-end tests for the `wpctx` binary. None of these need a live
//! MySQL server: they exercise discovery, parsing, routing and translation.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

fn wpctx_binary() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("wpctx");
    path
}

/// `<tmp>/site/wp-config.php` plus a nested workspace folder.
fn setup_site() -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let site = tmp.path().join("site");
    let workspace = site.join("wp-content/plugins/my-plugin");
    fs::create_dir_all(&workspace).unwrap();
    fs::write(
        site.join("wp-config.php"),
        r#"<?php
define( 'DB_NAME', 'shop' );
define( 'DB_USER', 'root' );
define( 'DB_PASSWORD', 'secret' );
$table_prefix = 'wp_';
require_once ABSPATH . 'wp-settings.php';
"#,
    )
    .unwrap();
    (tmp, workspace)
}

fn run_wpctx(workspace: &Path, args: &[&str]) -> (String, String, bool) {
    let binary = wpctx_binary();
    let missing_config = workspace.join("no-such-wpctx.toml");
    let output = Command::new(&binary)
        .arg("--config")
        .arg(&missing_config)
        .arg("--workspace")
        .arg(workspace)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .unwrap_or_else(|e| panic!("Failed to run wpctx binary at {:?}: {}", binary, e));

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.success())
}

#[test]
fn test_locate_walks_up() {
    let (tmp, workspace) = setup_site();
    let (stdout, stderr, success) = run_wpctx(&workspace, &["locate"]);
    assert!(success, "locate failed: {}", stderr);
    let expected = fs::canonicalize(tmp.path().join("site/wp-config.php")).unwrap();
    assert_eq!(fs::canonicalize(stdout.trim()).unwrap(), expected);
}

#[cfg(unix)]
#[test]
fn test_locate_through_symlinked_theme() {
    let (tmp, _) = setup_site();
    let themes = tmp.path().join("site/wp-content/themes");
    let checkout = tmp.path().join("checkouts/mytheme");
    fs::create_dir_all(&themes).unwrap();
    fs::create_dir_all(&checkout).unwrap();
    let linked = themes.join("mytheme");
    std::os::unix::fs::symlink(&checkout, &linked).unwrap();

    let (stdout, stderr, success) = run_wpctx(&linked, &["locate"]);
    assert!(success, "locate failed: {}", stderr);
    assert_eq!(stdout.trim(), tmp.path().join("site/wp-config.php").display().to_string());
}

#[test]
fn test_locate_not_found() {
    let tmp = TempDir::new().unwrap();
    let (_, stderr, success) = run_wpctx(tmp.path(), &["locate"]);
    assert!(!success);
    assert!(stderr.contains("No wp-config.php found"));
}

#[test]
fn test_config_hides_password() {
    let (_tmp, workspace) = setup_site();
    let (stdout, stderr, success) = run_wpctx(&workspace, &["config"]);
    assert!(success, "config failed: {}", stderr);
    assert!(stdout.contains("Host: localhost"));
    assert!(stdout.contains("Name: shop"));
    assert!(stdout.contains("Password: (set)"));
    assert!(!stdout.contains("secret"));
}

#[test]
fn test_ask_database_name() {
    let (_tmp, workspace) = setup_site();
    let (stdout, _, success) = run_wpctx(&workspace, &["ask", "what is the database name"]);
    assert!(success);
    assert_eq!(stdout.trim(), "Database name: shop");
}

#[test]
fn test_ask_json() {
    let (_tmp, workspace) = setup_site();
    let (stdout, _, success) = run_wpctx(
        &workspace,
        &["ask", "what is the table prefix in the db", "--format", "json"],
    );
    assert!(success);
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(json["type"], "database_info");
    assert_eq!(json["data"]["tablePrefix"], "wp_");
    assert_eq!(json["message"], "Table prefix: wp_");
}

#[test]
fn test_ask_without_installation_still_answers() {
    let tmp = TempDir::new().unwrap();
    let (stdout, _, success) = run_wpctx(tmp.path(), &["ask", "list plugins"]);
    assert!(success);
    assert!(stdout.contains("No wp-config.php found"));
}

#[test]
fn test_query_unrecognized() {
    let (_tmp, workspace) = setup_site();
    let (_, stderr, success) = run_wpctx(&workspace, &["query", "show me themes"]);
    assert!(!success);
    assert!(stderr.contains("find options like"));
}

#[test]
fn test_complete_without_trigger_prints_nothing() {
    let (_tmp, workspace) = setup_site();
    let (stdout, _, success) = run_wpctx(&workspace, &["complete", "echo "]);
    assert!(success);
    assert!(stdout.is_empty());
}
