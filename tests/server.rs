//! HTTP adapter tests over an ephemeral port.

use std::fs;
use std::sync::Arc;
use tempfile::TempDir;
use tokio::net::TcpListener;

use wp_context::config::QueryConfig;
use wp_context::server::{serve, AppState};
use wp_context::InstallationState;
use wp_context_core::store::memory::MemoryDriver;

async fn start(driver: &MemoryDriver) -> (TempDir, String) {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("wp-config.php"),
        "<?php\ndefine('DB_NAME', 'shop');\ndefine('DB_USER', 'root');\n",
    )
    .unwrap();

    let state = Arc::new(InstallationState::new(
        vec![tmp.path().to_path_buf()],
        Arc::new(driver.clone()),
        QueryConfig::default(),
    ));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    tokio::spawn(serve(listener, AppState::new(state)));
    (tmp, base)
}

#[tokio::test]
async fn test_health() {
    let (_tmp, base) = start(&MemoryDriver::default()).await;
    let body: serde_json::Value = reqwest::get(format!("{}/health", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["readiness"], "unconfigured");
}

#[tokio::test]
async fn test_ask_returns_response_and_markdown() {
    let driver = MemoryDriver::default();
    driver.set_option("active_plugins", "akismet/akismet.php;");
    let (_tmp, base) = start(&driver).await;

    let client = reqwest::Client::new();
    let body: serde_json::Value = client
        .post(format!("{}/ask", base))
        .json(&serde_json::json!({ "question": "active plugins?" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["type"], "plugin_info");
    assert_eq!(body["data"][0], "akismet/akismet.php");
    assert_eq!(body["markdown"], "**Active plugins (1):**\n1. `akismet/akismet.php`");
}

#[tokio::test]
async fn test_query_unrecognized_is_bad_request() {
    let (_tmp, base) = start(&MemoryDriver::default()).await;

    let resp = reqwest::Client::new()
        .post(format!("{}/query", base))
        .json(&serde_json::json!({ "query": "show me themes" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::BAD_REQUEST);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "unrecognized_query");
}

#[tokio::test]
async fn test_query_rows() {
    let driver = MemoryDriver::default();
    driver.set_option("blogname", "Shop");
    let (_tmp, base) = start(&driver).await;

    let body: serde_json::Value = reqwest::Client::new()
        .post(format!("{}/query", base))
        .json(&serde_json::json!({ "query": "options like blog" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["params"][0], "%blog%");
    assert_eq!(body["rows"][0]["option_value"], "Shop");
}

#[tokio::test]
async fn test_completions() {
    let driver = MemoryDriver::default();
    driver.add_post("event");
    let (_tmp, base) = start(&driver).await;

    let items: Vec<serde_json::Value> = reqwest::get(format!("{}/completions?prefix=get_", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(items.iter().any(|i| i["label"] == "get_posts_event"));

    let none: Vec<serde_json::Value> = reqwest::get(format!("{}/completions?prefix=foo", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(none.is_empty());
}
