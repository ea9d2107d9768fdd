//! In-memory [`Driver`] for tests.
//!
//! Holds an options table and a posts table behind `std::sync::RwLock` and
//! interprets only the statement shapes this workspace issues:
//!
//! - `... FROM <prefix>options WHERE option_name = ? ...`
//! - `... FROM <prefix>options WHERE option_name LIKE ? ...`
//! - `SELECT DISTINCT post_type FROM <prefix>posts WHERE post_type NOT IN (...) ...`
//!
//! Anything else fails like an unknown statement would. Connects and
//! executed statements are recorded so tests can assert on them.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, LazyLock, RwLock};

use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use regex::Regex;
use serde_json::json;

use super::{ConnectParams, DbConnection, Driver, Row};
use crate::models::BUILTIN_POST_TYPES;

static FROM_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\bFROM\s+(\w+)").unwrap());
static LIMIT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\bLIMIT\s+(\d+)").unwrap());

#[derive(Default)]
struct Inner {
    prefix: String,
    options: RwLock<Vec<(String, String)>>,
    post_types: RwLock<Vec<String>>,
    connect_error: RwLock<Option<String>>,
    query_error: RwLock<Option<String>>,
    connects: AtomicUsize,
    closes: AtomicUsize,
    statements: RwLock<Vec<(String, Vec<String>)>>,
}

/// In-memory WordPress database. Cloning shares the same tables.
#[derive(Clone)]
pub struct MemoryDriver {
    inner: Arc<Inner>,
}

impl MemoryDriver {
    /// An empty database whose tables use `prefix`.
    pub fn new(prefix: &str) -> Self {
        Self {
            inner: Arc::new(Inner {
                prefix: prefix.to_string(),
                ..Default::default()
            }),
        }
    }

    pub fn set_option(&self, name: &str, value: &str) {
        let mut options = self.inner.options.write().unwrap();
        match options.iter_mut().find(|(n, _)| n == name) {
            Some(entry) => entry.1 = value.to_string(),
            None => options.push((name.to_string(), value.to_string())),
        }
    }

    /// Add one post of the given type.
    pub fn add_post(&self, post_type: &str) {
        self.inner
            .post_types
            .write()
            .unwrap()
            .push(post_type.to_string());
    }

    /// Make every following connect fail with `message`.
    pub fn fail_connect(&self, message: &str) {
        *self.inner.connect_error.write().unwrap() = Some(message.to_string());
    }

    /// Make every following query fail with `message`.
    pub fn fail_queries(&self, message: &str) {
        *self.inner.query_error.write().unwrap() = Some(message.to_string());
    }

    pub fn connect_count(&self) -> usize {
        self.inner.connects.load(Ordering::SeqCst)
    }

    pub fn close_count(&self) -> usize {
        self.inner.closes.load(Ordering::SeqCst)
    }

    /// Every statement executed so far, with its parameters.
    pub fn statements(&self) -> Vec<(String, Vec<String>)> {
        self.inner.statements.read().unwrap().clone()
    }
}

impl Default for MemoryDriver {
    fn default() -> Self {
        Self::new("wp_")
    }
}

#[async_trait]
impl Driver for MemoryDriver {
    fn name(&self) -> &str {
        "memory"
    }

    async fn connect(&self, _params: &ConnectParams) -> Result<Box<dyn DbConnection>> {
        if let Some(msg) = self.inner.connect_error.read().unwrap().clone() {
            bail!(msg);
        }
        self.inner.connects.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MemoryConnection {
            inner: self.inner.clone(),
            closed: AtomicBool::new(false),
        }))
    }
}

struct MemoryConnection {
    inner: Arc<Inner>,
    closed: AtomicBool,
}

/// SQL `LIKE` with `%` wildcards only.
fn like_matches(value: &str, pattern: &str) -> bool {
    let parts: Vec<&str> = pattern.split('%').collect();
    if parts.len() == 1 {
        return value == pattern;
    }
    let mut rest = value;
    for (i, part) in parts.iter().enumerate() {
        if part.is_empty() {
            continue;
        }
        if i == 0 {
            match rest.strip_prefix(part) {
                Some(r) => rest = r,
                None => return false,
            }
        } else if i == parts.len() - 1 {
            return rest.ends_with(part);
        } else {
            match rest.find(part) {
                Some(pos) => rest = &rest[pos + part.len()..],
                None => return false,
            }
        }
    }
    true
}

impl MemoryConnection {
    fn option_rows(&self, sql: &str, params: &[String]) -> Result<Vec<Row>> {
        let needle = params
            .first()
            .ok_or_else(|| anyhow!("missing parameter for option_name"))?;
        let is_like = sql.contains("option_name LIKE ?");
        let options = self.inner.options.read().unwrap();

        Ok(options
            .iter()
            .enumerate()
            .filter(|(_, (name, _))| {
                if is_like {
                    like_matches(name, needle)
                } else {
                    name == needle
                }
            })
            .map(|(idx, (name, value))| {
                let mut row = Row::new();
                if is_like {
                    row.insert("option_id".into(), json!(idx + 1));
                    row.insert("option_name".into(), json!(name));
                }
                row.insert("option_value".into(), json!(value));
                row
            })
            .collect())
    }

    fn post_type_rows(&self) -> Vec<Row> {
        let posts = self.inner.post_types.read().unwrap();
        let mut seen = HashSet::new();
        posts
            .iter()
            .filter(|pt| !BUILTIN_POST_TYPES.contains(&pt.as_str()))
            .filter(|pt| seen.insert(pt.as_str()))
            .map(|pt| {
                let mut row = Row::new();
                row.insert("post_type".into(), json!(pt));
                row
            })
            .collect()
    }
}

#[async_trait]
impl DbConnection for MemoryConnection {
    async fn query(&self, sql: &str, params: &[String]) -> Result<Vec<Row>> {
        if self.closed.load(Ordering::SeqCst) {
            bail!("connection is closed");
        }
        self.inner
            .statements
            .write()
            .unwrap()
            .push((sql.to_string(), params.to_vec()));
        if let Some(msg) = self.inner.query_error.read().unwrap().clone() {
            bail!(msg);
        }

        let table = FROM_RE
            .captures(sql)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string())
            .ok_or_else(|| anyhow!("unsupported statement: {}", sql))?;

        let mut rows = if table == format!("{}options", self.inner.prefix) {
            self.option_rows(sql, params)?
        } else if table == format!("{}posts", self.inner.prefix) {
            self.post_type_rows()
        } else {
            bail!("Table '{}' doesn't exist", table);
        };

        if let Some(limit) = LIMIT_RE
            .captures(sql)
            .and_then(|c| c.get(1))
            .and_then(|m| m.as_str().parse::<usize>().ok())
        {
            rows.truncate(limit);
        }
        Ok(rows)
    }

    async fn close(&self) {
        if !self.closed.swap(true, Ordering::SeqCst) {
            self.inner.closes.fetch_add(1, Ordering::SeqCst);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> ConnectParams {
        ConnectParams {
            host: "localhost".into(),
            user: "root".into(),
            password: String::new(),
            database: "shop".into(),
        }
    }

    #[test]
    fn test_like_matches() {
        assert!(like_matches("mss_settings", "%mss%"));
        assert!(like_matches("mss", "mss"));
        assert!(like_matches("mss_settings", "mss%"));
        assert!(!like_matches("settings_mss_x", "mss%"));
        assert!(like_matches("a_mss", "%mss"));
        assert!(!like_matches("siteurl", "%mss%"));
    }

    #[tokio::test]
    async fn test_option_lookup() {
        let driver = MemoryDriver::default();
        driver.set_option("stylesheet", "twentytwentyfour");
        let conn = driver.connect(&params()).await.unwrap();
        let rows = conn
            .query(
                "SELECT option_value FROM wp_options WHERE option_name = ? LIMIT 1",
                &["stylesheet".to_string()],
            )
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["option_value"], "twentytwentyfour");
    }

    #[tokio::test]
    async fn test_wrong_prefix_fails() {
        let driver = MemoryDriver::new("shop_");
        let conn = driver.connect(&params()).await.unwrap();
        let err = conn
            .query(
                "SELECT option_value FROM wp_options WHERE option_name = ? LIMIT 1",
                &["siteurl".to_string()],
            )
            .await
            .unwrap_err();
        assert!(err.to_string().contains("wp_options"));
    }

    #[tokio::test]
    async fn test_distinct_post_types_limit() {
        let driver = MemoryDriver::default();
        for pt in ["post", "book", "book", "movie", "page", "event"] {
            driver.add_post(pt);
        }
        let conn = driver.connect(&params()).await.unwrap();
        let rows = conn
            .query("SELECT DISTINCT post_type FROM wp_posts LIMIT 2", &[])
            .await
            .unwrap();
        let names: Vec<&str> = rows.iter().map(|r| r["post_type"].as_str().unwrap()).collect();
        assert_eq!(names, vec!["book", "movie"]);
    }

    #[tokio::test]
    async fn test_closed_connection_rejects_queries() {
        let driver = MemoryDriver::default();
        let conn = driver.connect(&params()).await.unwrap();
        conn.close().await;
        conn.close().await;
        assert_eq!(driver.close_count(), 1);
        assert!(conn.query("SELECT 1 FROM wp_options", &[]).await.is_err());
    }

    #[tokio::test]
    async fn test_connect_failure() {
        let driver = MemoryDriver::default();
        driver.fail_connect("Access denied for user 'root'@'localhost'");
        let err = driver.connect(&params()).await.err().unwrap();
        assert!(err.to_string().contains("Access denied"));
        assert_eq!(driver.connect_count(), 0);
    }
}
