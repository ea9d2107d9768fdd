//! Database transport abstraction.
//!
//! The [`Driver`] trait opens connections and [`DbConnection`] runs
//! parameterized statements, returning rows as ordered key/value maps.
//! The native MySQL implementation lives in the `wp-context` crate; an
//! in-memory implementation for tests lives in [`memory`].
//!
//! Errors are plain driver errors (`anyhow`); the installation state maps
//! them onto [`WpError::ConnectionFailed`](crate::WpError::ConnectionFailed)
//! and [`WpError::QueryFailed`](crate::WpError::QueryFailed), keeping the
//! driver's message verbatim.

pub mod memory;

use anyhow::Result;
use async_trait::async_trait;
use std::fmt;

use crate::models::Configuration;

/// One result row, columns in select order.
pub type Row = serde_json::Map<String, serde_json::Value>;

/// What a driver needs to open a session.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectParams {
    /// Raw `DB_HOST`, possibly carrying a port or socket path.
    pub host: String,
    pub user: String,
    pub password: String,
    pub database: String,
}

impl ConnectParams {
    pub fn from_config(config: &Configuration) -> Self {
        Self {
            host: config.db_host.clone(),
            user: config.db_user.clone(),
            password: config.db_password.clone(),
            database: config.db_name.clone(),
        }
    }
}

impl fmt::Debug for ConnectParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectParams")
            .field("host", &self.host)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("database", &self.database)
            .finish()
    }
}

/// Opens connections to a WordPress database.
#[async_trait]
pub trait Driver: Send + Sync {
    /// Short name used in logs (`"mysql"`, `"memory"`).
    fn name(&self) -> &str;

    async fn connect(&self, params: &ConnectParams) -> Result<Box<dyn DbConnection>>;
}

/// A live session.
#[async_trait]
pub trait DbConnection: Send + Sync {
    /// Execute `sql` with positional `?` parameters and collect every row.
    async fn query(&self, sql: &str, params: &[String]) -> Result<Vec<Row>>;

    /// Close the session. Further queries fail.
    async fn close(&self);
}

/// Read a column as text, whatever type the driver decoded it to.
pub fn column_text(row: &Row, column: &str) -> Option<String> {
    match row.get(column)? {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_column_text() {
        let mut row = Row::new();
        row.insert("option_value".into(), json!("twentytwentyfour"));
        row.insert("option_id".into(), json!(42));
        row.insert("autoload".into(), serde_json::Value::Null);
        assert_eq!(column_text(&row, "option_value").as_deref(), Some("twentytwentyfour"));
        assert_eq!(column_text(&row, "option_id").as_deref(), Some("42"));
        assert_eq!(column_text(&row, "autoload"), None);
        assert_eq!(column_text(&row, "missing"), None);
    }

    #[test]
    fn test_debug_redacts_password() {
        let params = ConnectParams {
            host: "localhost".into(),
            user: "root".into(),
            password: "hunter2".into(),
            database: "shop".into(),
        };
        let shown = format!("{:?}", params);
        assert!(!shown.contains("hunter2"));
        assert!(shown.contains("shop"));
    }
}
