//! MySQL-backed [`Driver`] implementation.
//!
//! Wraps a single-connection [`MySqlPool`] and decodes every row into an
//! ordered JSON map, whatever the column types are.

use anyhow::Result;
use async_trait::async_trait;
use serde_json::{json, Value};
use sqlx::mysql::MySqlRow;
use sqlx::{Column, MySqlPool, Row as _};

use wp_context_core::store::{ConnectParams, DbConnection, Driver, Row};

use crate::config::DatabaseConfig;
use crate::db;

/// Opens MySQL sessions with the configured timeout and default port.
pub struct MySqlDriver {
    settings: DatabaseConfig,
}

impl MySqlDriver {
    pub fn new(settings: DatabaseConfig) -> Self {
        Self { settings }
    }
}

#[async_trait]
impl Driver for MySqlDriver {
    fn name(&self) -> &str {
        "mysql"
    }

    async fn connect(&self, params: &ConnectParams) -> Result<Box<dyn DbConnection>> {
        let pool = db::connect(params, &self.settings).await?;
        Ok(Box::new(MySqlSession { pool }))
    }
}

/// One open MySQL session.
pub struct MySqlSession {
    pool: MySqlPool,
}

#[async_trait]
impl DbConnection for MySqlSession {
    async fn query(&self, sql: &str, params: &[String]) -> Result<Vec<Row>> {
        let mut query = sqlx::query(sql);
        for p in params {
            query = query.bind(p.as_str());
        }
        let rows = query.fetch_all(&self.pool).await?;
        Ok(rows.iter().map(row_to_map).collect())
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}

fn row_to_map(row: &MySqlRow) -> Row {
    let mut map = Row::new();
    for column in row.columns() {
        map.insert(column.name().to_string(), decode_cell(row, column.ordinal()));
    }
    map
}

/// Decode a cell by trying the types WordPress tables actually use.
fn decode_cell(row: &MySqlRow, idx: usize) -> Value {
    if let Ok(v) = row.try_get::<Option<String>, _>(idx) {
        return v.map(Value::String).unwrap_or(Value::Null);
    }
    if let Ok(v) = row.try_get::<Option<i64>, _>(idx) {
        return v.map(|n| json!(n)).unwrap_or(Value::Null);
    }
    if let Ok(v) = row.try_get::<Option<u64>, _>(idx) {
        return v.map(|n| json!(n)).unwrap_or(Value::Null);
    }
    if let Ok(v) = row.try_get::<Option<f64>, _>(idx) {
        return v.map(|n| json!(n)).unwrap_or(Value::Null);
    }
    if let Ok(v) = row.try_get::<Option<Vec<u8>>, _>(idx) {
        return v
            .map(|bytes| Value::String(String::from_utf8_lossy(&bytes).to_string()))
            .unwrap_or(Value::Null);
    }
    Value::Null
}
