//! Tool configuration.
//!
//! Optional TOML file (default `./config/wpctx.toml`). Every section and
//! key has a default, so a missing file is equivalent to an empty one.
//!
//! ```toml
//! [workspace]
//! roots = ["/var/www/shop/wp-content/themes/storefront"]
//!
//! [database]
//! connect_timeout_secs = 10
//! port = 3306
//!
//! [server]
//! bind = "127.0.0.1:7341"
//!
//! [query]
//! option_limit = 50
//! post_type_limit = 20
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub workspace: WorkspaceConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub query: QueryConfig,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct WorkspaceConfig {
    /// Candidate workspace roots, searched in order.
    #[serde(default)]
    pub roots: Vec<PathBuf>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    /// Used when `DB_HOST` names no port.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: default_connect_timeout(),
            port: default_port(),
        }
    }
}

fn default_connect_timeout() -> u64 {
    10
}
fn default_port() -> u16 {
    3306
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:7341".to_string()
}

#[derive(Debug, Deserialize, Clone, Copy)]
pub struct QueryConfig {
    #[serde(default = "default_option_limit")]
    pub option_limit: u32,
    #[serde(default = "default_post_type_limit")]
    pub post_type_limit: u32,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            option_limit: default_option_limit(),
            post_type_limit: default_post_type_limit(),
        }
    }
}

fn default_option_limit() -> u32 {
    wp_context_core::nl_sql::DEFAULT_OPTION_LIMIT
}
fn default_post_type_limit() -> u32 {
    20
}

pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        debug!(path = %path.display(), "no config file, using defaults");
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    if config.database.connect_timeout_secs == 0 {
        anyhow::bail!("database.connect_timeout_secs must be > 0");
    }

    if config.query.option_limit < 1 {
        anyhow::bail!("query.option_limit must be >= 1");
    }
    if config.query.post_type_limit < 1 {
        anyhow::bail!("query.post_type_limit must be >= 1");
    }

    Ok(config)
}
