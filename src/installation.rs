//! Installation state: the session context every question runs against.
//!
//! Owns the parsed [`Configuration`] and the single database connection,
//! establishing both lazily on first need and handing out typed views of
//! the installation (theme, plugins, custom post types, version).
//!
//! # Readiness
//!
//! ```text
//! Unconfigured ──ensure_configuration──▶ Configured ──ensure_connection──▶ Connected
//!                                            ▲                                 │
//!                                            └──────── disconnect() ───────────┘
//! ```
//!
//! [`rediscover`](InstallationState::rediscover) replaces the configuration
//! wholesale and drops back to `Configured` only when the credentials
//! changed.
//!
//! # Concurrency
//!
//! Configuration and connection each sit behind a `tokio::sync::Mutex` held
//! across discovery and connect, so concurrent callers that all see "not
//! ready" still produce one discovery and one connect. Lock order is always
//! connection, then configuration.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use wp_context_core::config_parser;
use wp_context_core::models::{Configuration, ThemeInfo, BUILTIN_POST_TYPES};
use wp_context_core::serialized;
use wp_context_core::store::{column_text, ConnectParams, DbConnection, Driver, Row};
use wp_context_core::theme;
use wp_context_core::{WpError, WpResult};

use crate::config::{Config, QueryConfig};
use crate::locate;
use crate::mysql_store::MySqlDriver;

/// How far the session has been established.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Readiness {
    Unconfigured,
    Configured,
    Connected,
}

struct OpenConnection {
    params: ConnectParams,
    handle: Arc<dyn DbConnection>,
}

pub struct InstallationState {
    roots: Vec<PathBuf>,
    driver: Arc<dyn Driver>,
    limits: QueryConfig,
    configuration: Mutex<Option<Arc<Configuration>>>,
    connection: Mutex<Option<OpenConnection>>,
}

impl InstallationState {
    pub fn new(roots: Vec<PathBuf>, driver: Arc<dyn Driver>, limits: QueryConfig) -> Self {
        Self {
            roots,
            driver,
            limits,
            configuration: Mutex::new(None),
            connection: Mutex::new(None),
        }
    }

    /// A session over MySQL, using the tool configuration's settings.
    pub fn from_config(config: &Config, roots: Vec<PathBuf>) -> Self {
        Self::new(
            roots,
            Arc::new(MySqlDriver::new(config.database.clone())),
            config.query,
        )
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    pub fn limits(&self) -> QueryConfig {
        self.limits
    }

    pub async fn readiness(&self) -> Readiness {
        if self.connection.lock().await.is_some() {
            Readiness::Connected
        } else if self.configuration.lock().await.is_some() {
            Readiness::Configured
        } else {
            Readiness::Unconfigured
        }
    }

    async fn discover(&self) -> WpResult<Configuration> {
        let path = locate::locate_in_roots(&self.roots).await?;
        let contents = match tokio::fs::read_to_string(&path).await {
            Ok(c) => c,
            Err(source) => {
                let err = WpError::Io {
                    path: path.clone(),
                    source,
                };
                warn!("{}", err);
                return Err(WpError::ConfigNotFound);
            }
        };

        let config = config_parser::parse(&contents, &path);
        let missing = config.missing_fields();
        if !missing.is_empty() {
            warn!("{}", WpError::ConfigParseIncomplete { missing });
        }
        info!(
            path = %config.config_path.display(),
            database = %config.db_name,
            prefix = %config.table_prefix,
            "loaded WordPress configuration"
        );
        Ok(config)
    }

    /// The cached configuration, discovering it on first use.
    pub async fn ensure_configuration(&self) -> WpResult<Arc<Configuration>> {
        let mut slot = self.configuration.lock().await;
        if let Some(config) = slot.as_ref() {
            return Ok(config.clone());
        }
        let config = Arc::new(self.discover().await?);
        *slot = Some(config.clone());
        Ok(config)
    }

    /// Re-run discovery and replace the configuration.
    ///
    /// An open connection survives only if the credentials are unchanged.
    pub async fn rediscover(&self) -> WpResult<Arc<Configuration>> {
        let fresh = Arc::new(self.discover().await?);

        let mut conn = self.connection.lock().await;
        let mut slot = self.configuration.lock().await;
        let credentials_changed = slot
            .as_ref()
            .map(|old| !old.same_credentials(&fresh))
            .unwrap_or(true);
        if credentials_changed {
            if let Some(open) = conn.take() {
                info!("credentials changed, closing connection");
                open.handle.close().await;
            }
        }
        *slot = Some(fresh.clone());
        Ok(fresh)
    }

    /// The live connection, opening it on first use.
    pub async fn ensure_connection(&self) -> WpResult<Arc<dyn DbConnection>> {
        let mut conn = self.connection.lock().await;
        let config = self.ensure_configuration().await?;
        let params = ConnectParams::from_config(&config);

        if let Some(open) = conn.as_ref() {
            if open.params == params {
                return Ok(open.handle.clone());
            }
        }
        if let Some(stale) = conn.take() {
            debug!("parameters changed, closing previous connection");
            stale.handle.close().await;
        }

        let handle: Arc<dyn DbConnection> = match self.driver.connect(&params).await {
            Ok(h) => Arc::from(h),
            Err(e) => {
                warn!(driver = self.driver.name(), host = %params.host, "connect failed: {}", e);
                return Err(WpError::ConnectionFailed(e.to_string()));
            }
        };
        info!(
            driver = self.driver.name(),
            host = %params.host,
            database = %params.database,
            "connected"
        );
        *conn = Some(OpenConnection {
            params,
            handle: handle.clone(),
        });
        Ok(handle)
    }

    pub async fn is_connected(&self) -> bool {
        self.connection.lock().await.is_some()
    }

    /// Close the connection, keeping the configuration.
    pub async fn disconnect(&self) {
        if let Some(open) = self.connection.lock().await.take() {
            open.handle.close().await;
            info!("disconnected");
        }
    }

    /// Run a parameterized statement. Failures are not retried.
    pub async fn run_query(&self, sql: &str, params: &[String]) -> WpResult<Vec<Row>> {
        let conn = self.ensure_connection().await?;
        debug!(sql, params = params.len(), "query");
        conn.query(sql, params)
            .await
            .map_err(|e| WpError::QueryFailed(e.to_string()))
    }

    /// The raw value of one row of the options table.
    pub async fn get_option(&self, name: &str) -> WpResult<Option<String>> {
        let config = self.ensure_configuration().await?;
        let sql = format!(
            "SELECT option_value FROM {} WHERE option_name = ? LIMIT 1",
            config.table("options")
        );
        let rows = self.run_query(&sql, &[name.to_string()]).await?;
        Ok(rows.first().and_then(|r| column_text(r, "option_value")))
    }

    pub async fn get_wordpress_version(&self) -> WpResult<Option<String>> {
        self.get_option("version").await
    }

    /// Open (or reuse) the connection and read the WordPress version.
    pub async fn test_connection(&self) -> WpResult<Option<String>> {
        self.ensure_connection().await?;
        self.get_wordpress_version().await
    }

    /// The active theme and its template files.
    ///
    /// Template scanning is best effort: any file that cannot be read is
    /// left out of the list without failing the lookup. This can hide
    /// permission problems, so every skipped file is logged at `warn`.
    pub async fn get_active_theme(&self) -> WpResult<Option<ThemeInfo>> {
        let Some(stylesheet) = self.get_option("stylesheet").await? else {
            return Ok(None);
        };
        let config = self.ensure_configuration().await?;
        let path = config
            .wp_path
            .join("wp-content")
            .join("themes")
            .join(&stylesheet);

        let is_dir = tokio::fs::metadata(&path)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false);
        let template_files = if is_dir {
            scan_templates(&path).await
        } else {
            warn!(path = %path.display(), "active theme directory not found");
            Vec::new()
        };

        Ok(Some(ThemeInfo {
            name: stylesheet,
            path,
            active: true,
            template_files,
        }))
    }

    /// Active plugin entries.
    ///
    /// The stored value is a PHP-serialized array; this splits it on `;`
    /// and is only an approximation (see [`serialized::split_plugins`]).
    pub async fn get_active_plugins(&self) -> WpResult<Vec<String>> {
        Ok(self
            .get_option("active_plugins")
            .await?
            .map(|raw| serialized::split_plugins(&raw))
            .unwrap_or_default())
    }

    /// Custom post types.
    ///
    /// Prefers the Custom Post Type UI option; only when it is absent or
    /// yields nothing are distinct non-builtin `post_type`s read from the
    /// posts table. The two sources are never merged.
    pub async fn get_custom_post_types(&self) -> WpResult<Vec<String>> {
        if let Some(raw) = self.get_option("cptui_post_types").await? {
            let tokens = serialized::string_tokens(&raw);
            if !tokens.is_empty() {
                return Ok(tokens);
            }
        }

        let config = self.ensure_configuration().await?;
        let excluded = BUILTIN_POST_TYPES
            .iter()
            .map(|t| format!("'{}'", t))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "SELECT DISTINCT post_type FROM {} WHERE post_type NOT IN ({}) LIMIT {}",
            config.table("posts"),
            excluded,
            self.limits.post_type_limit
        );
        let rows = self.run_query(&sql, &[]).await?;
        Ok(rows
            .iter()
            .filter_map(|r| column_text(r, "post_type"))
            .collect())
    }
}

/// `.php` templates directly inside `dir`, in listing order.
async fn scan_templates(dir: &Path) -> Vec<String> {
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(e) => e,
        Err(e) => {
            warn!(path = %dir.display(), "cannot list theme directory: {}", e);
            return Vec::new();
        }
    };

    let mut templates = Vec::new();
    loop {
        let entry = match entries.next_entry().await {
            Ok(Some(entry)) => entry,
            Ok(None) => break,
            Err(e) => {
                warn!(path = %dir.display(), "stopped listing theme directory: {}", e);
                break;
            }
        };
        let name = entry.file_name().to_string_lossy().to_string();
        if !name.ends_with(theme::TEMPLATE_EXTENSION) {
            continue;
        }
        match tokio::fs::read_to_string(entry.path()).await {
            Ok(contents) => {
                if theme::is_template(&name, &contents) {
                    templates.push(name);
                }
            }
            Err(source) => {
                let err = WpError::Io {
                    path: entry.path(),
                    source,
                };
                warn!("skipping template candidate: {}", err);
            }
        }
    }
    templates
}
