//! MySQL connection management.
//!
//! Builds sqlx connect options from the credentials recovered from
//! `wp-config.php` and opens a pool capped at a single connection, so an
//! installation session never holds more than one live handle.
//!
//! `DB_HOST` is read the way WordPress reads it: `host`, `host:port`,
//! `host:/path/to/mysqld.sock` or `:/path/to/mysqld.sock`.

use anyhow::Result;
use sqlx::mysql::{MySqlConnectOptions, MySqlPool, MySqlPoolOptions};
use std::time::Duration;

use wp_context_core::config_parser::DbHost;
use wp_context_core::store::ConnectParams;

use crate::config::DatabaseConfig;

/// Translate connection parameters into sqlx options.
pub fn connect_options(params: &ConnectParams, settings: &DatabaseConfig) -> MySqlConnectOptions {
    let mut options = MySqlConnectOptions::new()
        .username(&params.user)
        .database(&params.database);

    if !params.password.is_empty() {
        options = options.password(&params.password);
    }

    match DbHost::parse(&params.host) {
        DbHost::Tcp { host, port } => options
            .host(&host)
            .port(port.unwrap_or(settings.port)),
        DbHost::Socket { socket, .. } => options.socket(socket),
    }
}

/// Open a single-connection pool to the WordPress database.
///
/// # Errors
///
/// Returns the driver error if the server is unreachable, refuses the
/// credentials, or does not answer within `connect_timeout_secs`.
pub async fn connect(params: &ConnectParams, settings: &DatabaseConfig) -> Result<MySqlPool> {
    let options = connect_options(params, settings);

    let pool = MySqlPoolOptions::new()
        .max_connections(1)
        .acquire_timeout(Duration::from_secs(settings.connect_timeout_secs))
        .connect_with(options)
        .await?;

    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(host: &str) -> ConnectParams {
        ConnectParams {
            host: host.to_string(),
            user: "root".to_string(),
            password: String::new(),
            database: "shop".to_string(),
        }
    }

    #[test]
    fn test_default_port() {
        let opts = connect_options(&params("localhost"), &DatabaseConfig::default());
        assert_eq!(opts.get_host(), "localhost");
        assert_eq!(opts.get_port(), 3306);
        assert_eq!(opts.get_username(), "root");
        assert_eq!(opts.get_database(), Some("shop"));
    }

    #[test]
    fn test_explicit_port() {
        let opts = connect_options(&params("db.internal:3307"), &DatabaseConfig::default());
        assert_eq!(opts.get_host(), "db.internal");
        assert_eq!(opts.get_port(), 3307);
    }

    #[test]
    fn test_socket() {
        let opts = connect_options(
            &params("localhost:/var/run/mysqld/mysqld.sock"),
            &DatabaseConfig::default(),
        );
        assert_eq!(
            opts.get_socket().map(|p| p.to_string_lossy().to_string()),
            Some("/var/run/mysqld/mysqld.sock".to_string())
        );
    }
}
