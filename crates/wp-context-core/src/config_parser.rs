//! `wp-config.php` extraction.
//!
//! WordPress's bootstrap file declares database settings two ways:
//! constants via `define('DB_NAME', 'value')` and the table prefix via a
//! plain variable assignment `$table_prefix = 'wp_';`. Each style gets its
//! own pattern so the two never get conflated.
//!
//! This is not a PHP parser. Only the literal forms WordPress itself emits
//! are recognised; computed values, heredocs, `getenv()` calls and the like
//! fall through to the defaults. Parsing never fails.

use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

use crate::models::{Configuration, DEFAULT_DB_HOST, DEFAULT_TABLE_PREFIX};

fn define_pattern(key: &str) -> Regex {
    // `define` is matched case-insensitively, the key is not. The value is
    // either single- or double-quoted and may contain the other quote.
    Regex::new(&format!(
        r#"(?i:define)\s*\(\s*['"]{}['"]\s*,\s*(?:'([^']*)'|"([^"]*)")\s*\)"#,
        regex::escape(key)
    ))
    .unwrap()
}

static DB_NAME_RE: LazyLock<Regex> = LazyLock::new(|| define_pattern("DB_NAME"));
static DB_USER_RE: LazyLock<Regex> = LazyLock::new(|| define_pattern("DB_USER"));
static DB_PASSWORD_RE: LazyLock<Regex> = LazyLock::new(|| define_pattern("DB_PASSWORD"));
static DB_HOST_RE: LazyLock<Regex> = LazyLock::new(|| define_pattern("DB_HOST"));

static TABLE_PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)\$table_prefix\s*=\s*(?:'([^']*)'|"([^"]*)")"#).unwrap());

/// Raw values as they appear in the file; empty when absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WpConfigValues {
    pub db_name: String,
    pub db_user: String,
    pub db_password: String,
    pub db_host: String,
    pub table_prefix: String,
}

fn first_capture(re: &Regex, contents: &str) -> String {
    re.captures(contents)
        .and_then(|c| c.get(1).or_else(|| c.get(2)))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

/// Pull the raw settings out of the file contents. First match wins.
pub fn extract(contents: &str) -> WpConfigValues {
    WpConfigValues {
        db_name: first_capture(&DB_NAME_RE, contents),
        db_user: first_capture(&DB_USER_RE, contents),
        db_password: first_capture(&DB_PASSWORD_RE, contents),
        db_host: first_capture(&DB_HOST_RE, contents),
        table_prefix: first_capture(&TABLE_PREFIX_RE, contents),
    }
}

/// Build a [`Configuration`] from file contents and the file's location.
///
/// `DB_HOST` falls back to `localhost` and the table prefix to `wp_`, so
/// the prefix is never empty. Other absent fields stay empty; see
/// [`Configuration::missing_fields`].
pub fn parse(contents: &str, config_path: &Path) -> Configuration {
    let values = extract(contents);
    let wp_path = config_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();

    Configuration {
        config_path: config_path.to_path_buf(),
        wp_path,
        db_host: non_empty_or(values.db_host, DEFAULT_DB_HOST),
        db_name: values.db_name,
        db_user: values.db_user,
        db_password: values.db_password,
        table_prefix: non_empty_or(values.table_prefix, DEFAULT_TABLE_PREFIX),
    }
}

fn non_empty_or(value: String, default: &str) -> String {
    if value.is_empty() {
        default.to_string()
    } else {
        value
    }
}

/// Where `DB_HOST` points, following WordPress's own conventions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DbHost {
    Tcp { host: String, port: Option<u16> },
    Socket { host: String, socket: String },
}

impl DbHost {
    /// Accepts `host`, `host:3307`, `host:/path/mysql.sock`,
    /// `:/path/mysql.sock`, `[::1]:3307` and bare IPv6 addresses. An
    /// unparsable port is kept as part of the host so the driver reports it.
    pub fn parse(raw: &str) -> DbHost {
        let raw = raw.trim();

        if let Some((addr, tail)) = raw.strip_prefix('[').and_then(|r| r.split_once(']')) {
            let host = non_empty_or(addr.to_string(), DEFAULT_DB_HOST);
            return match tail.strip_prefix(':') {
                _ if tail.is_empty() => DbHost::Tcp { host, port: None },
                Some(socket) if socket.starts_with('/') => DbHost::Socket {
                    host,
                    socket: socket.to_string(),
                },
                Some(port) => match port.parse::<u16>() {
                    Ok(port) => DbHost::Tcp {
                        host,
                        port: Some(port),
                    },
                    Err(_) => DbHost::Tcp {
                        host: raw.to_string(),
                        port: None,
                    },
                },
                None => DbHost::Tcp {
                    host: raw.to_string(),
                    port: None,
                },
            };
        }

        let Some((host, rest)) = raw.split_once(':') else {
            return DbHost::Tcp {
                host: non_empty_or(raw.to_string(), DEFAULT_DB_HOST),
                port: None,
            };
        };

        if rest.starts_with('/') {
            return DbHost::Socket {
                host: non_empty_or(host.to_string(), DEFAULT_DB_HOST),
                socket: rest.to_string(),
            };
        }
        // More than one colon without brackets: a bare IPv6 address.
        if rest.contains(':') {
            return DbHost::Tcp {
                host: raw.to_string(),
                port: None,
            };
        }
        match rest.parse::<u16>() {
            Ok(port) => DbHost::Tcp {
                host: non_empty_or(host.to_string(), DEFAULT_DB_HOST),
                port: Some(port),
            },
            Err(_) => DbHost::Tcp {
                host: raw.to_string(),
                port: None,
            },
        }
    }
}
