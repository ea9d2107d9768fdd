//! Error taxonomy shared by every layer.
//!
//! | Variant | Raised when | Handling |
//! |---------|-------------|----------|
//! | `ConfigNotFound` | no workspace root, or no `wp-config.php` on the ancestor chain | halts the operation, user-facing message |
//! | `ConfigParseIncomplete` | a required `define()` is absent | informational only, defaults substituted |
//! | `ConnectionFailed` | the driver refused to connect | halts the operation, user-facing message |
//! | `QueryFailed` | the driver failed to execute a statement | surfaced verbatim, never retried |
//! | `UnrecognizedQuery` | the ad-hoc translator matched nothing | deterministic help message |
//! | `Io` | a filesystem read failed | skipped by callers where recoverable |

use std::path::PathBuf;
use thiserror::Error;

pub type WpResult<T> = std::result::Result<T, WpError>;

#[derive(Debug, Error)]
pub enum WpError {
    #[error("No wp-config.php found. Open a folder inside a WordPress installation.")]
    ConfigNotFound,

    #[error("wp-config.php is missing required settings: {}", missing.join(", "))]
    ConfigParseIncomplete { missing: Vec<String> },

    #[error("Could not connect to the WordPress database: {0}")]
    ConnectionFailed(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),

    #[error("{0}")]
    UnrecognizedQuery(String),

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl WpError {
    /// Machine-readable code used by the HTTP adapter.
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigNotFound => "config_not_found",
            Self::ConfigParseIncomplete { .. } => "config_incomplete",
            Self::ConnectionFailed(_) => "connection_failed",
            Self::QueryFailed(_) => "query_failed",
            Self::UnrecognizedQuery(_) => "unrecognized_query",
            Self::Io { .. } => "io_error",
        }
    }
}
