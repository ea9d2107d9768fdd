//! `wp-config.php` discovery.
//!
//! Walks from a starting directory up through its ancestors, checking each
//! one for `wp-config.php`. Only the direct ancestor line is examined, never
//! siblings or children, and the first hit wins. Filesystem errors count as
//! "not here".

use std::path::{Path, PathBuf};
use tracing::debug;
use wp_context_core::{WpError, WpResult};

pub const CONFIG_FILE_NAME: &str = "wp-config.php";

async fn is_file(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|m| m.is_file())
        .unwrap_or(false)
}

/// Absolute form of `start` with symlinks left unresolved, so a theme or
/// plugin folder linked into `wp-content` walks the installation's
/// ancestors rather than those of the link target.
fn absolute(start: &Path) -> PathBuf {
    std::path::absolute(start).unwrap_or_else(|_| start.to_path_buf())
}

/// Like [`locate`], also returning how many directories were examined.
pub async fn locate_traced(start: &Path) -> (Option<PathBuf>, usize) {
    let mut current = absolute(start);
    let mut examined = 0;

    loop {
        examined += 1;
        let candidate = current.join(CONFIG_FILE_NAME);
        if is_file(&candidate).await {
            debug!(path = %candidate.display(), examined, "found wp-config.php");
            return (Some(candidate), examined);
        }

        match current.parent() {
            Some(parent) if parent != current => current = parent.to_path_buf(),
            _ => {
                debug!(start = %start.display(), examined, "no wp-config.php on ancestor chain");
                return (None, examined);
            }
        }
    }
}

/// Find the nearest `wp-config.php` at or above `start`.
pub async fn locate(start: &Path) -> Option<PathBuf> {
    locate_traced(start).await.0
}

/// Try each workspace root in order; the first root that yields a file wins.
pub async fn locate_in_roots(roots: &[PathBuf]) -> WpResult<PathBuf> {
    for root in roots {
        if let Some(found) = locate(root).await {
            return Ok(found);
        }
    }
    Err(WpError::ConfigNotFound)
}
