//! Direct inspection commands: `locate`, `connect`, and the per-intent
//! shortcuts (`config`, `theme`, `plugins`, `post-types`, `info`).

use anyhow::Result;
use std::path::PathBuf;
use wp_context_core::models::QueryResponse;
use wp_context_core::WpResult;

use crate::installation::InstallationState;
use crate::locate;
use crate::render::{self, OutputFormat};

/// Print the `wp-config.php` each root resolves to.
///
/// Exits non-zero if no root yields a file.
pub async fn run_locate(roots: &[PathBuf]) -> Result<()> {
    let mut found_any = false;
    for root in roots {
        match locate::locate(root).await {
            Some(path) => {
                found_any = true;
                println!("{}", path.display());
            }
            None => eprintln!("No {} found above {}", locate::CONFIG_FILE_NAME, root.display()),
        }
    }
    if !found_any {
        std::process::exit(1);
    }
    Ok(())
}

/// Open the connection and report the WordPress version.
pub async fn run_connect(state: &InstallationState) -> Result<()> {
    match state.test_connection().await {
        Ok(version) => {
            let config = state.ensure_configuration().await?;
            println!(
                "Connected to {}@{} (WordPress {})",
                config.db_name,
                config.db_host,
                version.as_deref().unwrap_or("version unknown")
            );
            state.disconnect().await;
            Ok(())
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Print a handler's response, or the error as its message.
pub fn print_response(resp: WpResult<QueryResponse>, format: OutputFormat) -> Result<()> {
    match resp {
        Ok(resp) => println!("{}", render::render(&resp, format)?),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
    Ok(())
}
