//! Completion suggestions for the text before a cursor.

use tracing::warn;
use wp_context_core::completion::{self, CompletionItem};

use crate::installation::InstallationState;

/// Static catalogue plus custom post type snippets. The database is only
/// consulted when a trigger prefix is present; if it is unreachable the
/// static items are still returned.
pub async fn completion_items(state: &InstallationState, text_before_cursor: &str) -> Vec<CompletionItem> {
    if completion::trigger(text_before_cursor).is_none() {
        return Vec::new();
    }
    let post_types = match state.get_custom_post_types().await {
        Ok(types) => types,
        Err(e) => {
            warn!("custom post types unavailable for completion: {}", e);
            Vec::new()
        }
    };
    completion::complete(text_before_cursor, &post_types)
}

/// CLI entry point. Prints one suggestion per line.
pub async fn run_complete(state: &InstallationState, text_before_cursor: &str) -> anyhow::Result<()> {
    for item in completion_items(state, text_before_cursor).await {
        println!("{}\t{}", item.label, item.detail);
    }
    Ok(())
}
