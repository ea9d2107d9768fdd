//! Rendering of [`QueryResponse`]s for the different surfaces.
//!
//! Handlers produce plain text. The chat surface wants markdown, scripts
//! want JSON; both are derived here so handlers stay format-agnostic.

use anyhow::Result;
use clap::ValueEnum;
use wp_context_core::models::QueryResponse;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Plain,
    Markdown,
    Json,
}

pub fn render(resp: &QueryResponse, format: OutputFormat) -> Result<String> {
    Ok(match format {
        OutputFormat::Plain => resp.message.clone(),
        OutputFormat::Markdown => markdown(resp),
        OutputFormat::Json => serde_json::to_string_pretty(resp)?,
    })
}

fn markdown_line(line: &str, first: bool) -> String {
    let trimmed = line.trim_start();

    if let Some((num, item)) = trimmed.split_once(". ") {
        if !num.is_empty() && num.chars().all(|c| c.is_ascii_digit()) {
            return format!("{}. `{}`", num, item);
        }
    }
    if first && trimmed.ends_with(':') {
        return format!("**{}**", trimmed);
    }
    match trimmed.split_once(": ") {
        Some((key, value)) if line.starts_with("  ") => format!("- **{}:** `{}`", key, value),
        Some((key, value)) => format!("**{}:** `{}`", key, value),
        None if first => format!("**{}**", trimmed),
        None => trimmed.to_string(),
    }
}

/// Markdown for chat replies. Responses without data (nothing found, or an
/// error) are passed through unchanged.
pub fn markdown(resp: &QueryResponse) -> String {
    if resp.data.is_none() {
        return resp.message.clone();
    }
    resp.message
        .lines()
        .enumerate()
        .map(|(i, line)| markdown_line(line, i == 0))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use wp_context_core::models::{Intent, ResponseData};

    #[test]
    fn test_markdown_numbered_list() {
        let resp = QueryResponse::new(
            Intent::PluginInfo,
            Some(ResponseData::Plugins(vec!["a/a.php".into()])),
            "Active plugins (1):\n1. a/a.php",
        );
        assert_eq!(markdown(&resp), "**Active plugins (1):**\n1. `a/a.php`");
    }

    #[test]
    fn test_markdown_key_values() {
        let resp = QueryResponse::new(
            Intent::PluginInfo,
            Some(ResponseData::Plugins(vec![])),
            "Settings from x:\n  Host: localhost\nPath: /srv",
        );
        assert_eq!(
            markdown(&resp),
            "**Settings from x:**\n- **Host:** `localhost`\n**Path:** `/srv`"
        );
    }

    #[test]
    fn test_markdown_passes_errors_through() {
        let resp = QueryResponse::new(Intent::GeneralInfo, None, "Query failed: boom");
        assert_eq!(markdown(&resp), "Query failed: boom");
    }

    #[test]
    fn test_json_has_type() {
        let resp = QueryResponse::new(Intent::ThemeInfo, None, "No active theme found.");
        let out = render(&resp, OutputFormat::Json).unwrap();
        assert!(out.contains("\"type\": \"theme_info\""));
    }
}
