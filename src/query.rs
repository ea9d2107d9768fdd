//! Ad-hoc option search (`wpctx query`, `POST /query`).
//!
//! Recognition happens before any discovery, so an unsupported phrasing is
//! reported even outside a WordPress installation.

use anyhow::Result;
use serde::Serialize;
use wp_context_core::nl_sql;
use wp_context_core::store::{column_text, Row};
use wp_context_core::WpResult;

use crate::installation::InstallationState;

const VALUE_PREVIEW_CHARS: usize = 60;

#[derive(Debug, Clone, Serialize)]
pub struct OptionSearchResult {
    pub sql: String,
    pub params: Vec<String>,
    pub rows: Vec<Row>,
}

/// Translate and run an ad-hoc query.
pub async fn search_options(state: &InstallationState, text: &str) -> WpResult<OptionSearchResult> {
    let pattern = nl_sql::extract_pattern(text)?;
    let config = state.ensure_configuration().await?;
    let query = nl_sql::option_search(&config.table_prefix, &pattern, state.limits().option_limit);
    let rows = state.run_query(&query.sql, &query.params).await?;
    Ok(OptionSearchResult {
        sql: query.sql,
        params: query.params,
        rows,
    })
}

fn preview(value: &str) -> String {
    let single_line = value.replace('\n', " ");
    if single_line.chars().count() <= VALUE_PREVIEW_CHARS {
        return single_line;
    }
    let cut: String = single_line.chars().take(VALUE_PREVIEW_CHARS).collect();
    format!("{}…", cut)
}

/// CLI entry point. Runs [`search_options`] and prints a table.
pub async fn run_query(state: &InstallationState, text: &str) -> Result<()> {
    let result = match search_options(state, text).await {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    if result.rows.is_empty() {
        println!("No options matched {}.", result.params.join(", "));
        return Ok(());
    }

    println!("{:<8} {:<40} VALUE", "ID", "NAME");
    for row in &result.rows {
        println!(
            "{:<8} {:<40} {}",
            column_text(row, "option_id").unwrap_or_default(),
            column_text(row, "option_name").unwrap_or_default(),
            preview(&column_text(row, "option_value").unwrap_or_default())
        );
    }
    println!();
    println!("{} option(s)", result.rows.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_truncates() {
        let long = "x".repeat(100);
        let p = preview(&long);
        assert_eq!(p.chars().count(), VALUE_PREVIEW_CHARS + 1);
        assert!(p.ends_with('…'));
        assert_eq!(preview("a\nb"), "a b");
    }
}
