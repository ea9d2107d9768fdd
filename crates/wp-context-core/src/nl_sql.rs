//! Ad-hoc query translation.
//!
//! Exactly one phrasing is understood: a query mentioning both `option` and
//! `like`, e.g. `find options like %mss%`. It becomes a single fixed,
//! parameterized statement against the options table. Nothing else is
//! translated.

use regex::Regex;
use std::sync::LazyLock;

use crate::error::{WpError, WpResult};

/// Default row cap for the option search.
pub const DEFAULT_OPTION_LIMIT: u32 = 50;

pub const SUPPORTED_PHRASING: &str =
    "I only understand option searches for now, e.g. `find options like mailer`.";

static LIKE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)like\s*['"]?%?([^%'"]*)%?['"]?"#).unwrap());

/// A statement ready for the driver: positional `?` placeholders plus
/// their values, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlQuery {
    pub sql: String,
    pub params: Vec<String>,
}

/// The search token of a recognised option query, without wildcards.
pub fn extract_pattern(query: &str) -> WpResult<String> {
    let lowered = query.to_lowercase();
    if !(lowered.contains("option") && lowered.contains("like")) {
        return Err(WpError::UnrecognizedQuery(SUPPORTED_PHRASING.to_string()));
    }

    let pattern = LIKE_RE
        .captures(query)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim())
        .unwrap_or_default();
    if pattern.is_empty() {
        return Err(WpError::UnrecognizedQuery(SUPPORTED_PHRASING.to_string()));
    }
    Ok(pattern.to_string())
}

/// The one statement this translator emits.
pub fn option_search(table_prefix: &str, pattern: &str, limit: u32) -> SqlQuery {
    SqlQuery {
        sql: format!(
            "SELECT option_id, option_name, option_value FROM {}options WHERE option_name LIKE ? LIMIT {}",
            table_prefix, limit
        ),
        params: vec![format!("%{}%", pattern)],
    }
}

/// Translate an ad-hoc query for an installation using `table_prefix`.
pub fn translate(query: &str, table_prefix: &str, limit: u32) -> WpResult<SqlQuery> {
    let pattern = extract_pattern(query)?;
    Ok(option_search(table_prefix, &pattern, limit))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_wrapped_pattern() {
        let q = translate("find options like %mss%", "wp_", DEFAULT_OPTION_LIMIT).unwrap();
        assert_eq!(q.params, vec!["%mss%".to_string()]);
        assert_eq!(
            q.sql,
            "SELECT option_id, option_name, option_value FROM wp_options WHERE option_name LIKE ? LIMIT 50"
        );
    }

    #[test]
    fn test_bare_pattern_is_wrapped() {
        let q = translate("find options like mss", "wp_", DEFAULT_OPTION_LIMIT).unwrap();
        assert_eq!(q.params, vec!["%mss%".to_string()]);
    }

    #[test]
    fn test_quoted_pattern_and_prefix() {
        let q = translate("Options LIKE 'siteurl'", "shop_", 10).unwrap();
        assert_eq!(q.params, vec!["%siteurl%".to_string()]);
        assert!(q.sql.contains("FROM shop_options"));
        assert!(q.sql.ends_with("LIMIT 10"));
    }

    #[test]
    fn test_unrelated_query_rejected() {
        let err = translate("show me themes", "wp_", DEFAULT_OPTION_LIMIT).unwrap_err();
        assert!(matches!(err, WpError::UnrecognizedQuery(_)));
        assert!(err.to_string().contains("find options like"));
    }

    #[test]
    fn test_empty_pattern_rejected() {
        let err = translate("options like %%", "wp_", DEFAULT_OPTION_LIMIT).unwrap_err();
        assert!(matches!(err, WpError::UnrecognizedQuery(_)));
    }
}
