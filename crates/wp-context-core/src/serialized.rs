//! Heuristics over PHP-serialized option values.
//!
//! WordPress stores `active_plugins` and plugin settings such as
//! `cptui_post_types` as PHP-serialized arrays. These helpers do NOT decode
//! that format. They pull out name-looking tokens and inherit the known gaps:
//!
//! - [`split_plugins`] splits on `;`, so a real serialized array yields
//!   fragments like `a:2:{i:0` alongside the plugin paths.
//! - [`string_tokens`] returns every `s:<len>:"..."` string, keys included,
//!   and ignores the declared length.

use regex::Regex;
use std::sync::LazyLock;

static SERIALIZED_STRING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"s:\d+:"([^"]*)""#).unwrap());

/// Split a stored plugin list on `;`, dropping empty or blank segments.
pub fn split_plugins(raw: &str) -> Vec<String> {
    raw.split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Every non-empty length-prefixed string token, in order of appearance.
pub fn string_tokens(raw: &str) -> Vec<String> {
    SERIALIZED_STRING_RE
        .captures_iter(raw)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_drops_trailing_segment() {
        assert_eq!(split_plugins("a/a.php;b/b.php;"), vec!["a/a.php", "b/b.php"]);
    }

    #[test]
    fn test_split_drops_blank_segments() {
        assert_eq!(split_plugins(" ; a/a.php ;;  "), vec!["a/a.php"]);
        assert!(split_plugins("").is_empty());
    }

    #[test]
    fn test_split_on_real_serialized_value_is_approximate() {
        let raw = r#"a:1:{i:0;s:19:"akismet/akismet.php";}"#;
        let parts = split_plugins(raw);
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "a:1:{i:0");
    }

    #[test]
    fn test_string_tokens() {
        let raw = r#"a:2:{s:4:"book";a:0:{}s:5:"movie";a:0:{}}"#;
        assert_eq!(string_tokens(raw), vec!["book", "movie"]);
    }

    #[test]
    fn test_string_tokens_none() {
        assert!(string_tokens("a:0:{}").is_empty());
        assert!(string_tokens(r#"s:0:"""#).is_empty());
    }
}
