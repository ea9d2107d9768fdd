//! Core data models.
//!
//! These are the values that flow from the installation state through the
//! router to whichever adapter renders them. All of them serialize to the
//! camelCase JSON shape served by the HTTP adapter.

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// Default `DB_HOST` when `wp-config.php` does not define one.
pub const DEFAULT_DB_HOST: &str = "localhost";

/// Default `$table_prefix` when `wp-config.php` does not assign one.
pub const DEFAULT_TABLE_PREFIX: &str = "wp_";

/// Post types WordPress registers itself; never reported as custom.
pub const BUILTIN_POST_TYPES: &[&str] = &["post", "page", "attachment", "revision", "nav_menu_item"];

/// Connection settings recovered from `wp-config.php`.
///
/// Immutable once built. Re-discovery replaces the whole value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Configuration {
    pub config_path: PathBuf,
    pub wp_path: PathBuf,
    pub db_host: String,
    pub db_name: String,
    pub db_user: String,
    #[serde(skip_serializing)]
    pub db_password: String,
    pub table_prefix: String,
}

impl Configuration {
    /// Fully qualified table name, e.g. `options` → `wp_options`.
    pub fn table(&self, name: &str) -> String {
        format!("{}{}", self.table_prefix, name)
    }

    /// Required `define()`s that were absent from the file.
    ///
    /// `DB_PASSWORD` is not required; local installs often run without one.
    pub fn missing_fields(&self) -> Vec<String> {
        let mut missing = Vec::new();
        if self.db_name.is_empty() {
            missing.push("DB_NAME".to_string());
        }
        if self.db_user.is_empty() {
            missing.push("DB_USER".to_string());
        }
        missing
    }

    /// True when both values would open the same database session.
    pub fn same_credentials(&self, other: &Configuration) -> bool {
        self.db_host == other.db_host
            && self.db_name == other.db_name
            && self.db_user == other.db_user
            && self.db_password == other.db_password
    }
}

/// The active theme and the template files found in its directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeInfo {
    pub name: String,
    pub path: PathBuf,
    pub active: bool,
    /// In directory listing order.
    pub template_files: Vec<String>,
}

/// Summary rendered for questions that match no specific intent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneralInfo {
    pub version: Option<String>,
    pub wp_path: PathBuf,
    pub config_path: PathBuf,
    pub db_name: String,
    pub db_user: String,
}

/// What a question is asking about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    DatabaseInfo,
    ThemeInfo,
    PluginInfo,
    CustomPostTypes,
    GeneralInfo,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DatabaseInfo => "database_info",
            Self::ThemeInfo => "theme_info",
            Self::PluginInfo => "plugin_info",
            Self::CustomPostTypes => "custom_post_types",
            Self::GeneralInfo => "general_info",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Intent-specific payload of a [`QueryResponse`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ResponseData {
    Database(Configuration),
    Theme(ThemeInfo),
    Plugins(Vec<String>),
    PostTypes(Vec<String>),
    General(GeneralInfo),
}

/// The answer to one question.
///
/// `data` is `None` only when the lookup legitimately found nothing, or
/// when the operation failed and `message` carries the error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryResponse {
    #[serde(rename = "type")]
    pub intent: Intent,
    pub data: Option<ResponseData>,
    pub message: String,
}

impl QueryResponse {
    pub fn new(intent: Intent, data: Option<ResponseData>, message: impl Into<String>) -> Self {
        Self {
            intent,
            data,
            message: message.into(),
        }
    }
}
