//! Question classification.
//!
//! Every rule is a case-insensitive substring test over the whole question.
//! Rules live in ordered tables and the first matching entry wins, so
//! precedence is exactly the table order. No history is kept: each question
//! is classified on its own.

use crate::models::{Configuration, Intent};

/// An ordered rule: if the lower-cased question contains any keyword, the
/// rule's value is selected.
pub type Rule<T> = (T, &'static [&'static str]);

/// Top-level intent rules. Anything unmatched is [`Intent::GeneralInfo`].
pub const INTENT_RULES: &[Rule<Intent>] = &[
    (Intent::DatabaseInfo, &["database", "db", "username", "wp-config"]),
    (Intent::ThemeInfo, &["theme"]),
    (Intent::PluginInfo, &["plugin"]),
    (Intent::CustomPostTypes, &["post type", "cpt"]),
];

/// A single database setting a question can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseField {
    User,
    Name,
    Host,
    Prefix,
}

impl DatabaseField {
    pub fn label(&self) -> &'static str {
        match self {
            Self::User => "Database user",
            Self::Name => "Database name",
            Self::Host => "Database host",
            Self::Prefix => "Table prefix",
        }
    }

    pub fn value<'a>(&self, config: &'a Configuration) -> &'a str {
        match self {
            Self::User => &config.db_user,
            Self::Name => &config.db_name,
            Self::Host => &config.db_host,
            Self::Prefix => &config.table_prefix,
        }
    }
}

/// Secondary pass for `database_info`. No match renders every field.
pub const DATABASE_FIELD_RULES: &[Rule<DatabaseField>] = &[
    (DatabaseField::User, &["username", "user"]),
    (DatabaseField::Name, &["name"]),
    (DatabaseField::Host, &["host"]),
    (DatabaseField::Prefix, &["prefix", "table"]),
];

/// How a `theme_info` answer is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeView {
    Templates,
    Summary,
}

/// Secondary pass for `theme_info`. No match renders the summary.
pub const THEME_VIEW_RULES: &[Rule<ThemeView>] = &[(ThemeView::Templates, &["template", "file"])];

/// Evaluate an ordered rule table against a question.
pub fn first_match<T: Copy>(rules: &[Rule<T>], question: &str) -> Option<T> {
    let lowered = question.to_lowercase();
    rules
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| lowered.contains(k)))
        .map(|(value, _)| *value)
}

/// Classify a question. Total: every input maps to exactly one intent.
pub fn classify(question: &str) -> Intent {
    first_match(INTENT_RULES, question).unwrap_or(Intent::GeneralInfo)
}

pub fn database_field(question: &str) -> Option<DatabaseField> {
    first_match(DATABASE_FIELD_RULES, question)
}

pub fn theme_view(question: &str) -> ThemeView {
    first_match(THEME_VIEW_RULES, question).unwrap_or(ThemeView::Summary)
}
