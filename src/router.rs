//! Question routing.
//!
//! A question is classified by the ordered rule tables in
//! [`wp_context_core::classify`] and dispatched to one handler per intent.
//! Each handler reads from the [`InstallationState`] and renders a
//! [`QueryResponse`] whose `message` is plain text.

use std::sync::Arc;

use tracing::debug;
use wp_context_core::classify::{self, DatabaseField, ThemeView};
use wp_context_core::models::{GeneralInfo, Intent, QueryResponse, ResponseData};
use wp_context_core::WpResult;

use crate::installation::InstallationState;

pub struct QueryRouter {
    state: Arc<InstallationState>,
}

fn numbered(items: &[String]) -> String {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| format!("{}. {}", i + 1, item))
        .collect::<Vec<_>>()
        .join("\n")
}

impl QueryRouter {
    pub fn new(state: Arc<InstallationState>) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &Arc<InstallationState> {
        &self.state
    }

    pub fn classify(&self, question: &str) -> Intent {
        classify::classify(question)
    }

    /// Run the handler for `intent`. The question only feeds the
    /// secondary keyword passes of `database_info` and `theme_info`.
    pub async fn dispatch(&self, intent: Intent, question: &str) -> WpResult<QueryResponse> {
        match intent {
            Intent::DatabaseInfo => self.database_info(classify::database_field(question)).await,
            Intent::ThemeInfo => self.theme_info(classify::theme_view(question)).await,
            Intent::PluginInfo => self.plugin_info().await,
            Intent::CustomPostTypes => self.custom_post_types().await,
            Intent::GeneralInfo => self.general_info().await,
        }
    }

    /// Classify and dispatch. Never fails: errors become the message of a
    /// response without data.
    pub async fn answer(&self, question: &str) -> QueryResponse {
        let intent = self.classify(question);
        debug!(%intent, question, "routing question");
        match self.dispatch(intent, question).await {
            Ok(resp) => resp,
            Err(e) => QueryResponse::new(intent, None, e.to_string()),
        }
    }

    /// Database settings; one field when asked for, otherwise all of them.
    pub async fn database_info(&self, field: Option<DatabaseField>) -> WpResult<QueryResponse> {
        let config = self.state.ensure_configuration().await?;

        let message = match field {
            Some(f) => format!("{}: {}", f.label(), f.value(&config)),
            None => {
                let password = if config.db_password.is_empty() {
                    "(not set)"
                } else {
                    "(set)"
                };
                format!(
                    "Database settings from {}:\n  Host: {}\n  Name: {}\n  User: {}\n  Password: {}\n  Table prefix: {}",
                    config.config_path.display(),
                    config.db_host,
                    config.db_name,
                    config.db_user,
                    password,
                    config.table_prefix
                )
            }
        };

        Ok(QueryResponse::new(
            Intent::DatabaseInfo,
            Some(ResponseData::Database((*config).clone())),
            message,
        ))
    }

    pub async fn theme_info(&self, view: ThemeView) -> WpResult<QueryResponse> {
        let Some(theme) = self.state.get_active_theme().await? else {
            return Ok(QueryResponse::new(
                Intent::ThemeInfo,
                None,
                "No active theme found.",
            ));
        };

        let message = match view {
            ThemeView::Templates if theme.template_files.is_empty() => {
                format!("No template files found in {}.", theme.name)
            }
            ThemeView::Templates => format!(
                "Template files in {} ({}):\n{}",
                theme.name,
                theme.template_files.len(),
                numbered(&theme.template_files)
            ),
            ThemeView::Summary => format!(
                "Active theme: {}\nPath: {}\nTemplate files: {}",
                theme.name,
                theme.path.display(),
                theme.template_files.len()
            ),
        };

        Ok(QueryResponse::new(
            Intent::ThemeInfo,
            Some(ResponseData::Theme(theme)),
            message,
        ))
    }

    pub async fn plugin_info(&self) -> WpResult<QueryResponse> {
        let plugins = self.state.get_active_plugins().await?;
        if plugins.is_empty() {
            return Ok(QueryResponse::new(
                Intent::PluginInfo,
                None,
                "No active plugins found.",
            ));
        }
        let message = format!("Active plugins ({}):\n{}", plugins.len(), numbered(&plugins));
        Ok(QueryResponse::new(
            Intent::PluginInfo,
            Some(ResponseData::Plugins(plugins)),
            message,
        ))
    }

    pub async fn custom_post_types(&self) -> WpResult<QueryResponse> {
        let post_types = self.state.get_custom_post_types().await?;
        if post_types.is_empty() {
            return Ok(QueryResponse::new(
                Intent::CustomPostTypes,
                None,
                "No custom post types found.",
            ));
        }
        let message = format!(
            "Custom post types ({}):\n{}",
            post_types.len(),
            numbered(&post_types)
        );
        Ok(QueryResponse::new(
            Intent::CustomPostTypes,
            Some(ResponseData::PostTypes(post_types)),
            message,
        ))
    }

    pub async fn general_info(&self) -> WpResult<QueryResponse> {
        let config = self.state.ensure_configuration().await?;
        let version = self.state.get_wordpress_version().await?;

        let message = format!(
            "WordPress {}\nInstallation: {}\nConfig file: {}\nDatabase: {} (user {})",
            version.as_deref().unwrap_or("(unknown version)"),
            config.wp_path.display(),
            config.config_path.display(),
            config.db_name,
            config.db_user
        );

        Ok(QueryResponse::new(
            Intent::GeneralInfo,
            Some(ResponseData::General(GeneralInfo {
                version,
                wp_path: config.wp_path.clone(),
                config_path: config.config_path.clone(),
                db_name: config.db_name.clone(),
                db_user: config.db_user.clone(),
            })),
            message,
        ))
    }
}
