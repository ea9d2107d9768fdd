//! # wp-context CLI (`wpctx`)
//!
//! Answers questions about the WordPress installation that contains the
//! workspace folder.
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `wpctx locate` | Print the `wp-config.php` each workspace root resolves to |
//! | `wpctx config` | Show the database settings recovered from `wp-config.php` |
//! | `wpctx connect` | Test the database connection |
//! | `wpctx ask "<question>"` | Answer a free-text question |
//! | `wpctx query "<text>"` | Ad-hoc option search (`find options like ...`) |
//! | `wpctx theme` | Active theme summary (`--templates` to list template files) |
//! | `wpctx plugins` | Active plugins |
//! | `wpctx post-types` | Custom post types |
//! | `wpctx info` | Version, paths and database summary |
//! | `wpctx complete "<text>"` | Completions for the text before a cursor |
//! | `wpctx serve` | Start the HTTP chat adapter |
//!
//! ## Examples
//!
//! ```bash
//! # From anywhere inside a WordPress tree
//! wpctx ask "what is the table prefix"
//!
//! # Point at an installation explicitly
//! wpctx --workspace /var/www/shop/wp-content/plugins/mine ask "list plugins"
//!
//! # Machine-readable output
//! wpctx ask "custom post types" --format json
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use wp_context_core::classify::ThemeView;
use wp_context::render::{self, OutputFormat};
use wp_context::{completions, config, inspect, query, server, InstallationState, QueryRouter};

/// wp-context CLI: answer questions about a WordPress installation.
#[derive(Parser)]
#[command(
    name = "wpctx",
    about = "wp-context: answer questions about a WordPress installation",
    version,
    long_about = "wp-context locates wp-config.php above the workspace folder, recovers the \
    database credentials from it, and answers questions about the installation: database \
    settings, active theme, plugins, custom post types and version."
)]
struct Cli {
    /// Path to the tool configuration file (TOML). Optional.
    #[arg(long, global = true, default_value = "./config/wpctx.toml")]
    config: PathBuf,

    /// Workspace root to search upward from. Repeatable; overrides
    /// `[workspace].roots`. Defaults to the current directory.
    #[arg(long, global = true)]
    workspace: Vec<PathBuf>,

    /// Log at debug level (overridden by `RUST_LOG`).
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the wp-config.php each workspace root resolves to.
    Locate,

    /// Show the database settings recovered from wp-config.php.
    Config,

    /// Open the database connection and report the WordPress version.
    Connect,

    /// Answer a free-text question about the installation.
    ///
    /// Recognised topics: database settings, theme, plugins, custom post
    /// types. Anything else returns a general summary.
    Ask {
        question: String,

        #[arg(long, value_enum, default_value = "plain")]
        format: OutputFormat,
    },

    /// Ad-hoc option search, e.g. `find options like mailer`.
    Query { text: String },

    /// Show the active theme.
    Theme {
        /// List template files instead of the summary.
        #[arg(long)]
        templates: bool,
    },

    /// List active plugins.
    Plugins,

    /// List custom post types.
    PostTypes,

    /// Version, paths and database summary.
    Info,

    /// Completions for the text before a cursor (`add_`, `wp_`, `get_`).
    Complete { text: String },

    /// Start the HTTP chat adapter.
    ///
    /// Binds to `[server].bind` unless `--bind` is given.
    Serve {
        #[arg(long)]
        bind: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cfg = config::load_config(&cli.config)?;

    let roots = if !cli.workspace.is_empty() {
        cli.workspace.clone()
    } else if !cfg.workspace.roots.is_empty() {
        cfg.workspace.roots.clone()
    } else {
        vec![std::env::current_dir()?]
    };

    let state = Arc::new(InstallationState::from_config(&cfg, roots.clone()));
    let router = QueryRouter::new(state.clone());

    match cli.command {
        Commands::Locate => {
            inspect::run_locate(&roots).await?;
        }
        Commands::Config => {
            inspect::print_response(router.database_info(None).await, OutputFormat::Plain)?;
        }
        Commands::Connect => {
            inspect::run_connect(&state).await?;
        }
        Commands::Ask { question, format } => {
            let resp = router.answer(&question).await;
            println!("{}", render::render(&resp, format)?);
        }
        Commands::Query { text } => {
            query::run_query(&state, &text).await?;
        }
        Commands::Theme { templates } => {
            let view = if templates {
                ThemeView::Templates
            } else {
                ThemeView::Summary
            };
            inspect::print_response(router.theme_info(view).await, OutputFormat::Plain)?;
        }
        Commands::Plugins => {
            inspect::print_response(router.plugin_info().await, OutputFormat::Plain)?;
        }
        Commands::PostTypes => {
            inspect::print_response(router.custom_post_types().await, OutputFormat::Plain)?;
        }
        Commands::Info => {
            inspect::print_response(router.general_info().await, OutputFormat::Plain)?;
        }
        Commands::Complete { text } => {
            completions::run_complete(&state, &text).await?;
        }
        Commands::Serve { bind } => {
            let bind = bind.unwrap_or_else(|| cfg.server.bind.clone());
            server::run_server(&bind, state.clone()).await?;
        }
    }

    state.disconnect().await;
    Ok(())
}
